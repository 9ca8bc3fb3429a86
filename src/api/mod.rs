mod chain;
mod difficulty;
mod health;
pub mod models;
mod nodes;

use actix_web::HttpResponse;
use actix_web::web::ServiceConfig;

use crate::error::LedgerError;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::validate_chain)
        .service(chain::mine_block)
        .service(chain::new_transaction)
        .service(nodes::register_nodes)
        .service(nodes::resolve)
        .service(nodes::get_nodes)
        .service(difficulty::get_difficulty)
        .service(difficulty::set_difficulty);
}

/// Map a ledger error to the status the API reports it with.
fn error_response(err: &LedgerError) -> HttpResponse {
    let body = err.to_string();
    match err {
        LedgerError::Config(_) => HttpResponse::BadRequest().body(body),
        LedgerError::StaleTip { .. } => HttpResponse::Conflict().body(body),
        LedgerError::Search(_) => HttpResponse::ServiceUnavailable().body(body),
        LedgerError::EmptyLedger | LedgerError::Transport { .. } => {
            HttpResponse::InternalServerError().body(body)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;

    use super::AppState;
    use crate::blockchain::ValidationMode;
    use crate::config::NodeConfig;
    use crate::node::Node;
    use crate::testing::StaticFetcher;

    pub fn state(difficulty: u32, fetcher: StaticFetcher) -> web::Data<AppState> {
        let node = Node::new(difficulty, ValidationMode::Structural).unwrap();
        web::Data::new(AppState::new(
            node,
            Box::new(fetcher),
            &NodeConfig::default(),
        ))
    }
}
