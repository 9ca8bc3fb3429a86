use std::io;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use ledger_node::api::{self, AppState};
use ledger_node::network::HttpChainFetcher;
use ledger_node::{LedgerError, Node, NodeConfig};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = NodeConfig::from_env().map_err(invalid_input)?;
    let node = Node::from_config(&config).map_err(invalid_input)?;
    let fetcher = HttpChainFetcher::new(config.peer_timeout, config.peer_chain_path.clone())
        .map_err(invalid_input)?;

    info!(
        "starting ledger node {} at http://{}:{} (difficulty {})",
        node.id(),
        config.host,
        config.port,
        config.difficulty
    );

    let state = web::Data::new(AppState::new(node, Box::new(fetcher), &config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn invalid_input(err: LedgerError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}
