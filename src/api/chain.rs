use actix_web::rt::time::timeout;
use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};
use serde_json::Value;

use super::error_response;
use super::models::{AppState, ChainResponse, MessageResponse, MineResponse, ValidateResponse};

/// Fields every submitted record must carry.
const REQUIRED_RECORD_FIELDS: [&str; 2] = ["patient_id", "details"];

/// Get the full chain. This is also what peers fetch during consensus.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

/// Validate the whole local chain under the current difficulty.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(ValidateResponse {
        valid: state.node.validate_chain(&chain),
        length: chain.len(),
        difficulty: state.node.difficulty(),
    })
}

/// Mine a new block from the pending records:
/// - search a proof on the current tip on a blocking worker
/// - add the reward record for this node
/// - forge the block
///
/// On timeout the search is cancelled and nothing is forged, unless the
/// worker already holds the ledger lock, in which case its block stands.
#[get("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let budget = state.search_budget();
    let cancel = budget.cancel.clone();
    let worker = state.clone();
    let search = web::block(move || worker.node.mine(&budget));

    let outcome = match state.pow_timeout {
        Some(limit) => match timeout(limit, search).await {
            Ok(joined) => joined,
            Err(_) => {
                cancel.cancel();
                warn!("MINER - proof search exceeded {limit:?}, cancelled");
                return HttpResponse::ServiceUnavailable()
                    .body(format!("proof search exceeded {limit:?}"));
            }
        },
        None => search.await,
    };

    match outcome {
        Ok(Ok(block)) => {
            info!(
                "MINER - sealed block #{} (hash={}, proof={})",
                block.index(),
                block.hash(),
                block.proof()
            );
            HttpResponse::Ok().json(MineResponse {
                message: "New Block Forged".to_string(),
                index: block.index(),
                data: block.data().clone(),
                proof: block.proof(),
                previous_hash: block.previous_hash().to_string(),
            })
        }
        Ok(Err(e)) => {
            warn!("MINER - {e}");
            error_response(&e)
        }
        Err(e) => HttpResponse::InternalServerError().body(format!("mining worker failed: {e}")),
    }
}

/// Queue a record for the next block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> impl Responder {
    let record = body.into_inner();
    let complete = record
        .as_object()
        .is_some_and(|obj| REQUIRED_RECORD_FIELDS.iter().all(|k| obj.contains_key(*k)));
    if !complete {
        return HttpResponse::BadRequest()
            .body("Missing required JSON values: patient_id, details");
    }

    let index = state.node.append_pending(record);
    debug!("POST /transactions/new - queued for block {index}");
    HttpResponse::Created().json(MessageResponse {
        message: format!("Transaction will be added to Block {index}"),
    })
}
