use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::error_response;
use super::models::{
    AppState, NodesResponse, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse,
};

/// Register peers given as `{"nodes": ["host:port", ...]}`.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(nodes) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("Error: Please supply a valid list of nodes");
    };

    for address in &nodes {
        state.node.register_peer(address);
    }

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes: state.node.list_peers().into_iter().collect(),
    })
}

/// Run consensus against every known peer.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> impl Responder {
    let replaced = match state.node.resolve(state.fetcher.as_ref()).await {
        Ok(replaced) => replaced,
        Err(e) => return error_response(&e),
    };

    let chain = state.node.chain();
    let resp = if replaced {
        info!("consensus - chain replaced, now {} blocks", chain.len());
        ResolveResponse {
            message: "Our chain was replaced by the authoritative one.".to_string(),
            new_chain: Some(chain),
            chain: None,
        }
    } else {
        ResolveResponse {
            message: "Our chain is authoritative.".to_string(),
            new_chain: None,
            chain: Some(chain),
        }
    };
    HttpResponse::Ok().json(resp)
}

#[get("/nodes/get")]
pub async fn get_nodes(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(NodesResponse {
        nodes: state.node.list_peers().into_iter().collect(),
    })
}
