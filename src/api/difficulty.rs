use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::Value;

use super::error_response;
use super::models::{AppState, DifficultyResponse, SetDifficultyResponse};

/// Get current PoW difficulty.
#[get("/difficulty")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: state.node.difficulty(),
    })
}

/// Update PoW difficulty. Applies to later searches and validations,
/// including validation of blocks mined before the change.
#[post("/difficulty")]
pub async fn set_difficulty(state: web::Data<AppState>, body: web::Json<Value>) -> impl Responder {
    let Some(raw) = body.get("difficulty") else {
        return HttpResponse::BadRequest().body(r#"Error: Missing "difficulty" in request body"#);
    };
    let Some(requested) = as_integer(raw) else {
        return HttpResponse::BadRequest().body("Invalid difficulty provided. Must be an integer.");
    };

    match state.node.set_difficulty(requested) {
        Ok(difficulty) => HttpResponse::Ok().json(SetDifficultyResponse {
            message: format!("Mining difficulty set to {difficulty}"),
            difficulty,
        }),
        Err(e) => error_response(&e),
    }
}

/// Accept a JSON integer or a string holding one.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod parse_tests {
    use serde_json::json;

    use super::as_integer;

    #[test]
    fn integer_forms() {
        assert_eq!(as_integer(&json!(3)), Some(3));
        assert_eq!(as_integer(&json!("5")), Some(5));
        assert_eq!(as_integer(&json!(-3)), Some(-3));
        assert_eq!(as_integer(&json!(2.5)), None);
        assert_eq!(as_integer(&json!("two")), None);
        assert_eq!(as_integer(&json!(null)), None);
    }
}
