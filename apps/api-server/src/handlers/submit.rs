//! Score submission handler.

use actix_web::{HttpResponse, web};
use futures::StreamExt;
use leaderboard_shared::MessageResponse;
use serde_json::Value;

use crate::middleware::client_key::ClientKey;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Largest accepted submission body.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// POST .../submit
pub async fn submit(
    state: &AppState,
    client: &ClientKey,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    let body = read_body(payload).await?;
    let payload = parse_body(&body).map_err(|e| AppError::internal("Server error", e))?;

    // A `null` document has no fields to destructure; treat it as a server fault.
    if payload.is_null() {
        return Err(AppError::internal("Server error", "request body is null"));
    }

    state
        .leaderboard
        .submit(client.as_str(), &payload)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::score_submitted()))
}

/// Collect the body, failing once it grows past `MAX_BODY_BYTES`.
async fn read_body(mut payload: web::Payload) -> AppResult<web::BytesMut> {
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::internal("Server error", e))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(AppError::internal(
                "Server error",
                format!("request body exceeds {} bytes", MAX_BODY_BYTES),
            ));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Parse the request body as JSON. A body that is itself a JSON string is
/// treated as an encoded document and parsed once more.
fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    match serde_json::from_slice(body)? {
        Value::String(inner) => serde_json::from_str(&inner),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(
            parse_body(br#"{"name":"A","score":1}"#).unwrap(),
            json!({"name": "A", "score": 1})
        );
        assert_eq!(
            parse_body(br#""{\"name\":\"A\",\"score\":1}""#).unwrap(),
            json!({"name": "A", "score": 1})
        );
        assert!(parse_body(b"name=A&score=1").is_err());
        assert!(parse_body(b"").is_err());
    }
}
