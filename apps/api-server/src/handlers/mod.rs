//! HTTP handlers and request routing.
//!
//! Routing matches on method plus path suffix, so the service works unchanged
//! behind any path prefix (`/api/leaderboard`, `/leaderboard`, ...).

mod leaderboard;
mod submit;


use actix_web::{HttpRequest, HttpResponse, http::Method, web};

use crate::middleware::client_key::ClientKey;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub const LEADERBOARD_ROUTE: &str = "/leaderboard";
pub const SUBMIT_ROUTE: &str = "/submit";

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::to(dispatch));
}

/// Single entry point: every request lands here and is routed by method and path suffix.
///
/// The body is only read once a route matched, so unrouted requests always
/// get the 405 answer whatever they carry.
async fn dispatch(
    req: HttpRequest,
    client: ClientKey,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let path = req.path();

    if req.method() == Method::GET && path.ends_with(LEADERBOARD_ROUTE) {
        return leaderboard::list(&state).await;
    }
    if req.method() == Method::POST && path.ends_with(SUBMIT_ROUTE) {
        return submit::submit(&state, &client, payload).await;
    }

    tracing::debug!(method = %req.method(), path = %path, "No route matched");
    Err(AppError::MethodNotAllowed)
}
