use actix_web::HttpResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET .../leaderboard - the top entries, highest score first.
pub async fn list(state: &AppState) -> AppResult<HttpResponse> {
    let entries = state
        .leaderboard
        .top()
        .await
        .map_err(|e| AppError::internal("Failed to fetch leaderboard", e))?;

    Ok(HttpResponse::Ok().json(entries))
}
