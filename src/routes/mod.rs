use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod reports;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/health", health::router())
        .merge(reports::router())
}
