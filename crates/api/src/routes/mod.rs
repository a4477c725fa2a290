pub mod analysis;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// POST /analyze          basic analysis (face detection + skin status)
/// POST /skin-analyze     advanced analysis (dedicated skin endpoint)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(analysis::router())
}
