//! Route definitions for the analysis endpoints.
//!
//! Mounted within the `/api` tree.
//!
//! ```text
//! POST   /analyze         -> analyze_basic
//! POST   /skin-analyze    -> analyze_advanced
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::analysis;
use crate::state::AppState;

/// Build the analysis router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analysis::analyze_basic))
        .route("/skin-analyze", post(analysis::analyze_advanced))
}
