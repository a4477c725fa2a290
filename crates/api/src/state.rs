use std::sync::Arc;

use skinsight_vision::VisionGateway;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the gateway is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Vision API gateway. Tests swap in a fake.
    pub gateway: Arc<dyn VisionGateway>,
}
