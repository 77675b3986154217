use crate::domain::GenerativeProvider;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub provider: Arc<dyn GenerativeProvider>,
    // Largest inbound body accepted before the request fails.
    pub max_body_bytes: usize,
}
