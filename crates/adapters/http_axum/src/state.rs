//! Shared state for axum handlers.

use std::sync::Arc;

use smartspace_adapter_virtual::VirtualController;

/// State shared by every handler of the mock controller.
#[derive(Clone)]
pub struct MockState {
    pub controller: Arc<VirtualController>,
}

impl MockState {
    pub fn new(controller: VirtualController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
