use std::sync::Arc;

use common::prelude::{MockServer, SwordServer};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct State {
    server: Arc<dyn SwordServer>,
}

impl State {
    pub fn new(server: Arc<dyn SwordServer>) -> Self {
        Self { server }
    }

    /// State backed by a fresh [`MockServer`], numbering deposits from 1.
    pub fn mock() -> Self {
        Self::new(Arc::new(MockServer::default()))
    }

    pub fn server(&self) -> &Arc<dyn SwordServer> {
        &self.server
    }
}

impl Default for State {
    fn default() -> Self {
        Self::mock()
    }
}
