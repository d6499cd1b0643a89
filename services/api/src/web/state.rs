//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use newsroom_core::ports::{ContentGenerationService, IssueRepository};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn ContentGenerationService>,
    pub issues: Arc<dyn IssueRepository>,
}
