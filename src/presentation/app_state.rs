// Application state for HTTP handlers
use crate::application::session::FarmSession;
use std::collections::HashMap;
use std::sync::Arc;

pub struct AppState {
    /// One live polling session per configured farm, keyed by farm id.
    pub sessions: HashMap<String, Arc<FarmSession>>,
}
