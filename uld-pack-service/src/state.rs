use std::sync::Arc;

use uld_pack::config::SolverConfig;

use crate::cache::RequestCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RequestCache>,
    pub config: SolverConfig,
}
