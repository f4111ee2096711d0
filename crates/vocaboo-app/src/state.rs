use std::sync::Arc;

use tokio::sync::RwLock;
use vocaboo_config::Config;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Fixed shuffle seed from the command line
    pub seed: Option<u64>,
}

impl AppState {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            seed,
        }
    }
}
