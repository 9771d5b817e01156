use crate::config::Config;
use crate::error::ProxyError;

use completion_client::CompletionClient;

/// Shared, immutable per-process state. Handlers never read the environment.
pub struct AppState {
    pub config: Config,
    pub completion: CompletionClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ProxyError> {
        let completion = CompletionClient::new(&config.ai)?;

        tracing::info!(
            endpoint = %completion.endpoint(),
            model = %completion.model(),
            timeout_secs = config.ai.timeout_secs,
            "Completion client configured"
        );

        Ok(Self { config, completion })
    }
}

pub mod completion_client;
pub(crate) mod generation;
pub mod quiz_service;
pub mod study_plan_service;
