pub mod hf_hub;
pub mod openai;

use cf_core::core::{BackendId, CompletionBackend};

use crate::bootstrap::{BackendKind, RuntimeBackend};

/// Registry of configured completion backends, keyed by backend id.
///
/// Uses linear scan over a small vec (a handful of services at most)
/// rather than a HashMap.
pub struct BackendRegistry {
    backends: Vec<(BackendId, Box<dyn CompletionBackend>)>,
}

impl BackendRegistry {
    pub fn from_runtime(configs: &[RuntimeBackend], client: reqwest::blocking::Client) -> Self {
        let backends = configs
            .iter()
            .map(|cfg| {
                let backend: Box<dyn CompletionBackend> = match cfg.kind {
                    BackendKind::OpenAiCompletions => {
                        Box::new(openai::OpenAiCompletionsBackend::new(cfg, client.clone()))
                    }
                    BackendKind::HuggingfaceHub => {
                        Box::new(hf_hub::HuggingfaceHubBackend::new(cfg, client.clone()))
                    }
                };
                (cfg.id.clone(), backend)
            })
            .collect();
        Self { backends }
    }

    pub fn get(&self, id: &BackendId) -> Option<&dyn CompletionBackend> {
        self.backends
            .iter()
            .find(|(registered, _)| registered == id)
            .map(|(_, backend)| backend.as_ref())
    }

    /// Removes and returns one backend, handing ownership to the gateway.
    pub fn take(mut self, id: &BackendId) -> Option<Box<dyn CompletionBackend>> {
        let position = self
            .backends
            .iter()
            .position(|(registered, _)| registered == id)?;
        Some(self.backends.swap_remove(position).1)
    }
}
