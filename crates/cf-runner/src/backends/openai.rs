use cf_core::core::{BackendError, BackendId, CompletionBackend, ModelParams};

use crate::bootstrap::RuntimeBackend;

// ---------------------------------------------------------------------------
// OpenAiCompletionsBackend — hosted completions API
// ---------------------------------------------------------------------------

pub struct OpenAiCompletionsBackend {
    id: BackendId,
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiCompletionsBackend {
    pub fn new(config: &RuntimeBackend, client: reqwest::blocking::Client) -> Self {
        Self {
            id: config.id.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }
}

impl CompletionBackend for OpenAiCompletionsBackend {
    fn id(&self) -> BackendId {
        self.id.clone()
    }

    fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::MissingApiKey(self.id.to_string()))?;

        let body = serde_json::json!({
            "model": params.name.as_str(),
            "prompt": prompt,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "stop": null,
        });

        let response = self
            .client
            .post(format!("{}/v1/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionWire = response
            .json()
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| BackendError::MalformedResponse("empty choices array".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Response wire types (Deserialize only)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct CompletionWire {
    choices: Vec<CompletionChoiceWire>,
}

#[derive(serde::Deserialize)]
struct CompletionChoiceWire {
    text: String,
}
