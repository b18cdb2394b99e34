use cf_core::core::{BackendError, BackendId, CompletionBackend, ModelParams};

use crate::bootstrap::RuntimeBackend;

// ---------------------------------------------------------------------------
// HuggingfaceHubBackend — hosted model hub inference API
// ---------------------------------------------------------------------------

pub struct HuggingfaceHubBackend {
    id: BackendId,
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HuggingfaceHubBackend {
    pub fn new(config: &RuntimeBackend, client: reqwest::blocking::Client) -> Self {
        Self {
            id: config.id.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }
}

impl CompletionBackend for HuggingfaceHubBackend {
    fn id(&self) -> BackendId {
        self.id.clone()
    }

    fn complete(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError> {
        let body = serde_json::json!({
            "inputs": prompt,
            "parameters": {
                "temperature": params.temperature,
                "max_new_tokens": params.max_tokens,
                "return_full_text": false,
            },
        });

        let mut request = self
            .client
            .post(format!("{}/models/{}", self.base_url, params.name))
            .json(&body);
        // The public inference API serves some models without a token.
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
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

        let outputs: Vec<GeneratedTextWire> = response
            .json()
            .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
        outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| BackendError::MalformedResponse("empty output array".to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Response wire types (Deserialize only)
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct GeneratedTextWire {
    generated_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_parse() {
        let outputs: Vec<GeneratedTextWire> =
            serde_json::from_str(r#"[{"generated_text": "The answer is B"}]"#)
                .expect("wire shape");
        assert_eq!(outputs[0].generated_text, "The answer is B");
    }
}
