use std::collections::HashSet;
use std::time::Duration;

use anyhow::ensure;
use cf_core::core::{BackendId, IdxRange, KeySelection, ModelId, ModelParams};

use crate::config::{AppConfig, BackendKindConfig, IdxRangeConfig, KeyListConfig};

// ---------------------------------------------------------------------------
// RuntimeBackend — one configured backend, API key resolved from the env
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct RuntimeBackend {
    pub id: BackendId,
    pub kind: BackendKind,
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    OpenAiCompletions,
    HuggingfaceHub,
}

// ---------------------------------------------------------------------------
// RuntimeConfig — fully validated runtime configuration
// ---------------------------------------------------------------------------

pub struct RuntimeConfig {
    pub idx_range: IdxRange,
    pub instruction_keys: KeySelection,
    pub cot_trigger_keys: KeySelection,
    pub answer_extraction_keys: KeySelection,
    pub author: String,
    pub api_service: BackendId,
    pub model: ModelParams,
    pub api_time_interval: Duration,
    pub debug: bool,
    pub warn: bool,
    pub backends: Vec<RuntimeBackend>,
    pub log_level: String,
    pub log_format: String,
}

// ---------------------------------------------------------------------------
// into_runtime — converts raw AppConfig into validated RuntimeConfig
// ---------------------------------------------------------------------------

pub fn into_runtime(config: AppConfig) -> Result<RuntimeConfig, anyhow::Error> {
    ensure!(
        config.generation.temperature >= 0.0,
        "temperature must be non-negative"
    );
    ensure!(config.generation.max_tokens > 0, "max_tokens must be positive");
    ensure!(
        config.generation.api_time_interval >= 0.0,
        "api_time_interval must be non-negative"
    );

    let idx_range = match config.sweep.idx_range {
        IdxRangeConfig::All(_) => IdxRange::All,
        IdxRangeConfig::Range([start, end]) => {
            ensure!(start <= end, "idx_range start {start} exceeds end {end}");
            IdxRange::Range { start, end }
        }
    };

    // Detect duplicate backend IDs
    let mut seen_backends = HashSet::with_capacity(config.backends.len());
    for backend in &config.backends {
        ensure!(
            seen_backends.insert(&backend.id),
            "duplicate backend id: {}",
            backend.id
        );
    }

    let api_service = BackendId::new(config.generation.api_service);
    if !config.generation.debug {
        ensure!(
            config.backends.iter().any(|b| b.id == api_service.as_str()),
            "api_service {} has no [[backends]] entry",
            api_service
        );
    }

    let backends: Vec<RuntimeBackend> = config
        .backends
        .into_iter()
        .map(|b| RuntimeBackend {
            id: BackendId::new(b.id),
            kind: match b.kind {
                BackendKindConfig::OpenaiCompletions => BackendKind::OpenAiCompletions,
                BackendKindConfig::HuggingfaceHub => BackendKind::HuggingfaceHub,
            },
            base_url: b.base_url,
            api_key: b.api_key_env.as_deref().and_then(|v| std::env::var(v).ok()),
        })
        .collect();

    Ok(RuntimeConfig {
        idx_range,
        instruction_keys: key_selection(config.sweep.instruction_keys),
        cot_trigger_keys: key_selection(config.sweep.cot_trigger_keys),
        answer_extraction_keys: key_selection(config.sweep.answer_extraction_keys),
        author: config.generation.author,
        api_service,
        model: ModelParams {
            name: ModelId::new(config.generation.engine),
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
        },
        api_time_interval: Duration::from_secs_f64(config.generation.api_time_interval),
        debug: config.generation.debug,
        warn: config.generation.warn,
        backends,
        log_level: config.logging.level,
        log_format: config.logging.format,
    })
}

fn key_selection(config: KeyListConfig) -> KeySelection {
    match config {
        KeyListConfig::All(_) => KeySelection::All,
        KeyListConfig::Listed(keys) => KeySelection::Listed(keys),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
