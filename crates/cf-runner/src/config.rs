use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            sweep: SweepConfig::default(),
            logging: LoggingConfig::default(),
            backends: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub author: String,
    pub api_service: String,
    pub engine: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_time_interval: f64,
    pub debug: bool,
    pub warn: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            author: String::new(),
            api_service: "openai".to_owned(),
            engine: "text-davinci-002".to_owned(),
            temperature: 0.0,
            max_tokens: 128,
            api_time_interval: 1.0,
            debug: true,
            warn: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub idx_range: IdxRangeConfig,
    pub instruction_keys: KeyListConfig,
    pub cot_trigger_keys: KeyListConfig,
    pub answer_extraction_keys: KeyListConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IdxRangeConfig {
    All(AllMarker),
    Range([usize; 2]),
}

impl Default for IdxRangeConfig {
    fn default() -> Self {
        IdxRangeConfig::All(AllMarker)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeyListConfig {
    All(AllMarker),
    Listed(Vec<String>),
}

impl Default for KeyListConfig {
    fn default() -> Self {
        KeyListConfig::All(AllMarker)
    }
}

/// Deserializes only the literal string `"all"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllMarker;

impl<'de> serde::Deserialize<'de> for AllMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "all" {
            Ok(AllMarker)
        } else {
            Err(serde::de::Error::custom("expected \"all\""))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "text".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub id: String,
    pub kind: BackendKindConfig,
    pub base_url: String,
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKindConfig {
    OpenaiCompletions,
    HuggingfaceHub,
}
