use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{TemplateError, TemplateKind};

// ---------------------------------------------------------------------------
// TemplateCatalog — versioned, read-only prompt template collection
// ---------------------------------------------------------------------------

/// The template catalog: a versioned mapping of named prompt fragments,
/// loaded once at startup and immutable afterwards. Key order follows the
/// source document so that "all keys" expansion is deterministic.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemplateCatalog {
    pub version: String,
    pub instructions: IndexMap<String, String>,
    #[serde(rename = "cot-triggers")]
    pub cot_triggers: IndexMap<String, String>,
    #[serde(rename = "answer-extractions")]
    pub answer_extractions: IndexMap<String, String>,
}

impl TemplateCatalog {
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    fn section(&self, kind: TemplateKind) -> &IndexMap<String, String> {
        match kind {
            TemplateKind::Instruction => &self.instructions,
            TemplateKind::CotTrigger => &self.cot_triggers,
            TemplateKind::AnswerExtraction => &self.answer_extractions,
        }
    }

    /// Looks up a template text. An absent key is an error, deferred to the
    /// caller; keys are never validated ahead of time.
    pub fn get(&self, kind: TemplateKind, key: &str) -> Result<&str, TemplateError> {
        self.section(kind)
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TemplateError::UnknownKey {
                kind,
                key: key.to_owned(),
            })
    }

    /// Catalog keys of one section, in document order.
    pub fn keys(&self, kind: TemplateKind) -> impl Iterator<Item = &str> {
        self.section(kind).keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
