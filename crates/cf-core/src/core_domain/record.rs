use chrono::Local;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{BackendId, DatasetError, ModelId, TemplateRef};

// ---------------------------------------------------------------------------
// ModelParams — generation parameters recorded with each CoT
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub name: ModelId,
    pub temperature: f32,
    pub max_tokens: u32,
}

// ---------------------------------------------------------------------------
// Record schema — the persisted output contract of a sweep
// ---------------------------------------------------------------------------

/// One answer-extraction attempt against a generated CoT. Immutable after
/// construction except for `correct_answer`, which a later grading pass
/// fills in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: Uuid,
    pub answer_extraction: TemplateRef,
    pub answer_extraction_text: String,
    pub answer: String,
    pub correct_answer: Option<String>,
}

/// One (instruction, cot trigger) combination's output for one item, with
/// full provenance. Append-only: a record is never mutated after its
/// generation pass completes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub templates_version: String,
    pub instruction: TemplateRef,
    pub cot_trigger: TemplateRef,
    pub prompt_text: String,
    pub cot: String,
    pub answers: Vec<AnswerRecord>,
    pub author: String,
    pub date: String,
    pub api_service: BackendId,
    pub model: ModelParams,
    pub comment: String,
    pub annotation: Vec<String>,
}

/// Creation timestamp in the record schema's local format.
pub fn local_timestamp() -> String {
    Local::now().format("%Y/%m/%d %H:%M:%S").to_string()
}

// ---------------------------------------------------------------------------
// Item — one question unit of a dataset
// ---------------------------------------------------------------------------

/// A single multiple-choice question. Choice labels are derived purely from
/// ordinal position (A = index 0) and never stored. `answer` holds the text
/// of the correct choice when the dataset is labeled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub question: String,
    pub choices: Vec<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub generated_cot: Vec<GenerationRecord>,
}

// ---------------------------------------------------------------------------
// Dataset — a single collection or a named collection of collections
// ---------------------------------------------------------------------------

/// The in-memory dataset container. Mirrors the two shapes the tool
/// consumes: a plain item list, or named splits each holding a list. Any
/// other JSON shape is an `UnrecognizedShape` error before any API calls.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dataset {
    Items(Vec<Item>),
    Splits(IndexMap<String, Vec<Item>>),
}

impl Dataset {
    pub fn from_json(content: &str) -> Result<Self, DatasetError> {
        serde_json::from_str(content).map_err(|e| DatasetError::UnrecognizedShape(e.to_string()))
    }

    /// Total number of items across all splits.
    pub fn len(&self) -> usize {
        match self {
            Dataset::Items(items) => items.len(),
            Dataset::Splits(splits) => splits.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of item collections: 1 for a plain list, the split count
    /// otherwise.
    pub fn collection_count(&self) -> usize {
        match self {
            Dataset::Items(_) => 1,
            Dataset::Splits(splits) => splits.len(),
        }
    }

    /// Applies a fallible transform to every item with its index. Indices
    /// restart at zero per split; each item is visited exactly once and no
    /// state is shared between calls.
    pub fn try_map_indexed<E>(
        &mut self,
        mut f: impl FnMut(&mut Item, usize) -> Result<(), E>,
    ) -> Result<(), E> {
        match self {
            Dataset::Items(items) => {
                for (idx, item) in items.iter_mut().enumerate() {
                    f(item, idx)?;
                }
            }
            Dataset::Splits(splits) => {
                for items in splits.values_mut() {
                    for (idx, item) in items.iter_mut().enumerate() {
                        f(item, idx)?;
                    }
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
