use std::fmt;

use serde::de::Error as _;

// ---------------------------------------------------------------------------
// String-based identity newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(ModelId);
string_newtype!(BackendId);

// ---------------------------------------------------------------------------
// TemplateKind — which section of the catalog a key addresses
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    Instruction,
    CotTrigger,
    AnswerExtraction,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TemplateKind::Instruction => "instructions",
            TemplateKind::CotTrigger => "cot-triggers",
            TemplateKind::AnswerExtraction => "answer-extractions",
        })
    }
}

// ---------------------------------------------------------------------------
// TemplateRef — a catalog key, or the explicit absence of one
// ---------------------------------------------------------------------------

/// A template slot in a sweep: either a named catalog key or the sentinel
/// meaning "query without this template". Serialized as the string `"none"`
/// or the key itself, which keeps stored records readable alongside
/// datasets produced by earlier tooling.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateRef {
    None,
    Key(String),
}

impl TemplateRef {
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        if key == "none" {
            TemplateRef::None
        } else {
            TemplateRef::Key(key)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TemplateRef::None => "none",
            TemplateRef::Key(key) => key,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            TemplateRef::None => None,
            TemplateRef::Key(key) => Some(key),
        }
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl serde::Serialize for TemplateRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for TemplateRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(D::Error::custom("template key must not be empty"));
        }
        Ok(TemplateRef::from_key(s))
    }
}

// ---------------------------------------------------------------------------
// TaskType — answer-normalization task family
// ---------------------------------------------------------------------------

/// Task family for answer normalization and grading. Only multiple-choice
/// is implemented today; the enum is the extension point for other answer
/// shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TaskType {
    #[serde(rename = "multiplechoice")]
    MultipleChoice,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
