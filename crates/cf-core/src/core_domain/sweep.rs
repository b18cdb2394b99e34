use crate::core::{Dataset, TemplateCatalog, TemplateKind, TemplateRef};

// ---------------------------------------------------------------------------
// IdxRange — which dataset indices a sweep addresses
// ---------------------------------------------------------------------------

/// Half-open index interval, or the whole dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdxRange {
    All,
    Range { start: usize, end: usize },
}

impl IdxRange {
    pub fn contains(&self, idx: usize) -> bool {
        match self {
            IdxRange::All => true,
            IdxRange::Range { start, end } => idx >= *start && idx < *end,
        }
    }
}

// ---------------------------------------------------------------------------
// KeySelection — raw key-list configuration for one template section
// ---------------------------------------------------------------------------

/// Which keys of a catalog section a sweep uses: every key (plus a leading
/// none sentinel), or an explicit list taken verbatim. An empty list means
/// the sentinel only. Explicit keys are not validated here; an unknown key
/// surfaces as a lookup failure at composition time.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum KeySelection {
    #[default]
    All,
    Listed(Vec<String>),
}

impl KeySelection {
    pub fn resolve(&self, kind: TemplateKind, catalog: &TemplateCatalog) -> Vec<TemplateRef> {
        match self {
            KeySelection::All => {
                let mut refs = vec![TemplateRef::None];
                refs.extend(catalog.keys(kind).map(TemplateRef::from_key));
                refs
            }
            KeySelection::Listed(keys) if keys.is_empty() => vec![TemplateRef::None],
            KeySelection::Listed(keys) => keys
                .iter()
                .map(|k| TemplateRef::from_key(k.clone()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedSweep — key lists fixed at sweep start
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct ResolvedSweep {
    pub idx_range: IdxRange,
    pub instructions: Vec<TemplateRef>,
    pub cot_triggers: Vec<TemplateRef>,
    pub answer_extractions: Vec<TemplateRef>,
}

impl ResolvedSweep {
    pub fn resolve(
        idx_range: IdxRange,
        instruction_keys: &KeySelection,
        cot_trigger_keys: &KeySelection,
        answer_extraction_keys: &KeySelection,
        catalog: &TemplateCatalog,
    ) -> Self {
        Self {
            idx_range,
            instructions: instruction_keys.resolve(TemplateKind::Instruction, catalog),
            cot_triggers: cot_trigger_keys.resolve(TemplateKind::CotTrigger, catalog),
            answer_extractions: answer_extraction_keys
                .resolve(TemplateKind::AnswerExtraction, catalog),
        }
    }

    /// Computes the call counts this sweep will incur against the dataset.
    pub fn cost(&self, dataset: &Dataset) -> SweepCost {
        let n_samples = match self.idx_range {
            IdxRange::All => dataset.len(),
            IdxRange::Range { start, end } => {
                end.saturating_sub(start) * dataset.collection_count()
            }
        };
        let n_cot_calls = n_samples * self.instructions.len() * self.cot_triggers.len();
        let n_extraction_calls = n_cot_calls * self.answer_extractions.len();
        SweepCost {
            n_samples,
            n_cot_calls,
            n_extraction_calls,
            n_total: n_cot_calls + n_extraction_calls,
        }
    }
}

// ---------------------------------------------------------------------------
// SweepCost — the numbers behind the confirmation gate
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepCost {
    pub n_samples: usize,
    pub n_cot_calls: usize,
    pub n_extraction_calls: usize,
    pub n_total: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_catalog() -> TemplateCatalog {
        TemplateCatalog::from_json(
            r#"{
                "version": "0.01",
                "instructions": {"qa-01": "i1", "qa-02": "i2"},
                "cot-triggers": {"kojima-01": "t1"},
                "answer-extractions": {"kojima-A-C": "e1", "kojima-A-D": "e2", "kojima-A-E": "e3"}
            }"#,
        )
        .expect("valid catalog JSON")
    }

    fn make_dataset(n: usize) -> Dataset {
        let items = (0..n)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "question": format!("q{i}"),
                    "choices": ["a", "b"]
                }))
                .expect("item")
            })
            .collect();
        Dataset::Items(items)
    }

    #[test]
    fn test_idx_range_contains() {
        let range = IdxRange::Range { start: 0, end: 3 };
        assert!(range.contains(0));
        assert!(range.contains(2));
        assert!(!range.contains(3));
        assert!(!range.contains(5));
        assert!(IdxRange::All.contains(usize::MAX));
    }

    #[test]
    fn test_selection_all_prepends_none() {
        let refs = KeySelection::All.resolve(TemplateKind::Instruction, &make_catalog());
        assert_eq!(
            refs,
            vec![
                TemplateRef::None,
                TemplateRef::from_key("qa-01"),
                TemplateRef::from_key("qa-02"),
            ]
        );
    }

    #[test]
    fn test_selection_empty_is_sentinel_only() {
        let refs =
            KeySelection::Listed(Vec::new()).resolve(TemplateKind::CotTrigger, &make_catalog());
        assert_eq!(refs, vec![TemplateRef::None]);
    }

    #[test]
    fn test_selection_explicit_verbatim() {
        // Unknown keys pass through untouched; they fail later at lookup.
        let selection = KeySelection::Listed(vec!["none".to_owned(), "no-such-key".to_owned()]);
        let refs = selection.resolve(TemplateKind::AnswerExtraction, &make_catalog());
        assert_eq!(
            refs,
            vec![TemplateRef::None, TemplateRef::from_key("no-such-key")]
        );
    }

    #[test]
    fn test_cost_formula() {
        // n_samples=10, |instructions|=3, |triggers|=2, |extractions|=4
        let sweep = ResolvedSweep {
            idx_range: IdxRange::All,
            instructions: KeySelection::All.resolve(TemplateKind::Instruction, &make_catalog()),
            cot_triggers: KeySelection::Listed(vec![
                "kojima-01".to_owned(),
                "kojima-02".to_owned(),
            ])
            .resolve(TemplateKind::CotTrigger, &make_catalog()),
            answer_extractions: KeySelection::All
                .resolve(TemplateKind::AnswerExtraction, &make_catalog()),
        };
        assert_eq!(sweep.instructions.len(), 3);
        assert_eq!(sweep.cot_triggers.len(), 2);
        assert_eq!(sweep.answer_extractions.len(), 4);

        let cost = sweep.cost(&make_dataset(10));
        assert_eq!(cost.n_cot_calls, 60);
        assert_eq!(cost.n_extraction_calls, 240);
        assert_eq!(cost.n_total, 300);
    }

    #[test]
    fn test_cost_with_idx_range() {
        let sweep = ResolvedSweep {
            idx_range: IdxRange::Range { start: 2, end: 5 },
            instructions: vec![TemplateRef::None],
            cot_triggers: vec![TemplateRef::None],
            answer_extractions: vec![TemplateRef::None],
        };
        let cost = sweep.cost(&make_dataset(10));
        assert_eq!(cost.n_samples, 3);
        assert_eq!(cost.n_cot_calls, 3);
        assert_eq!(cost.n_extraction_calls, 3);
        assert_eq!(cost.n_total, 6);
    }
}
