use std::time::Duration;

use uuid::Uuid;

use crate::core::{
    answer_extraction_prompt, cot_generation_prompt, local_timestamp, AnswerRecord, BackendError,
    BackendId, CompletionBackend, ConfirmSweep, Dataset, GenerationRecord, Item, ModelParams,
    ResolvedSweep, SweepCost, SweepError, TemplateCatalog, TemplateError,
};

// ---------------------------------------------------------------------------
// Gateway — uniform model-query dispatch with a debug path
// ---------------------------------------------------------------------------

pub enum GatewayMode {
    /// Returns the literal `"test"` immediately. No network, no delay.
    Debug,
    Live(Box<dyn CompletionBackend>),
}

/// The single funnel through which every prompt reaches a model. Live calls
/// sleep the rate-limit interval first; there is never more than one
/// in-flight request.
pub struct Gateway {
    mode: GatewayMode,
    rate_limit: Duration,
}

impl Gateway {
    pub fn debug() -> Self {
        Self {
            mode: GatewayMode::Debug,
            rate_limit: Duration::ZERO,
        }
    }

    pub fn live(backend: Box<dyn CompletionBackend>, rate_limit: Duration) -> Self {
        Self {
            mode: GatewayMode::Live(backend),
            rate_limit,
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self.mode, GatewayMode::Debug)
    }

    pub fn query(&self, prompt: &str, params: &ModelParams) -> Result<String, BackendError> {
        match &self.mode {
            GatewayMode::Debug => Ok("test".to_owned()),
            GatewayMode::Live(backend) => {
                std::thread::sleep(self.rate_limit);
                backend.complete(prompt, params)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SweepParams — normalized configuration threaded through a sweep
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct SweepParams {
    pub sweep: ResolvedSweep,
    pub author: String,
    pub api_service: BackendId,
    pub model: ModelParams,
    pub warn: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The operator declined the cost confirmation. Nothing was written.
    Declined,
    Completed(SweepCost),
}

// ---------------------------------------------------------------------------
// Sweep controller
// ---------------------------------------------------------------------------

/// Runs the full sweep: cost estimation, confirmation gate, then the
/// per-item generator over every dataset item. A declined confirmation
/// aborts cleanly with no side effects; any error unwinds the current item
/// and stops the sweep, leaving earlier items' appended records intact.
pub fn run_sweep(
    dataset: &mut Dataset,
    catalog: &TemplateCatalog,
    params: &SweepParams,
    gateway: &Gateway,
    confirm: &dyn ConfirmSweep,
) -> Result<SweepOutcome, SweepError> {
    let cost = params.sweep.cost(dataset);
    if params.warn && !confirm.confirm(&cost) {
        return Ok(SweepOutcome::Declined);
    }
    dataset.try_map_indexed(|item, idx| generate_item(item, idx, catalog, params, gateway))?;
    Ok(SweepOutcome::Completed(cost))
}

// ---------------------------------------------------------------------------
// Per-item generator
// ---------------------------------------------------------------------------

/// Generates CoTs and extracted answers for one item. Iteration order over
/// instructions, triggers and extractions follows the configured list order
/// exactly, so record order is reproducible. Items outside the index range
/// are returned untouched without any gateway call.
pub fn generate_item(
    item: &mut Item,
    idx: usize,
    catalog: &TemplateCatalog,
    params: &SweepParams,
    gateway: &Gateway,
) -> Result<(), SweepError> {
    if !params.sweep.idx_range.contains(idx) {
        return Ok(());
    }

    for instruction in &params.sweep.instructions {
        for cot_trigger in &params.sweep.cot_triggers {
            let prompt = cot_generation_prompt(item, instruction, cot_trigger, catalog)?;
            let cot = gateway.query(&prompt.text, &params.model)?;

            let mut record = GenerationRecord {
                id: Uuid::new_v4(),
                templates_version: prompt.templates_version.clone(),
                instruction: instruction.clone(),
                cot_trigger: cot_trigger.clone(),
                prompt_text: prompt.text,
                cot: cot.clone(),
                answers: Vec::new(),
                author: params.author.clone(),
                date: local_timestamp(),
                api_service: params.api_service.clone(),
                model: params.model.clone(),
                comment: String::new(),
                annotation: Vec::new(),
            };

            for extraction in &params.sweep.answer_extractions {
                // The none sentinel means skip: no extraction call, no record.
                let Some(key) = extraction.key() else {
                    continue;
                };
                let extraction_prompt =
                    answer_extraction_prompt(item, instruction, cot_trigger, &cot, key, catalog)?;
                if extraction_prompt.templates_version != record.templates_version {
                    return Err(TemplateError::VersionMismatch {
                        trigger_version: record.templates_version,
                        extraction_version: extraction_prompt.templates_version,
                    }
                    .into());
                }
                let answer = gateway.query(&extraction_prompt.text, &params.model)?;
                record.answers.push(AnswerRecord {
                    id: Uuid::new_v4(),
                    answer_extraction: extraction.clone(),
                    answer_extraction_text: extraction_prompt.text,
                    answer,
                    correct_answer: None,
                });
            }

            item.generated_cot.push(record);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
