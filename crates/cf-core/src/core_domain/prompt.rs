use crate::core::{Item, TemplateCatalog, TemplateError, TemplateKind, TemplateRef};

// ---------------------------------------------------------------------------
// Prompt composition — pure string assembly, no I/O
// ---------------------------------------------------------------------------

/// A composed prompt together with the catalog version it was built from.
/// The version travels with every composition so a mixed-version catalog is
/// caught instead of silently producing inconsistent records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub templates_version: String,
    pub text: String,
}

/// Renders choices as `"A) first\nB) second\n..."`. Labels come from
/// ordinal position only; more than 26 choices cannot be labeled.
pub fn render_choices(choices: &[String]) -> Result<String, TemplateError> {
    if choices.len() > 26 {
        return Err(TemplateError::TooManyChoices {
            count: choices.len(),
        });
    }
    let lines: Vec<String> = choices
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}) {}", (b'A' + i as u8) as char, text))
        .collect();
    Ok(lines.join("\n"))
}

/// Question stem shared by both prompt forms: optional instruction prefix,
/// question, lettered choices.
fn question_stem(
    item: &Item,
    instruction: &TemplateRef,
    catalog: &TemplateCatalog,
) -> Result<String, TemplateError> {
    let choices = render_choices(&item.choices)?;
    let mut stem = String::new();
    if let Some(key) = instruction.key() {
        stem.push_str(catalog.get(TemplateKind::Instruction, key)?);
        stem.push_str("\n\n");
    }
    stem.push_str(&item.question);
    stem.push('\n');
    stem.push_str(&choices);
    stem.push_str("\n\n");
    Ok(stem)
}

/// Builds the CoT-generation prompt for one (instruction, trigger) pair.
pub fn cot_generation_prompt(
    item: &Item,
    instruction: &TemplateRef,
    cot_trigger: &TemplateRef,
    catalog: &TemplateCatalog,
) -> Result<ComposedPrompt, TemplateError> {
    let mut text = question_stem(item, instruction, catalog)?;
    if let Some(key) = cot_trigger.key() {
        text.push_str(catalog.get(TemplateKind::CotTrigger, key)?);
        text.push('\n');
    }
    Ok(ComposedPrompt {
        templates_version: catalog.version.clone(),
        text,
    })
}

/// Builds the answer-extraction prompt: the CoT prompt, the generated CoT,
/// then the extraction template.
pub fn answer_extraction_prompt(
    item: &Item,
    instruction: &TemplateRef,
    cot_trigger: &TemplateRef,
    cot: &str,
    answer_extraction_key: &str,
    catalog: &TemplateCatalog,
) -> Result<ComposedPrompt, TemplateError> {
    let base = cot_generation_prompt(item, instruction, cot_trigger, catalog)?;
    let mut text = base.text;
    text.push_str(cot);
    text.push('\n');
    text.push_str(catalog.get(TemplateKind::AnswerExtraction, answer_extraction_key)?);
    text.push('\n');
    Ok(ComposedPrompt {
        templates_version: base.templates_version,
        text,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
