use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Dataset, DatasetError, Item, TaskType};

// ---------------------------------------------------------------------------
// Answer normalization
// ---------------------------------------------------------------------------

// A bare letter, optionally wrapped in (), [] or {} and followed by
// trailing punctuation: "E", "E.", "(E)", "[e]", "{e}".
static BARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[\(\[\{]?\s*([a-z])\s*[\)\]\}]?\s*[.:]?\s*$").expect("bare pattern")
});

// Boilerplate preceding the letter: "So the answer is B", "Therefore,
// among A through F, the correct answer is B", "Answer B", "answer isB".
static LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:therefore\s*,?\s*)?(?:among\s+[a-z]\s+through\s+[a-z]\s*,?\s*)?(?:so\s+)?(?:the\s+)?(?:correct\s+)?answer\s*(?:is)?\s*[\(\[\{]?([a-z])[\)\]\}]?\s*\.?\s*$",
    )
    .expect("leading pattern")
});

// Boilerplate following the letter: "B is the answer", "B is the correct
// answer.", "B is right".
static TRAILING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*[\(\[\{]?([a-z])[\)\]\}]?\s+is\s+(?:the\s+(?:correct\s+|right\s+)?answer|correct|right)\s*\.?\s*$",
    )
    .expect("trailing pattern")
});

/// Reduces a raw model completion to a bare upper-case choice label. When
/// no pattern applies the original text comes back unchanged; that is the
/// designed fallback, not a failure.
pub fn clean(task: TaskType, raw: &str, n_choices: usize) -> String {
    match task {
        TaskType::MultipleChoice => clean_multiple_choice(raw, n_choices),
    }
}

fn clean_multiple_choice(raw: &str, n_choices: usize) -> String {
    for pattern in [&*BARE, &*LEADING, &*TRAILING] {
        if let Some(caps) = pattern.captures(raw) {
            if let Some(letter) = caps[1].chars().next() {
                let letter = letter.to_ascii_uppercase();
                if ((letter as u8 - b'A') as usize) < n_choices {
                    return letter.to_string();
                }
            }
        }
    }
    raw.to_owned()
}

/// Case-insensitive equality of a cleaned predicted label against the
/// ground-truth label.
pub fn is_correct(task: TaskType, predicted: &str, truth: &str) -> bool {
    match task {
        TaskType::MultipleChoice => predicted.eq_ignore_ascii_case(truth),
    }
}

// ---------------------------------------------------------------------------
// Grading pass
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GradeSummary {
    pub graded: usize,
    pub correct: usize,
}

impl GradeSummary {
    pub fn accuracy(&self) -> Option<f64> {
        if self.graded == 0 {
            None
        } else {
            Some(self.correct as f64 / self.graded as f64)
        }
    }
}

/// Ground-truth choice label for an item: a single-letter `answer` is taken
/// verbatim, any other text must match one of the choices. `None` for
/// unlabeled items.
pub fn true_label(item: &Item) -> Result<Option<String>, DatasetError> {
    let Some(answer) = &item.answer else {
        return Ok(None);
    };
    let mut chars = answer.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Ok(Some(c.to_ascii_uppercase().to_string()));
        }
    }
    let position = item
        .choices
        .iter()
        .position(|choice| choice == answer)
        .ok_or_else(|| DatasetError::AnswerNotInChoices {
            answer: answer.clone(),
        })?;
    Ok(Some(((b'A' + position as u8) as char).to_string()))
}

/// Fills `correct_answer` on every extracted answer of one item and counts
/// matches. Unlabeled items are left untouched.
pub fn grade_item(task: TaskType, item: &mut Item) -> Result<GradeSummary, DatasetError> {
    let Some(truth) = true_label(item)? else {
        return Ok(GradeSummary::default());
    };
    let n_choices = item.choices.len();
    let mut summary = GradeSummary::default();
    for record in &mut item.generated_cot {
        for answer in &mut record.answers {
            let predicted = clean(task, &answer.answer, n_choices);
            answer.correct_answer = Some(truth.clone());
            summary.graded += 1;
            if is_correct(task, &predicted, &truth) {
                summary.correct += 1;
            }
        }
    }
    Ok(summary)
}

/// Grades a whole dataset, returning the aggregate summary.
pub fn grade_dataset(task: TaskType, dataset: &mut Dataset) -> Result<GradeSummary, DatasetError> {
    let mut total = GradeSummary::default();
    dataset.try_map_indexed(|item, _idx| {
        let summary = grade_item(task, item)?;
        total.graded += summary.graded;
        total.correct += summary.correct;
        Ok(())
    })?;
    Ok(total)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
