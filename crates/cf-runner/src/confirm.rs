use std::io::{self, Write};

use cf_core::core::{ConfirmSweep, SweepCost};
use colored::Colorize;

fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(input.trim().to_owned())),
        Err(err) => Err(err),
    }
}

/// Interactive cost gate: prints the computed call counts and requires an
/// explicit `y` before a sweep may spend API credit. Anything else, EOF
/// included, declines.
pub struct StdinConfirm;

impl ConfirmSweep for StdinConfirm {
    fn confirm(&self, cost: &SweepCost) -> bool {
        println!(
            "{}",
            "You are about to call a model API which produces costs.".yellow()
        );
        println!(
            "Due to your settings you are about to call the API in total {} times.",
            cost.n_total.to_string().bold()
        );
        println!(
            "Calls for CoT generation: n_samples * n_instruction_keys * n_cot_trigger_keys = {}",
            cost.n_cot_calls
        );
        println!(
            "Calls for answer extraction: n_cot_calls * n_answer_extraction_keys = {}",
            cost.n_extraction_calls
        );

        match prompt_line("Do you want to continue? y/n ") {
            Ok(Some(answer)) => answer.eq_ignore_ascii_case("y"),
            Ok(None) => {
                println!();
                false
            }
            Err(err) => {
                eprintln!("{}", format!("Error: failed to read confirmation: {err}").red());
                false
            }
        }
    }
}
