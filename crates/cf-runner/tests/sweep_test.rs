use cf_core::core::{
    run_sweep, AlwaysConfirm, Dataset, Gateway, ResolvedSweep, SweepOutcome, SweepParams,
    TemplateCatalog,
};
use cf_runner::bootstrap::into_runtime;
use cf_runner::config::AppConfig;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn fixture_catalog() -> TemplateCatalog {
    TemplateCatalog::from_json(
        r#"{
            "version": "0.01",
            "instructions": {
                "qa-01": "Answer the following question through step-by-step reasoning."
            },
            "cot-triggers": {
                "kojima-01": "Answer: Let's think step by step."
            },
            "answer-extractions": {
                "kojima-A-C": "Therefore, among A through C, the answer is"
            }
        }"#,
    )
    .expect("fixture catalog")
}

fn fixture_dataset() -> Dataset {
    Dataset::from_json(
        r#"{
            "train": [
                {"question": "2+2?", "choices": ["3", "4", "5"], "answer": "4"},
                {"question": "1+1?", "choices": ["2", "3", "4"], "answer": "2"}
            ],
            "test": [
                {"question": "3+3?", "choices": ["5", "6", "7"], "answer": "6"}
            ]
        }"#,
    )
    .expect("fixture dataset")
}

fn sweep_params_from_toml(toml_str: &str, catalog: &TemplateCatalog) -> SweepParams {
    let config: AppConfig = toml::from_str(toml_str).expect("fixture config");
    let runtime = into_runtime(config).expect("valid runtime");
    SweepParams {
        sweep: ResolvedSweep::resolve(
            runtime.idx_range,
            &runtime.instruction_keys,
            &runtime.cot_trigger_keys,
            &runtime.answer_extraction_keys,
            catalog,
        ),
        author: runtime.author,
        api_service: runtime.api_service,
        model: runtime.model,
        warn: runtime.warn,
    }
}

// ---------------------------------------------------------------------------
// End-to-end debug sweep
// ---------------------------------------------------------------------------

#[test]
fn test_debug_sweep_over_splits() {
    let catalog = fixture_catalog();
    let mut dataset = fixture_dataset();
    let params = sweep_params_from_toml(
        r#"
[generation]
author = "tester"
warn = false
"#,
        &catalog,
    );

    let outcome = run_sweep(
        &mut dataset,
        &catalog,
        &params,
        &Gateway::debug(),
        &AlwaysConfirm,
    )
    .expect("debug sweep");

    // 3 items x 2 instructions (none + qa-01) x 2 triggers (none + kojima-01)
    // CoT calls, each with 1 real extraction key (plus the skipped sentinel).
    let SweepOutcome::Completed(cost) = outcome else {
        panic!("sweep should complete");
    };
    assert_eq!(cost.n_samples, 3);
    assert_eq!(cost.n_cot_calls, 12);
    assert_eq!(cost.n_extraction_calls, 24);
    assert_eq!(cost.n_total, 36);

    let Dataset::Splits(splits) = &dataset else {
        panic!("fixture is a split dataset");
    };
    for items in splits.values() {
        for item in items {
            assert_eq!(item.generated_cot.len(), 4);
            for record in &item.generated_cot {
                assert_eq!(record.cot, "test");
                assert_eq!(record.author, "tester");
                assert_eq!(record.templates_version, "0.01");
                assert_eq!(record.api_service.as_str(), "openai");
                assert_eq!(record.model.name.as_str(), "text-davinci-002");
                assert_eq!(record.answers.len(), 1);
                assert_eq!(record.answers[0].answer, "test");
            }
        }
    }
}

#[test]
fn test_idx_range_limits_sweep_per_split() {
    let catalog = fixture_catalog();
    let mut dataset = fixture_dataset();
    let params = sweep_params_from_toml(
        r#"
[generation]
warn = false

[sweep]
idx_range = [0, 1]
instruction_keys = []
cot_trigger_keys = ["kojima-01"]
answer_extraction_keys = []
"#,
        &catalog,
    );

    run_sweep(
        &mut dataset,
        &catalog,
        &params,
        &Gateway::debug(),
        &AlwaysConfirm,
    )
    .expect("debug sweep");

    let Dataset::Splits(splits) = &dataset else {
        panic!("fixture is a split dataset");
    };
    // First item of each split gets one record, the rest stay untouched.
    assert_eq!(splits["train"][0].generated_cot.len(), 1);
    assert_eq!(splits["train"][1].generated_cot.len(), 0);
    assert_eq!(splits["test"][0].generated_cot.len(), 1);
}

// ---------------------------------------------------------------------------
// Persisted record schema
// ---------------------------------------------------------------------------

#[test]
fn test_generated_records_round_trip_through_json() {
    let catalog = fixture_catalog();
    let mut dataset = fixture_dataset();
    let params = sweep_params_from_toml(
        r#"
[generation]
warn = false

[sweep]
instruction_keys = []
"#,
        &catalog,
    );

    run_sweep(
        &mut dataset,
        &catalog,
        &params,
        &Gateway::debug(),
        &AlwaysConfirm,
    )
    .expect("debug sweep");

    let json = serde_json::to_string_pretty(&dataset).expect("serialize dataset");
    let reloaded = Dataset::from_json(&json).expect("reload dataset");
    assert_eq!(reloaded.len(), dataset.len());

    // Spot-check the none sentinel's serialized form.
    let value: serde_json::Value = serde_json::from_str(&json).expect("json value");
    let record = &value["train"][0]["generated_cot"][0];
    assert_eq!(record["instruction"], "none");
    assert_eq!(record["cot_trigger"], "none");
    assert_eq!(record["cot"], "test");
    assert!(record["id"].is_string());
    assert!(record["date"].is_string());
    assert_eq!(record["model"]["max_tokens"], 128);
    assert_eq!(record["answers"][0]["answer_extraction"], "kojima-A-C");
    assert_eq!(record["answers"][0]["correct_answer"], serde_json::Value::Null);
}
