use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn crisprmut() -> Command {
    Command::cargo_bin("crisprmut").unwrap()
}

fn init_small(config: &Path) {
    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(config)
        .args(["--end-time", "10", "--array-length", "8", "--repeat-length", "12"])
        .args(["--num-runs", "6", "--seed", "5"])
        .args(["--mutation-rate", "0.01", "--deletion-rate", "0.02"])
        .assert()
        .success();
}

fn read_lines(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn test_init_creates_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Simulation initialized successfully!",
        ));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(json["array_length"], 20);
    assert_eq!(json["repeat_length"], 36);
    assert_eq!(json["num_runs"], 100);
    assert_eq!(json["generators"].as_array().unwrap().len(), 3);
}

#[test]
fn test_init_params_are_printed() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--num-runs", "7", "--array-length", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Runs: 7"))
        .stdout(predicate::str::contains("Array Length: 11 repeats"));
}

#[test]
fn test_init_refuses_overwrite() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");
    init_small(&config);

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_init_rejects_invalid_parameters() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--mean-block-deletion-length", "0.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mean_block_deletion_length"));

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--split-offset", "-3"])
        .assert()
        .failure();

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--mutation-rate", "0", "--insertion-rate", "0", "--deletion-rate", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generators"));

    assert!(!config.exists());
}

#[test]
fn test_init_optional_generators() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");

    crisprmut()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--indel-rate", "0.01", "--distal-insertion", "--split-offset", "2"])
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    let generators = json["generators"].as_array().unwrap();
    assert_eq!(generators.len(), 4);
    assert_eq!(generators[1]["parameters"]["anchor"], "distal");
    assert_eq!(generators[2]["parameters"]["split_offset"], 2);
    assert_eq!(generators[3]["kind"], "InsertionDeletion");
}

#[test]
fn test_run_writes_sorted_results() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");
    let results = temp.path().join("results.jsonl");
    init_small(&config);

    crisprmut()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation complete!"));

    let lines = read_lines(&results);
    assert_eq!(lines.len(), 6);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line["seed"], 5 + i as u64);
        assert_eq!(line["id"], i.to_string());
        assert_eq!(line["stats"]["repeat_length"], 12);
    }
    assert!(temp.path().join("results.info.json").exists());
}

#[test]
fn test_run_is_reproducible_across_thread_counts() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");
    let a = temp.path().join("a.jsonl");
    let b = temp.path().join("b.jsonl");
    init_small(&config);

    for (threads, out) in [("1", &a), ("4", &b)] {
        crisprmut()
            .args(["--threads", threads, "run"])
            .arg("--config")
            .arg(&config)
            .arg("--output")
            .arg(out)
            .assert()
            .success();
    }
    assert_eq!(
        std::fs::read_to_string(&a).unwrap(),
        std::fs::read_to_string(&b).unwrap()
    );
}

#[test]
fn test_run_overrides() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("sim.json");
    let results = temp.path().join("results.jsonl");
    init_small(&config);

    crisprmut()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&results)
        .args(["--seed", "100", "--num-runs", "2", "--progress"])
        .assert()
        .success();

    let lines = read_lines(&results);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["seed"], 100);
    assert_eq!(lines[1]["id"], "1");

    crisprmut()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&results)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_run_missing_config() {
    let temp = tempdir().unwrap();
    crisprmut()
        .arg("run")
        .arg("--config")
        .arg(temp.path().join("missing.json"))
        .arg("--output")
        .arg(temp.path().join("out.jsonl"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_stats_json() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("array.json");
    std::fs::write(
        &input,
        r#"["AAAAAA", "AACAAA", "AAGAAA", "AATAAA", "AAAAAA"]"#,
    )
    .unwrap();

    let output = crisprmut()
        .arg("stats")
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["consensus_repeat"], "AAAAAA");
    assert_eq!(stats["array_length"], 5);
    assert_eq!(stats["mutation_count_consensus"], 3);
    assert_eq!(stats["patterns"], serde_json::json!([2]));
}

#[test]
fn test_stats_flat_and_summary() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("array.json");
    std::fs::write(&input, r#"["ACGT", "ACGT", "TCGT"]"#).unwrap();

    crisprmut()
        .arg("stats")
        .arg("--input")
        .arg(&input)
        .args(["--flat", "--id", "array-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"array-1\""))
        .stdout(predicate::str::contains("\"patterns\": \"[]\""));

    crisprmut()
        .arg("stats")
        .arg("--input")
        .arg(&input)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Consensus: ACGT"))
        .stdout(predicate::str::contains("Patterns: none"));
}

#[test]
fn test_stats_rejects_invalid_array() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("array.json");
    std::fs::write(&input, r#"["ACGX"]"#).unwrap();

    crisprmut()
        .arg("stats")
        .arg("--input")
        .arg(&input)
        .assert()
        .failure();
}
