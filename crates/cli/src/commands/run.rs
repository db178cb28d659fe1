use anyhow::{bail, Context, Result};
use crisprmut_analysis::{run_single, ArrayStats, CrisprArrayRecord};
use crisprmut_sim::simulation::SimulationConfig;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::args::RunArgs;
use crate::printing::print_parameters;
use crate::utils::ensure_writable;

/// Completion update pushed by the workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// One line of the results file.
#[derive(Debug, Serialize)]
struct RunRecord {
    seed: u64,
    #[serde(flatten)]
    record: CrisprArrayRecord,
}

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    println!("🧬 crisprmut - Running Simulation");
    println!("============================================\n");

    let mut config = SimulationConfig::load(&args.config).with_context(|| {
        format!(
            "Failed to load configuration. Did you run 'crisprmut init -o {}' first?",
            args.config.display()
        )
    })?;
    if let Some(seed) = args.seed {
        config.base_seed = seed;
    }
    if let Some(num_runs) = args.num_runs {
        config.num_runs = num_runs;
    }
    config.validate().context("Invalid overrides")?;
    ensure_writable(&args.output, args.force)?;

    print_parameters(&config);
    println!("Running {} trajectories...", config.num_runs);

    let (tx, rx) = mpsc::channel();
    let reporter = args.progress.then(|| spawn_progress_bar(rx));

    let results = run_batch(&config, tx);
    if let Some(handle) = reporter {
        handle.join().ok();
    }

    let mut runs = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (seed, result) in results {
        match result {
            Ok(stats) => runs.push((seed, stats)),
            Err(e) => {
                warn!("Run with seed {seed} failed: {e}");
                failed += 1;
            }
        }
    }
    if runs.is_empty() && failed > 0 {
        bail!("All {failed} runs failed");
    }
    runs.sort_by_key(|(seed, _)| *seed);

    write_results(&args.output, &config, runs)?;
    write_info(&args.output, &config)?;

    println!("\n✓ Simulation complete!");
    println!("  Successful runs: {}", config.num_runs - failed);
    if failed > 0 {
        println!("  Failed runs: {failed}");
    }
    println!("  Results: {}", args.output.display());

    Ok(())
}

/// Run every seed of `config` in parallel. Each finished run pushes a
/// [`Progress`] into `progress`; a dropped receiver is ignored.
pub fn run_batch(
    config: &SimulationConfig,
    progress: Sender<Progress>,
) -> Vec<(u64, Result<ArrayStats, crisprmut_analysis::StatsError>)> {
    let total = config.num_runs;
    let completed = AtomicUsize::new(0);
    let seeds: Vec<u64> = config.seeds().collect();

    seeds
        .into_par_iter()
        .map_with(progress, |tx, seed| {
            let result = run_single(seed, config).map(|(_, stats)| stats);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            tx.send(Progress {
                completed: done,
                total,
            })
            .ok();
            (seed, result)
        })
        .collect()
}

fn spawn_progress_bar(rx: Receiver<Progress>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let pb = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        for update in rx {
            pb.set_length(update.total as u64);
            pb.set_position(update.completed as u64);
        }
        pb.finish_with_message("Done");
    })
}

fn write_results(path: &Path, config: &SimulationConfig, runs: Vec<(u64, ArrayStats)>) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for (seed, stats) in runs {
        let line = RunRecord {
            seed,
            record: CrisprArrayRecord::new((seed - config.base_seed).to_string(), "", stats),
        };
        serde_json::to_writer(&mut out, &line).context("Failed to serialize run")?;
        writeln!(out)?;
    }
    out.flush()?;
    info!("Wrote results to {}", path.display());
    Ok(())
}

/// Batch summary next to the results, e.g. `results.info.json`.
fn write_info(results: &Path, config: &SimulationConfig) -> Result<()> {
    let path = results.with_extension("info.json");
    let info = serde_json::to_string_pretty(&config.simulation_info())?;
    std::fs::write(&path, info).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crisprmut_sim::simulation::SimulationBuilder;

    #[test]
    fn test_run_batch_reports_progress() {
        let config = SimulationBuilder::new()
            .end_time(5.0)
            .array_dimensions(6, 8)
            .num_runs(10)
            .seed(3)
            .mutation_rate_per_base(0.01)
            .build()
            .unwrap();

        let (tx, rx) = mpsc::channel();
        let results = run_batch(&config, tx);
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|(_, r)| r.is_ok()));

        let mut updates: Vec<Progress> = rx.iter().collect();
        updates.sort_by_key(|p| p.completed);
        assert_eq!(updates.len(), 10);
        assert_eq!(updates.last().map(|p| p.completed), Some(10));
        assert!(updates.iter().all(|p| p.total == 10));
    }

    #[test]
    fn test_run_batch_matches_sequential() {
        let config = SimulationBuilder::new()
            .end_time(5.0)
            .array_dimensions(6, 8)
            .num_runs(4)
            .mutation_rate_per_base(0.05)
            .build()
            .unwrap();
        let (tx, _rx) = mpsc::channel();
        for (seed, result) in run_batch(&config, tx) {
            assert_eq!(result.unwrap(), run_single(seed, &config).unwrap().1);
        }
    }
}
