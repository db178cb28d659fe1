use anyhow::{Context, Result};
use crisprmut_sim::evolution::{
    Anchor, DeletionParameters, InsertionDeletionParameters, InsertionParameters, Rate,
};
use crisprmut_sim::simulation::{SimulationBuilder, SimulationConfig};
use log::info;

use crate::args::InitArgs;
use crate::printing::print_parameters;
use crate::utils::ensure_writable;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;

    println!("🧬 crisprmut - CRISPR Array Mutation Simulator");
    println!("============================================\n");

    let config = build_config(args)?;
    print_parameters(&config);

    let json = config
        .to_json()
        .context("Failed to serialize configuration")?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote configuration to {}", args.output.display());

    println!("✓ Simulation initialized successfully!");
    println!(
        "\n💡 Use 'crisprmut run -c {}' to start the runs",
        args.output.display()
    );
    Ok(())
}

pub fn build_config(args: &InitArgs) -> Result<SimulationConfig> {
    let mut builder = SimulationBuilder::new()
        .end_time(args.end_time)
        .array_dimensions(args.array_length, args.repeat_length)
        .num_runs(args.num_runs)
        .seed(args.seed)
        .pattern_thresholds(args.min_line_length, args.max_gap_length)
        .meta(args.meta.clone());

    if args.mutation_rate > 0.0 {
        builder = builder.mutation_rate_per_base(args.mutation_rate);
    }
    if args.insertion_rate > 0.0 {
        let anchor = if args.distal_insertion {
            Anchor::Distal
        } else {
            Anchor::Proximal
        };
        builder = builder.insertion(
            InsertionParameters {
                anchor,
                ..Default::default()
            },
            Rate::Constant(args.insertion_rate),
        );
    }
    if args.deletion_rate > 0.0 {
        builder = builder.deletion(
            DeletionParameters {
                leader_offset: args.leader_offset,
                distal_offset: args.distal_offset,
                split_offset: args.split_offset,
                mean_block_deletion_length: args.mean_block_deletion_length,
            },
            Rate::PerRepeat(args.deletion_rate),
        );
    }
    if args.indel_rate > 0.0 {
        builder = builder.insertion_deletion(
            InsertionDeletionParameters {
                leader_offset: args.leader_offset,
                distal_offset: args.distal_offset,
                split_offset: args.split_offset,
                ..Default::default()
            },
            Rate::PerRepeat(args.indel_rate),
        );
    }

    builder.build().context("Invalid simulation configuration")
}
