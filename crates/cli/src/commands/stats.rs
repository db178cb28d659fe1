use anyhow::{Context, Result};
use crisprmut_analysis::{all_stats, CrisprArrayRecord};
use crisprmut_sim::genome::CrisprArray;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::args::StatsArgs;
use crate::printing::print_stats_summary;

pub fn array_stats(args: &StatsArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let array = CrisprArray::from_json(&text)
        .with_context(|| format!("{} is not a JSON list of repeats", args.input.display()))?;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);
    let stats = all_stats(&array, &mut rng, args.min_line_length, args.max_gap_length)
        .context("Failed to compute array statistics")?;

    if args.summary {
        println!("📊 Array Statistics: {}", args.input.display());
        print_stats_summary(&stats);
    } else if args.flat {
        let flat = CrisprArrayRecord::new(args.id.clone(), "", stats).as_flat()?;
        println!("{}", serde_json::to_string_pretty(&flat)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}
