use crisprmut_analysis::ArrayStats;
use crisprmut_sim::evolution::EventGenerator;
use crisprmut_sim::simulation::SimulationConfig;

pub fn print_parameters(config: &SimulationConfig) {
    println!("\n📋 Simulation Configuration");
    println!("  • Runs: {} [-n, --num-runs]", config.num_runs);
    println!(
        "  • Seeds: {}..{} [--seed]",
        config.base_seed,
        config.base_seed + config.num_runs as u64
    );
    println!("  • End Time: {} [-T, --end-time]", config.end_time);
    if !config.meta.is_empty() {
        println!("  • Meta: {}", config.meta);
    }

    println!("\n🧬 Initial Array");
    println!("  • Array Length: {} repeats [-l, --array-length]", config.array_length);
    println!("  • Repeat Length: {} bp [-r, --repeat-length]", config.repeat_length);
    println!("  • Placeholder: {}", config.placeholder);

    println!("\n⚡ Event Generators");
    for generator in &config.generators {
        print_generator(generator);
    }

    println!("\n🔎 Pattern Classification");
    println!("  • Min Line Length: {} [--min-line-length]", config.min_line_length);
    println!("  • Max Gap Length: {} [--max-gap-length]", config.max_gap_length);
    println!();
}

fn print_generator(generator: &EventGenerator) {
    println!("  • {}: rate {}", generator.name(), generator.rate_spec().to_json_value());
    if let serde_json::Value::Object(params) = generator.parameters_json() {
        for (key, value) in params {
            println!("    - {key}: {value}");
        }
    }
}

pub fn print_stats_summary(stats: &ArrayStats) {
    println!("  • Consensus: {}", stats.consensus_repeat);
    println!(
        "  • Size: {} repeats × {} bp",
        stats.array_length, stats.repeat_length
    );
    println!(
        "  • Mutations vs consensus/proximal/distal: {}/{}/{}",
        stats.mutation_count_consensus, stats.mutation_count_proximal, stats.mutation_count_distal
    );
    let patterns: Vec<String> = stats.patterns.iter().map(ToString::to_string).collect();
    if patterns.is_empty() {
        println!("  • Patterns: none");
    } else {
        println!("  • Patterns: {}", patterns.join(", "));
    }
}
