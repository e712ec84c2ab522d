use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use isoblock::{
    config::{MapConfig, ScenarioLoader},
    engine::GeneratorBuilder,
    snapshot::SnapshotWriter,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural isometric building generator")]
struct Cli {
    /// Path to a scenario YAML file (defaults used when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the growth-iteration budget
    #[arg(long)]
    iterations: Option<u32>,

    /// Write the finished grid as JSON
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => MapConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(iterations) = cli.iterations {
        config.max_block_iterations = iterations;
    }

    let (world, report) = GeneratorBuilder::standard(config).build().run()?;

    println!(
        "Generated {}x{} grid: {} columns in {} groups, highest point {}, {} tiles",
        world.map_width(),
        world.map_length(),
        report.defined_columns,
        report.block_groups,
        report.highest_point,
        report.tiles_allocated,
    );
    if let Some(iteration) = report.exhausted_at {
        println!("Growth ran out of attachment points at iteration {iteration}");
    }
    for pass in &report.passes {
        println!("  {:<12} {:.3} ms", pass.name, pass.duration_ms);
    }

    if let Some(out) = &cli.out {
        let written = SnapshotWriter::write(&world, out)?;
        println!("Snapshot written to {}", written.display());
    }

    Ok(())
}
