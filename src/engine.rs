//! The generator: wires the pass pipeline to a seeded RNG manager and runs
//! it over a fresh grid world.

use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::{GenerationMode, MapConfig};
use crate::passes::{
    ClearEdgesPass, DecoratePass, GrowthPass, MirrorPass, Pass, PyramidPass, SeedPass,
};
use crate::rng::RngManager;
use crate::world::GridWorld;

#[derive(Debug, Clone)]
pub struct PassReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub passes: Vec<PassReport>,
    pub block_groups: usize,
    pub defined_columns: usize,
    pub highest_point: u8,
    pub tiles_allocated: u64,
    /// Iteration at which growth ran out of attachment candidates, if it
    /// stopped before its budget.
    pub exhausted_at: Option<u32>,
}

pub struct GeneratorBuilder {
    config: MapConfig,
    passes: Vec<Box<dyn Pass>>,
}

impl GeneratorBuilder {
    pub fn new(config: MapConfig) -> Self {
        Self {
            config,
            passes: Vec::new(),
        }
    }

    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// The standard pipeline for the configured mode.
    pub fn standard(config: MapConfig) -> Self {
        let symmetry = config.symmetry;
        let mode = config.mode;
        let builder = Self::new(config);
        match mode {
            GenerationMode::Pyramid => builder.with_pass(PyramidPass::new()),
            GenerationMode::Building => {
                let builder = builder
                    .with_pass(SeedPass::new())
                    .with_pass(GrowthPass::new());
                let builder = if symmetry {
                    builder.with_pass(MirrorPass::new())
                } else {
                    builder
                };
                builder
                    .with_pass(ClearEdgesPass::new())
                    .with_pass(DecoratePass::new())
            }
        }
    }

    pub fn build(self) -> Generator {
        Generator {
            rng: RngManager::new(self.config.seed),
            config: self.config,
            passes: self.passes,
        }
    }
}

pub struct Generator {
    config: MapConfig,
    rng: RngManager,
    passes: Vec<Box<dyn Pass>>,
}

impl Generator {
    /// Validate the configuration, run every pass with its own named RNG
    /// stream, and verify grid invariants before handing the world out.
    pub fn run(&mut self) -> Result<(GridWorld, GenerationReport)> {
        self.config
            .validate()
            .context("rejecting configuration before generation")?;

        let mut world = GridWorld::new(&self.config, &mut self.rng.stream("world"));
        let mut reports = Vec::with_capacity(self.passes.len());

        for pass in &mut self.passes {
            let start = Instant::now();
            let mut stream = self.rng.stream(pass.name());
            pass.run(&mut world, &mut stream)
                .with_context(|| format!("pass '{}' failed", pass.name()))?;
            reports.push(PassReport {
                name: pass.name(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        world
            .check_invariants()
            .context("grid invariants violated after generation")?;

        let report = GenerationReport {
            passes: reports,
            block_groups: world.block_groups().len(),
            defined_columns: world.defined_count(),
            highest_point: world.highest_point(),
            tiles_allocated: world.tile_id_watermark(),
            exhausted_at: world.growth_exhausted,
        };
        Ok((world, report))
    }
}
