//! Generation passes, run in sequence by the engine. Each pass owns one
//! named RNG stream and mutates the single `GridWorld` instance.

mod decorate;
mod growth;
mod mirror;
mod pyramid;
mod seed;

pub use decorate::DecoratePass;
pub use growth::GrowthPass;
pub use mirror::{ClearEdgesPass, MirrorPass};
pub use pyramid::PyramidPass;
pub use seed::SeedPass;

use anyhow::Result;

use crate::rng::SystemRng;
use crate::world::GridWorld;

pub trait Pass {
    fn name(&self) -> &'static str;
    fn run(&mut self, world: &mut GridWorld, rng: &mut SystemRng<'_>) -> Result<()>;
}

/// Scaling factor between consecutive block footprints.
pub(crate) const GOLDEN_RATIO: f32 = 1.618_034;
