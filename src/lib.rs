pub mod color;
pub mod column;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod passes;
pub mod primitives;
pub mod rng;
pub mod snapshot;
pub mod tile;
pub mod topology;
pub mod world;

pub use config::{ConfigError, GenerationMode, MapConfig, ScenarioLoader};
pub use engine::{GenerationReport, Generator, GeneratorBuilder};
pub use world::{GridWorld, HeightVariation, WorldError};
