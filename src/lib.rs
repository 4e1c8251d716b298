//! Diffusion-limited aggregation: random walkers freeze onto a growing aggregate when
//! they step next to it.
//!
//! [`AggregationEngine`] owns all simulation state. A front end feeds it
//! [`InputEvent`]s, calls [`AggregationEngine::tick`] once per frame and draws the
//! [`RenderView`] it hands back.

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod particle;
pub mod population;
pub mod renderer;
pub mod seed;
pub mod simulation;
pub mod spatial;
pub mod utils;

pub use aggregate::Aggregate;
pub use config::{SeedMode, SimulationConfig, WalkScheduling};
pub use display::{DisplayMode, InputEvent, RenderView, Telemetry};
pub use error::{ConfigError, RendererError};
pub use particle::{Category, Particle, RandomWalk};
pub use population::WalkerPopulation;
pub use seed::SeedGenerator;
pub use simulation::AggregationEngine;
pub use spatial::{CellEncoding, CellKey, NeighborhoodMode, SpatialIndex};
