//! A deterministic falling-sand tick engine: a chunked grid of materials
//! advanced through six ordered stages (powder, fluid, fire, gas, acid,
//! thermal) under a fixed-step accumulator and a single reseeded-per-tick
//! RNG.
//!
//! A standalone library with no rendering or ECS dependency: an embedder
//! owns a [`sim::Simulation`], paints into it, calls `update`/`step_once`
//! each frame, and reads back a [`grid::CellView`] snapshot to draw.

pub mod config;
pub mod error;
pub mod fixed;
pub mod grid;
pub mod iteration;
pub mod material;
pub mod rng;
pub mod sim;
pub mod stages;
pub mod tick;

pub use config::SimConfig;
pub use error::{ConfigError, GridError};
pub use grid::{CellFlags, CellView, Grid};
pub use material::{MaterialId, MaterialRecord, MaterialState, MaterialTable};
pub use sim::Simulation;
pub use tick::{TickDriver, TickStats};
