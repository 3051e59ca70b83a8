//! `Simulation`: the façade an embedder drives. Owns the world buffer and
//! wires painting, ticking, and snapshotting together without any
//! rendering or engine dependency.

use crate::config::SimConfig;
use crate::error::GridError;
use crate::grid::{CellView, Grid};
use crate::material::{MaterialId, MaterialTable};
use crate::tick::{TickDriver, TickStats};

/// Owns the grid, the process-wide material table, and the tick driver.
/// This is the type an embedder constructs once and drives every frame.
pub struct Simulation {
  grid: Grid,
  materials: MaterialTable,
  driver: TickDriver,
}

impl Simulation {
  /// Builds a simulation from explicit dimensions, tick rate, and seed.
  pub fn new(width: u32, height: u32, tick_hz: f32, seed: u32) -> Result<Self, GridError> {
    let grid = Grid::new(width, height, seed as u64)?;
    log::debug!("simulation created: {width}x{height} at {tick_hz}Hz, seed={seed}");
    Ok(Self {
      grid,
      materials: MaterialTable::new(),
      driver: TickDriver::with_seed(tick_hz, seed),
    })
  }

  /// Builds a simulation from a [`SimConfig`].
  pub fn from_config(config: SimConfig) -> Result<Self, GridError> {
    Self::new(config.width, config.height, config.tick_hz, config.seed)
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.grid.width()
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.grid.height()
  }

  #[inline]
  pub fn tick_count(&self) -> u64 {
    self.driver.tick_count()
  }

  #[inline]
  pub fn stats(&self) -> TickStats {
    self.driver.stats()
  }

  #[inline]
  pub fn materials(&self) -> &MaterialTable {
    &self.materials
  }

  #[inline]
  pub fn grid(&self) -> &Grid {
    &self.grid
  }

  /// Paints a Bresenham stroke between two points. Applied immediately; intended to be called between ticks.
  pub fn paint_stroke(&mut self, prev: (i32, i32), curr: (i32, i32), radius: i32, material: MaterialId) {
    self.grid.paint_line(prev.0, prev.1, curr.0, curr.1, radius, material);
  }

  /// Clears every cell back to Empty.
  pub fn clear_world(&mut self) {
    self.grid.clear();
  }

  pub fn set_paused(&mut self, paused: bool) {
    self.driver.set_paused(paused);
  }

  pub fn toggle_pause(&mut self) {
    self.driver.toggle_pause();
  }

  pub fn is_paused(&self) -> bool {
    self.driver.is_paused()
  }

  pub fn step_once(&mut self) {
    self.driver.step_once();
    self.driver.update(&mut self.grid, &self.materials, 0.0);
  }

  /// Advances the simulation by `real_dt` seconds.
  pub fn update(&mut self, real_dt: f32) {
    self.driver.update(&mut self.grid, &self.materials, real_dt);
  }

  /// Read-only per-cell snapshot for rendering.
  pub fn frame_snapshot(&self) -> impl Iterator<Item = CellView> + '_ {
    self.grid.frame_snapshot(&self.materials)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn construction_rejects_degenerate_dimensions() {
    assert!(Simulation::new(0, 10, 120.0, 1).is_err());
  }

  #[test]
  fn from_config_matches_new() {
    let cfg = SimConfig {
      width: 16,
      height: 16,
      tick_hz: 60.0,
      seed: 5,
    };
    let sim = Simulation::from_config(cfg).unwrap();
    assert_eq!(sim.width(), 16);
    assert_eq!(sim.height(), 16);
  }

  #[test]
  fn paint_stroke_places_material() {
    let mut sim = Simulation::new(16, 16, 120.0, 1).unwrap();
    sim.paint_stroke((0, 0), (5, 0), 0, MaterialId::SAND);
    assert_eq!(sim.grid().get_mat(3, 0), MaterialId::SAND);
  }

  #[test]
  fn step_once_advances_exactly_one_tick_while_paused() {
    let mut sim = Simulation::new(8, 8, 120.0, 1).unwrap();
    sim.set_paused(true);
    sim.step_once();
    assert_eq!(sim.tick_count(), 1);
  }

  #[test]
  fn clear_world_removes_all_material() {
    let mut sim = Simulation::new(8, 8, 120.0, 1).unwrap();
    sim.paint_stroke((1, 1), (1, 1), 0, MaterialId::STONE);
    sim.clear_world();
    assert_eq!(sim.grid().get_mat(1, 1), MaterialId::EMPTY);
  }

  #[test]
  fn frame_snapshot_covers_every_cell() {
    let sim = Simulation::new(4, 4, 120.0, 1).unwrap();
    assert_eq!(sim.frame_snapshot().count(), 16);
  }
}
