//! The accumulator-driven tick contract: a fixed-step driver owning its
//! own RNG chain and pause/step state, dispatching the ordered stages
//! every tick.

use crate::grid::Grid;
use crate::material::MaterialTable;
use crate::rng::TickRng;
use crate::stages;

/// Per-tick cell-update counters, reset at the start of every tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickStats {
  pub cells_updated: u32,
  pub powder_updated: u32,
  pub fluid_updated: u32,
  pub fire_updated: u32,
  pub gas_updated: u32,
  pub acid_updated: u32,
  pub active_chunks: usize,
}

#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct StageTimings {
  pub powder_micros: u64,
  pub fluid_micros: u64,
  pub fire_micros: u64,
  pub gas_micros: u64,
  pub acid_micros: u64,
  pub thermal_micros: u64,
  pub total_micros: u64,
}

/// Seeds the master RNG from wall time at construction/reset.
fn wall_time_seed() -> u32 {
  use std::time::{SystemTime, UNIX_EPOCH};
  match SystemTime::now().duration_since(UNIX_EPOCH) {
    Ok(d) => (d.as_nanos() as u64 ^ (d.as_nanos() >> 64) as u64) as u32,
    Err(_) => 0x2545_F491,
  }
}

/// Owns the fixed-step accumulator, the RNG chain, pause/step state, and the
/// last tick's stats. Drives the six stages in their declared order.
pub struct TickDriver {
  tick_hz: f32,
  dt: f32,
  accumulator: f32,
  tick_count: u64,
  master: TickRng,
  tick_rng: TickRng,
  paused: bool,
  step_once: bool,
  last_stats: TickStats,
  #[cfg(feature = "tracing")]
  last_timings: StageTimings,
}

impl TickDriver {
  /// Builds a driver at `tick_hz`, with the master RNG seeded from wall
  /// time.
  pub fn create(tick_hz: f32) -> Self {
    Self::with_seed(tick_hz, wall_time_seed())
  }

  /// Builds a driver with an explicit master seed, for deterministic tests
  /// and embedders that want reproducible runs.
  pub fn with_seed(tick_hz: f32, seed: u32) -> Self {
    let mut master = TickRng::new(seed);
    let tick_rng = TickRng::new(master.next_u32());
    Self {
      tick_hz,
      dt: 1.0 / tick_hz,
      accumulator: 0.0,
      tick_count: 0,
      master,
      tick_rng,
      paused: false,
      step_once: false,
      last_stats: TickStats::default(),
      #[cfg(feature = "tracing")]
      last_timings: StageTimings::default(),
    }
  }

  #[inline]
  pub fn tick_count(&self) -> u64 {
    self.tick_count
  }

  #[inline]
  pub fn dt(&self) -> f32 {
    self.dt
  }

  #[inline]
  pub fn is_paused(&self) -> bool {
    self.paused
  }

  #[inline]
  pub fn stats(&self) -> TickStats {
    self.last_stats
  }

  #[cfg(feature = "tracing")]
  #[inline]
  pub fn timings(&self) -> StageTimings {
    self.last_timings
  }

  pub fn set_paused(&mut self, paused: bool) {
    self.paused = paused;
  }

  pub fn toggle_pause(&mut self) {
    self.paused = !self.paused;
  }

  pub fn step_once(&mut self) {
    self.step_once = true;
  }

  /// Reseeds the master RNG from wall time and resets tick count and
  /// accumulator state.
  pub fn reset(&mut self) {
    self.master = TickRng::new(wall_time_seed());
    self.tick_rng = TickRng::new(self.master.next_u32());
    self.accumulator = 0.0;
    self.tick_count = 0;
    self.paused = false;
    self.step_once = false;
    self.last_stats = TickStats::default();
  }

  /// Next raw draw from the current tick's RNG.
  #[inline]
  pub fn rand(&mut self) -> u32 {
    self.tick_rng.next_u32()
  }

  #[inline]
  pub fn randf(&mut self) -> f32 {
    self.tick_rng.next_f32()
  }

  #[inline]
  pub fn rand_range(&mut self, a: i32, b: i32) -> i32 {
    self.tick_rng.range(a, b)
  }

  /// Advances the accumulator by `real_dt` and runs zero or more ticks.
  pub fn update(&mut self, grid: &mut Grid, materials: &MaterialTable, real_dt: f32) {
    if self.paused && !self.step_once {
      return;
    }
    if self.step_once {
      self.tick(grid, materials);
      self.step_once = false;
      return;
    }

    self.accumulator += real_dt;
    let cap = 5.0 * self.dt;
    if self.accumulator > cap {
      self.accumulator = cap;
    }
    while self.accumulator >= self.dt {
      self.tick(grid, materials);
      self.accumulator -= self.dt;
    }
  }

  /// Runs exactly one tick, in the fixed six-stage order.
  pub fn tick(&mut self, grid: &mut Grid, materials: &MaterialTable) {
    let seed = self.master.next_u32();
    self.tick_rng = TickRng::new(seed);

    grid.clear_tick_flags();

    let mut stats = TickStats::default();
    #[cfg(feature = "tracing")]
    let tick_start = std::time::Instant::now();

    stats.powder_updated = self.run_stage(grid, materials, stages::powder::run);
    stats.fluid_updated = self.run_stage(grid, materials, stages::fluid::run);
    stats.fire_updated = self.run_stage(grid, materials, stages::fire::run);
    stats.gas_updated = self.run_stage(grid, materials, stages::gas::run);
    stats.acid_updated = self.run_stage(grid, materials, stages::acid::run);
    stages::thermal::run(grid, materials, &mut self.tick_rng);

    stats.cells_updated =
      stats.powder_updated + stats.fluid_updated + stats.fire_updated + stats.gas_updated + stats.acid_updated;
    stats.active_chunks = grid.update_chunk_activation();

    #[cfg(feature = "tracing")]
    {
      self.last_timings.total_micros = tick_start.elapsed().as_micros() as u64;
      tracing::debug!(tick = self.tick_count, cells_updated = stats.cells_updated, "tick complete");
    }
    #[cfg(not(feature = "tracing"))]
    log::trace!("tick {} complete, {} cells updated", self.tick_count, stats.cells_updated);

    self.last_stats = stats;
    self.tick_count += 1;
  }

  fn run_stage(&mut self, grid: &mut Grid, materials: &MaterialTable, stage: fn(&mut Grid, &MaterialTable, &mut TickRng) -> u32) -> u32 {
    stage(grid, materials, &mut self.tick_rng)
  }
}
