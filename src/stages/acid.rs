//! Acid stage: neighbor corrosion scan, self-consumption.
//!
//! Acid's own movement is handled by the fluid stage (Acid's material state
//! is Fluid); this stage only runs the corrosion reaction, generalized from
//! a neighbor-probe swap candidate to a reaction record.

use crate::grid::{CellFlags, Grid};
use crate::iteration::iterate_falling;
use crate::material::behavior::bhv_is_corrodible;
use crate::material::{MaterialId, MaterialTable};
use crate::rng::TickRng;

const CORROSION_CHANCE: f32 = 0.08;
const SMOKE_BYPRODUCT_CHANCE: f32 = 0.5;
const SELF_CONSUME_CHANCE: f32 = 0.5;

pub fn run(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) -> u32 {
  let mut updated = 0u32;
  iterate_falling(grid, rng, |grid, x, y, rng| {
    if grid.get_mat(x, y) != MaterialId::ACID {
      return true;
    }
    if step_cell(grid, materials, rng, x, y) {
      updated += 1;
    }
    true
  });
  updated
}

fn step_cell(grid: &mut Grid, _materials: &MaterialTable, rng: &mut TickRng, x: i32, y: i32) -> bool {
  for dy in -1..=1 {
    for dx in -1..=1 {
      if dx == 0 && dy == 0 {
        continue;
      }
      let (nx, ny) = (x + dx, y + dy);
      if !bhv_is_corrodible(grid.get_mat(nx, ny)) {
        continue;
      }
      if !rng.chance(CORROSION_CHANCE) {
        continue;
      }

      if rng.chance(SMOKE_BYPRODUCT_CHANCE) {
        grid.set_mat(nx, ny, MaterialId::SMOKE);
        grid.set_lifetime(nx, ny, 0);
      } else {
        grid.set_mat(nx, ny, MaterialId::EMPTY);
      }
      grid.add_flag(nx, ny, CellFlags::UPDATED);

      if rng.chance(SELF_CONSUME_CHANCE) {
        grid.set_mat(x, y, MaterialId::EMPTY);
      }
      grid.add_flag(x, y, CellFlags::UPDATED);

      return true;
    }
  }
  false
}
