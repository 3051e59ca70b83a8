//! Fire stage: lifetime aging, death products, spread, smoke emission,
//! upward movement.
//!
//! Reuses the shared rise priority walk for the upward-movement step,
//! adding its own lifetime/death/spread logic on top.

use crate::grid::{CellFlags, Grid};
use crate::iteration::iterate_falling;
use crate::material::behavior::bhv_is_flammable;
use crate::material::{MaterialId, MaterialTable};
use crate::rng::TickRng;
use crate::stages::try_gas_priority_move;

const FIRE_DIE_CHANCE: f32 = 0.02;
const FIRE_MAX_LIFETIME: u8 = 120;
const FIRE_SMOKE_EMIT_CHANCE: f32 = 0.15;
const FIRE_SPREAD_CHANCE: f32 = 0.03;
const FIRE_RISE_CHANCE: f32 = 0.6;

pub fn run(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) -> u32 {
  let mut updated = 0u32;
  iterate_falling(grid, rng, |grid, x, y, rng| {
    if grid.has_flag(x, y, CellFlags::UPDATED) || grid.get_mat(x, y) != MaterialId::FIRE {
      return true;
    }
    if step_cell(grid, materials, rng, x, y) {
      updated += 1;
    }
    true
  });
  updated
}

fn step_cell(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng, x: i32, y: i32) -> bool {
  grid.increment_lifetime(x, y);
  let lifetime = grid.lifetime(x, y);

  if rng.chance(FIRE_DIE_CHANCE) || lifetime >= FIRE_MAX_LIFETIME {
    die(grid, rng, x, y);
    return true;
  }

  if rng.chance(FIRE_SMOKE_EMIT_CHANCE) && materials.is_empty(grid.get_mat(x, y - 1)) {
    grid.set_mat(x, y - 1, MaterialId::SMOKE);
    grid.add_flag(x, y - 1, CellFlags::UPDATED);
  }

  for dy in -1..=1 {
    for dx in -1..=1 {
      if dx == 0 && dy == 0 {
        continue;
      }
      if rng.chance(FIRE_SPREAD_CHANCE) {
        let (nx, ny) = (x + dx, y + dy);
        if bhv_is_flammable(grid.get_mat(nx, ny)) {
          grid.set_mat(nx, ny, MaterialId::FIRE);
          grid.add_flag(nx, ny, CellFlags::BURNING);
        }
      }
    }
  }

  if rng.chance(FIRE_RISE_CHANCE) {
    try_gas_priority_move(grid, materials, rng, x, y);
  }

  grid.add_flag(x, y, CellFlags::UPDATED);
  true
}

fn die(grid: &mut Grid, rng: &mut TickRng, x: i32, y: i32) {
  let r = rng.next_f32();
  let result = if r < 0.30 {
    MaterialId::ASH
  } else if r < 0.80 {
    MaterialId::SMOKE
  } else {
    MaterialId::EMPTY
  };
  grid.remove_flag(x, y, CellFlags::BURNING);
  grid.set_mat(x, y, result);
  grid.set_lifetime(x, y, 0);
  grid.add_flag(x, y, CellFlags::UPDATED);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fire_ages_and_eventually_dies() {
    let mut grid = Grid::new(3, 3, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(19);
    grid.set_mat(1, 1, MaterialId::FIRE);
    for _ in 0..200 {
      run(&mut grid, &materials, &mut rng);
      grid.clear_tick_flags();
      if grid.get_mat(1, 1) != MaterialId::FIRE {
        break;
      }
    }
    assert_ne!(grid.get_mat(1, 1), MaterialId::FIRE);
  }

  #[test]
  fn fire_spreads_to_adjacent_wood() {
    let mut grid = Grid::new(3, 3, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(4);
    grid.set_mat(1, 1, MaterialId::FIRE);
    grid.set_mat(1, 0, MaterialId::WOOD);
    let mut spread = false;
    for _ in 0..100 {
      run(&mut grid, &materials, &mut rng);
      grid.clear_tick_flags();
      if grid.get_mat(1, 0) == MaterialId::FIRE {
        spread = true;
        break;
      }
    }
    assert!(spread);
  }
}
