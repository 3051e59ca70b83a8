//! The six ordered per-tick stages.
//!
//! Each stage exposes a single `run(grid, materials, rng) -> u32` entry
//! point returning the number of cells it updated, invoked in sequence by
//! [`crate::tick::TickDriver`].

pub mod acid;
pub mod fire;
pub mod fluid;
pub mod gas;
pub mod powder;
pub mod thermal;

use crate::grid::{CellFlags, Grid};
use crate::material::MaterialTable;
use crate::rng::TickRng;

/// The priority-list rise move shared by the fire stage's "rise" step and
/// the gas stage's own movement: straight up, then a randomly-ordered
/// diagonal-up pair, then a randomly-ordered horizontal pair. Returns
/// whether a swap happened.
pub(crate) fn try_gas_priority_move(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng, x: i32, y: i32) -> bool {
  if try_swap_if_empty(grid, materials, x, y, x, y - 1) {
    return true;
  }
  let (first, second) = if rng.coin_flip() { (x - 1, x + 1) } else { (x + 1, x - 1) };
  if try_swap_if_empty(grid, materials, x, y, first, y - 1) {
    return true;
  }
  if try_swap_if_empty(grid, materials, x, y, second, y - 1) {
    return true;
  }
  let (first, second) = if rng.coin_flip() { (x - 1, x + 1) } else { (x + 1, x - 1) };
  if try_swap_if_empty(grid, materials, x, y, first, y) {
    return true;
  }
  try_swap_if_empty(grid, materials, x, y, second, y)
}

pub(crate) fn try_swap_if_empty(grid: &mut Grid, materials: &MaterialTable, sx: i32, sy: i32, tx: i32, ty: i32) -> bool {
  if !grid.in_bounds(tx, ty) || !materials.is_empty(grid.get_mat(tx, ty)) {
    return false;
  }
  grid.swap_cells(sx, sy, tx, ty);
  grid.add_flag(sx, sy, CellFlags::UPDATED);
  grid.add_flag(tx, ty, CellFlags::UPDATED);
  true
}
