//! Fluid stage: gravity fall, horizontal flow, pressure equalization,
//! two-pass dispersion.
//!
//! A left/right probe pattern generalized to column-height pressure
//! equalization and fixed-point horizontal drag.

use crate::fixed::{self, Fixed};
use crate::grid::{CellFlags, Grid};
use crate::iteration::iterate_multi_pass;
use crate::iteration::{HorizontalOrder, VerticalOrder};
use crate::material::{MaterialId, MaterialTable};
use crate::rng::TickRng;

const PRESSURE_CHANCE: f32 = 0.3;
const PRESSURE_THRESHOLD: i32 = 1;

pub fn run(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) -> u32 {
  let mut updated = 0u32;
  iterate_multi_pass(grid, VerticalOrder::BottomUp, HorizontalOrder::Random, 2, true, rng, |grid, x, y, rng| {
    if grid.has_flag(x, y, CellFlags::UPDATED) {
      return true;
    }
    let mat = grid.get_mat(x, y);
    if !materials.is_fluid(mat) {
      return true;
    }
    if step_cell(grid, materials, rng, x, y, mat) {
      updated += 1;
    }
    true
  });
  updated
}

fn step_cell(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng, x: i32, y: i32, mat: MaterialId) -> bool {
  let rec = materials.get(mat);

  let (vx0, vy0) = grid.velocity(x, y);
  let mut vy = vy0 + rec.gravity_step_fixed;
  vy = fixed::mul(vy, rec.drag_factor_fixed);
  vy = fixed::clamp_abs(vy, rec.terminal_velocity_fixed);

  grid.set_velocity(x, y, vx0, vy);

  let mut moved = false;
  let (mut fx, mut fy) = (x, y);

  if vy > 0 {
    let mut n = ((vy.unsigned_abs() >> 8) as i32).clamp(0, 2);
    if n == 0 {
      n = 1;
    }
    let mut cur_y = y;
    let mut advanced = 0;
    for _ in 0..n {
      if passable(grid, materials, x, cur_y + 1) {
        cur_y += 1;
        advanced += 1;
      } else {
        vy = 0;
        grid.set_velocity(x, y, vx0, vy);
        break;
      }
    }
    if advanced > 0 && commit(grid, x, y, x, cur_y) {
      moved = true;
      (fx, fy) = (x, cur_y);
    }
  }

  if !moved && rng.chance(rec.flow_rate) {
    let left_passable = passable(grid, materials, x - 1, y);
    let right_passable = passable(grid, materials, x + 1, y);
    let target = if left_passable && right_passable {
      Some(if rng.coin_flip() { (x - 1, y) } else { (x + 1, y) })
    } else if left_passable {
      Some((x - 1, y))
    } else if right_passable {
      Some((x + 1, y))
    } else {
      None
    };
    if let Some((tx, ty)) = target {
      if commit(grid, x, y, tx, ty) {
        moved = true;
        (fx, fy) = (tx, ty);
      }
    }
  }

  if !moved && rng.chance(PRESSURE_CHANCE) {
    let self_height = column_height(grid, x, y, mat);
    let target = if passable(grid, materials, x - 1, y) && column_height(grid, x - 1, y, mat) < self_height - PRESSURE_THRESHOLD {
      Some((x - 1, y))
    } else if passable(grid, materials, x + 1, y) && column_height(grid, x + 1, y, mat) < self_height - PRESSURE_THRESHOLD {
      Some((x + 1, y))
    } else {
      None
    };
    if let Some((tx, ty)) = target {
      if commit(grid, x, y, tx, ty) {
        moved = true;
        (fx, fy) = (tx, ty);
      }
    }
  }

  let (vx_final, vy_final) = grid.velocity(fx, fy);
  grid.set_velocity(fx, fy, fixed::mul(vx_final, rec.drag_factor_fixed), vy_final);

  moved
}

/// Number of contiguous cells of `mat` starting at `(x, y)` and scanning
/// upward.
fn column_height(grid: &Grid, x: i32, y: i32, mat: MaterialId) -> i32 {
  let mut height = 0;
  let mut cy = y;
  while grid.get_mat(x, cy) == mat {
    height += 1;
    cy -= 1;
  }
  height
}

/// A neighbor is passable for fluid movement only if it is in bounds and
/// the material there is open; off-grid coordinates read as solid.
fn passable(grid: &Grid, materials: &MaterialTable, x: i32, y: i32) -> bool {
  grid.in_bounds(x, y) && materials.passable_for_fluid(grid.get_mat(x, y))
}

fn commit(grid: &mut Grid, sx: i32, sy: i32, tx: i32, ty: i32) -> bool {
  if sx == tx && sy == ty {
    return false;
  }
  grid.swap_cells(sx, sy, tx, ty);
  grid.add_flag(sx, sy, CellFlags::UPDATED);
  grid.add_flag(tx, ty, CellFlags::UPDATED);
  true
}
