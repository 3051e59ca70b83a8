//! Powder stage: gravity integration, multi-step fall, diagonal slide,
//! density displacement, splash.
//!
//! A swap-candidate pattern generalized to fixed-point velocity
//! integration and displacement-with-splash.

use crate::fixed::{self, Fixed};
use crate::grid::{CellFlags, Grid};
use crate::iteration::iterate_falling;
use crate::material::{MaterialId, MaterialTable};
use crate::rng::TickRng;

const SPLASH_VELOCITY_THRESHOLD: f32 = 1.5;
const SPLASH_VX: f32 = 0.8;
const SPLASH_VY: f32 = -0.5;

/// Runs the powder stage once and returns the number of cells updated.
pub fn run(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) -> u32 {
  let mut updated = 0u32;
  iterate_falling(grid, rng, |grid, x, y, rng| {
    if grid.has_flag(x, y, CellFlags::UPDATED) {
      return true;
    }
    let mat = grid.get_mat(x, y);
    if !materials.is_powder(mat) {
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

  if settles(grid, materials, rng, x, y, rec.settle_probability) {
    return false;
  }

  let (_, vy0) = grid.velocity(x, y);
  let mut vy = vy0 + rec.gravity_step_fixed;
  vy = fixed::mul(vy, rec.drag_factor_fixed);
  vy = fixed::clamp_abs(vy, rec.terminal_velocity_fixed);

  let mut n = ((vy.unsigned_abs() >> 8) as i32).clamp(0, 3);
  if n == 0 {
    n = 1;
  }

  let mut advanced = 0i32;
  let mut cur_y = y;
  for _ in 0..n {
    if passable(grid, materials, x, cur_y + 1) {
      cur_y += 1;
      advanced += 1;
    } else {
      vy = 0;
      break;
    }
  }
  grid.set_velocity(x, y, 0, vy);

  if advanced > 0 {
    return execute_movement(grid, materials, rng, x, y, x, cur_y, vy);
  }

  if n != 1 {
    return false;
  }

  let left_passable = passable(grid, materials, x - 1, y + 1);
  let right_passable = passable(grid, materials, x + 1, y + 1);
  if !left_passable && !right_passable {
    return false;
  }
  if left_passable && right_passable && rec.cohesion > 0.0 && rng.chance(rec.cohesion) {
    return false;
  }

  let try_left_first = rng.chance(rec.slide_bias);
  let (tx, ty) = if try_left_first {
    if left_passable {
      (x - 1, y + 1)
    } else {
      (x + 1, y + 1)
    }
  } else if right_passable {
    (x + 1, y + 1)
  } else {
    (x - 1, y + 1)
  };

  execute_movement(grid, materials, rng, x, y, tx, ty, vy)
}

/// Settle shortcut: skip updating when the pile beneath is solid in all
/// three directions.
fn settles(grid: &Grid, materials: &MaterialTable, rng: &mut TickRng, x: i32, y: i32, settle_probability: f32) -> bool {
  if !rng.chance(settle_probability) {
    return false;
  }
  let below_blocked = !passable(grid, materials, x, y + 1);
  let left_blocked = !passable(grid, materials, x - 1, y + 1);
  let right_blocked = !passable(grid, materials, x + 1, y + 1);
  below_blocked && left_blocked && right_blocked
}

/// A neighbor is passable for powder movement only if it is in bounds and
/// the material there is open; off-grid coordinates read as solid.
fn passable(grid: &Grid, materials: &MaterialTable, x: i32, y: i32) -> bool {
  grid.in_bounds(x, y) && materials.passable_for_powder(grid.get_mat(x, y))
}

/// Commits a move from `(sx, sy)` to `(tx, ty)` if the target is Empty, or a
/// less-dense Fluid/Gas (density displacement, with splash). Returns whether
/// a move happened.
fn execute_movement(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng, sx: i32, sy: i32, tx: i32, ty: i32, vy: Fixed) -> bool {
  let source_mat = grid.get_mat(sx, sy);
  let target_mat = grid.get_mat(tx, ty);

  let can_move = materials.is_empty(target_mat)
    || ((materials.is_fluid(target_mat) || materials.is_gas(target_mat))
      && materials.get(source_mat).density > materials.get(target_mat).density);
  if !can_move {
    return false;
  }

  let displaced_is_fluid = materials.is_fluid(target_mat);
  grid.swap_cells(sx, sy, tx, ty);
  grid.add_flag(sx, sy, CellFlags::UPDATED);
  grid.add_flag(tx, ty, CellFlags::UPDATED);

  if displaced_is_fluid && fixed::to_float(vy).abs() > SPLASH_VELOCITY_THRESHOLD {
    try_splash(grid, materials, rng, sx, sy, tx, ty, target_mat);
  }

  true
}

/// After a powder swap, the displaced fluid now sits at `(sx, sy)`. Try to
/// splash a copy one cell up and one cell sideways from where the powder
/// landed.
fn try_splash(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng, sx: i32, sy: i32, tx: i32, ty: i32, fluid_mat: MaterialId) {
  let dir = if rng.coin_flip() { 1 } else { -1 };
  let splash_x = tx + dir;
  let splash_y = ty - 1;
  let splash_target = grid.get_mat(splash_x, splash_y);
  if !(materials.is_empty(splash_target) || materials.is_gas(splash_target)) {
    return;
  }
  let color_seed = grid.color_seed(sx, sy);
  grid.set_mat(splash_x, splash_y, fluid_mat);
  grid.set_color_seed(splash_x, splash_y, color_seed);
  grid.set_velocity(splash_x, splash_y, fixed::to_fixed(dir as f32 * SPLASH_VX), fixed::to_fixed(SPLASH_VY));
  grid.add_flag(splash_x, splash_y, CellFlags::UPDATED);
}
