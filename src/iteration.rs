//! Ordered grid traversal honoring the chunk activation mask.
//!
//! A sweep-order pattern generalized from a single fixed scan direction to
//! the four direction combinations stages need, plus chunk-mask skipping.

use crate::grid::Grid;
use crate::rng::TickRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalOrder {
  TopDown,
  BottomUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HorizontalOrder {
  LeftRight,
  RightLeft,
  Random,
}

/// Resolves `Random` by consuming exactly one bit from `rng`, once per
/// traversal invocation.
fn resolve_horizontal(order: HorizontalOrder, rng: &mut TickRng) -> bool {
  match order {
    HorizontalOrder::LeftRight => true,
    HorizontalOrder::RightLeft => false,
    HorizontalOrder::Random => rng.coin_flip(),
  }
}

/// Visits every `(x, y)` exactly once in the given order, skipping cells
/// whose containing chunk is inactive. `visit` returning `false` aborts the
/// remainder of the traversal. The same RNG used to resolve `Random` is
/// threaded through to `visit` so a stage can use one RNG for both traversal
/// order and its own per-cell randomness.
pub fn iterate<F>(grid: &mut Grid, vertical: VerticalOrder, horizontal: HorizontalOrder, rng: &mut TickRng, mut visit: F)
where
  F: FnMut(&mut Grid, i32, i32, &mut TickRng) -> bool,
{
  let width = grid.width() as i32;
  let height = grid.height() as i32;
  let left_to_right = resolve_horizontal(horizontal, rng);

  let rows: Vec<i32> = match vertical {
    VerticalOrder::TopDown => (0..height).collect(),
    VerticalOrder::BottomUp => (0..height).rev().collect(),
  };

  'rows: for y in rows {
    let cols: Vec<i32> = if left_to_right {
      (0..width).collect()
    } else {
      (0..width).rev().collect()
    };
    for x in cols {
      if !grid.is_chunk_active_at(x, y) {
        continue;
      }
      if !visit(grid, x, y, rng) {
        break 'rows;
      }
    }
  }
}

/// Runs `passes` full traversals. When `clear_between` is set, the Updated
/// flag is cleared on every cell between passes.
pub fn iterate_multi_pass<F>(
  grid: &mut Grid,
  vertical: VerticalOrder,
  horizontal: HorizontalOrder,
  passes: u32,
  clear_between: bool,
  rng: &mut TickRng,
  mut visit: F,
) where
  F: FnMut(&mut Grid, i32, i32, &mut TickRng) -> bool,
{
  for pass in 0..passes {
    iterate(grid, vertical, horizontal, rng, &mut visit);
    if clear_between && pass + 1 < passes {
      grid.clear_tick_flags();
    }
  }
}

/// BottomUp + Random: the order powder, fluid, fire, and acid stages use
/// to let cells that fall be visited before the slot they vacate.
pub fn iterate_falling<F>(grid: &mut Grid, rng: &mut TickRng, visit: F)
where
  F: FnMut(&mut Grid, i32, i32, &mut TickRng) -> bool,
{
  iterate(grid, VerticalOrder::BottomUp, HorizontalOrder::Random, rng, visit);
}

/// TopDown + Random: the order the gas stage uses so rising cells are
/// visited before the slot they vacate.
pub fn iterate_rising<F>(grid: &mut Grid, rng: &mut TickRng, visit: F)
where
  F: FnMut(&mut Grid, i32, i32, &mut TickRng) -> bool,
{
  iterate(grid, VerticalOrder::TopDown, HorizontalOrder::Random, rng, visit);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::material::MaterialId;

  #[test]
  fn visits_every_active_cell_once() {
    let mut grid = Grid::new(8, 8, 1).unwrap();
    grid.update_chunk_activation(); // all chunks still active on a fresh grid
    let mut rng = TickRng::new(42);
    let mut visited = 0u32;
    iterate(&mut grid, VerticalOrder::TopDown, HorizontalOrder::LeftRight, &mut rng, |_, _, _, _| {
      visited += 1;
      true
    });
    assert_eq!(visited, 64);
  }

  #[test]
  fn skips_inactive_chunks() {
    let mut grid = Grid::new(128, 128, 1).unwrap();
    grid.update_chunk_activation(); // clear to all-inactive via swap
    grid.activate_chunk(0, 0);
    grid.update_chunk_activation();
    let mut rng = TickRng::new(1);
    let mut visited = 0u32;
    iterate(&mut grid, VerticalOrder::BottomUp, HorizontalOrder::LeftRight, &mut rng, |_, _, _, _| {
      visited += 1;
      true
    });
    // one activated chunk dilates to a 3x3 neighborhood, clipped at the
    // grid edge to a 2x2 block of chunks (chunk (−1,−1) etc. are out of
    // bounds), each CHUNK_SIZE^2 cells.
    assert!(visited > 0);
    assert!(visited < 128 * 128);
  }

  #[test]
  fn abort_stops_traversal() {
    let mut grid = Grid::new(8, 8, 1).unwrap();
    let mut rng = TickRng::new(7);
    let mut visited = 0u32;
    iterate(&mut grid, VerticalOrder::TopDown, HorizontalOrder::LeftRight, &mut rng, |_, _, _, _| {
      visited += 1;
      visited < 3
    });
    assert_eq!(visited, 3);
  }

  #[test]
  fn multi_pass_clears_updated_between_passes() {
    let mut grid = Grid::new(4, 4, 1).unwrap();
    grid.set_mat(0, 0, MaterialId::SAND);
    let mut rng = TickRng::new(3);
    let mut pass_seen_updated = vec![];
    iterate_multi_pass(&mut grid, VerticalOrder::TopDown, HorizontalOrder::LeftRight, 2, true, &mut rng, |g, x, y, _| {
      if x == 0 && y == 0 {
        pass_seen_updated.push(g.has_flag(x, y, crate::grid::CellFlags::UPDATED));
        g.add_flag(x, y, crate::grid::CellFlags::UPDATED);
      }
      true
    });
    assert_eq!(pass_seen_updated, vec![false, false]);
  }
}
