//! Scenario 2: water poured into a U-shaped container finds a flat surface.

use pixel_sim::{MaterialId, Simulation};

#[test]
fn water_settles_flat_in_u_container() {
  let mut sim = Simulation::new(64, 64, 120.0, 1).unwrap();

  for y in 10..=50 {
    sim.paint_stroke((10, y), (10, y), 0, MaterialId::STONE);
    sim.paint_stroke((40, y), (40, y), 0, MaterialId::STONE);
  }
  for x in 10..=40 {
    sim.paint_stroke((x, 50), (x, 50), 0, MaterialId::STONE);
  }
  sim.paint_stroke((15, 10), (24, 14), 0, MaterialId::WATER);
  // paint_line only traces a Bresenham path; fill the full 10x5 block.
  for x in 15..24 {
    for y in 10..14 {
      sim.paint_stroke((x, y), (x, y), 0, MaterialId::WATER);
    }
  }

  let dt = 1.0 / 120.0;
  for _ in 0..2000 {
    sim.update(dt);
  }

  let mut water_total = 0;
  let mut surface_rows = Vec::new();
  for x in 11..=39 {
    let mut top = None;
    for y in 10..50 {
      if sim.grid().get_mat(x, y) == MaterialId::WATER {
        water_total += 1;
        if top.is_none() {
          top = Some(y);
        }
      }
    }
    if let Some(t) = top {
      surface_rows.push(t);
    }
  }

  assert!(water_total > 0, "water should still be present in the container");
  assert!(!surface_rows.is_empty(), "water should be visible somewhere under the surface scan");

  let min_top = *surface_rows.iter().min().unwrap();
  let max_top = *surface_rows.iter().max().unwrap();
  assert!(max_top - min_top <= 4, "surface should be roughly flat, within a few cells");

  // containing walls never move
  for y in 10..=50 {
    assert_eq!(sim.grid().get_mat(10, y), MaterialId::STONE);
    assert_eq!(sim.grid().get_mat(40, y), MaterialId::STONE);
  }
}
