//! Scenario 3: fire consumes a wood plank and emits smoke.

use pixel_sim::{MaterialId, Simulation};

#[test]
fn fire_consumes_wood_plank_and_emits_smoke() {
  let mut sim = Simulation::new(64, 64, 120.0, 1).unwrap();

  for x in 20..30 {
    sim.paint_stroke((x, 30), (x, 30), 0, MaterialId::WOOD);
  }
  sim.paint_stroke((20, 30), (20, 30), 0, MaterialId::FIRE);

  let dt = 1.0 / 120.0;
  let mut smoke_seen_above_plank = false;
  for _ in 0..2000 {
    sim.update(dt);
    for x in 20..30 {
      for y in 0..30 {
        if sim.grid().get_mat(x, y) == MaterialId::SMOKE {
          smoke_seen_above_plank = true;
        }
      }
    }
  }

  assert!(smoke_seen_above_plank, "burning wood should eventually emit smoke above the plank");

  for x in 20..30 {
    let mat = sim.grid().get_mat(x, 30);
    assert!(
      matches!(mat, MaterialId::ASH) || matches!(mat, MaterialId::SMOKE) || matches!(mat, MaterialId::EMPTY),
      "plank cell at x={x} should have burned away to ash, smoke, or empty, found {mat:?}"
    );
  }
}
