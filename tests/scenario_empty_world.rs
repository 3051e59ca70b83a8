//! Scenario 6: an untouched empty world stays empty and cools to ambient.

use pixel_sim::{MaterialId, Simulation};

#[test]
fn empty_world_is_stable() {
  let mut sim = Simulation::new(32, 32, 120.0, 1).unwrap();

  let dt = 1.0 / 120.0;
  for _ in 0..10_000 {
    sim.update(dt);
  }

  for y in 0..32 {
    for x in 0..32 {
      assert_eq!(sim.grid().get_mat(x, y), MaterialId::EMPTY);
      let t = sim.grid().temp(x, y);
      assert!((t - 20.0).abs() < 0.5, "cell ({x},{y}) temperature {t} drifted from ambient");
    }
  }

  let stats = sim.stats();
  assert_eq!(stats.cells_updated, 0, "an all-empty world has nothing to move");
}
