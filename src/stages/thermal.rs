//! Thermal stage: two-pass diffusion and phase change over a
//! double-buffered temperature field.
//!
//! Unlike the other five stages this one visits the entire grid directly
//! (no chunk-mask skip, no Updated flag) since heat diffuses independently
//! of movement staging. A row-major double-buffer pattern generalized from
//! a single buffer to `temp`/`temp_next` with a four-neighbor
//! conductivity-weighted Laplacian.

use crate::material::behavior::{ICE_TO_WATER, STEAM_TO_WATER, WATER_TO_ICE, WATER_TO_STEAM};
use crate::material::{MaterialId, MaterialTable};
use crate::rng::TickRng;
use crate::grid::Grid;

const FIRE_TEMPERATURE: f32 = 800.0;
const AMBIENT: f32 = 20.0;
const AMBIENT_COOLING_RATE: f32 = 0.001;
const DIFFUSION_RATE: f32 = 0.15;
const MIN_HEAT_CAPACITY: f32 = 0.1;
const MIN_CONDUCTIVITY: f32 = 0.001;

const ICE_MELT_SLOPE: f32 = 0.002;
const WATER_FREEZE_SLOPE: f32 = 0.001;
const WATER_BOIL_SLOPE: f32 = 0.005;
const STEAM_CONDENSE_SLOPE: f32 = 0.001;
const ICE_MELT_LATENT: f32 = 10.0;
const WATER_FREEZE_LATENT: f32 = 5.0;
const WATER_BOIL_LATENT: f32 = 50.0;
const STEAM_CONDENSE_LATENT: f32 = 20.0;

const CARDINALS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

pub fn run(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) {
  diffuse(grid, materials);
  phase_change(grid, materials, rng);
  grid.swap_temp_buffers();
}

fn diffuse(grid: &mut Grid, materials: &MaterialTable) {
  let width = grid.width() as i32;
  let height = grid.height() as i32;
  for y in 0..height {
    for x in 0..width {
      let mat = grid.get_mat(x, y);
      let mut tn = if mat == MaterialId::FIRE {
        FIRE_TEMPERATURE
      } else if materials.is_empty(mat) {
        let t = grid.temp(x, y);
        t + (AMBIENT - t) * 0.1
      } else {
        diffuse_cell(grid, materials, x, y, mat)
      };
      tn += (AMBIENT - tn) * AMBIENT_COOLING_RATE;
      grid.set_temp_next(x, y, tn.clamp(crate::grid::MIN_TEMPERATURE, crate::grid::MAX_TEMPERATURE));
    }
  }
}

fn diffuse_cell(grid: &Grid, materials: &MaterialTable, x: i32, y: i32, mat: MaterialId) -> f32 {
  let k = materials.get(mat).thermal_conductivity;
  let t = grid.temp(x, y);
  if k <= MIN_CONDUCTIVITY {
    return t;
  }

  let mut heat_in = 0.0f32;
  let mut count = 0i32;
  for (dx, dy) in CARDINALS {
    let (nx, ny) = (x + dx, y + dy);
    if !grid.in_bounds(nx, ny) {
      continue;
    }
    count += 1;
    let t_n = grid.temp(nx, ny);
    let k_n = materials.get(grid.get_mat(nx, ny)).thermal_conductivity;
    let weight = if k <= 0.0 || k_n <= 0.0 { 0.0 } else { (k * k_n).sqrt() };
    heat_in += (t_n - t) * weight;
  }

  if count == 0 {
    return t;
  }
  let delta = heat_in * DIFFUSION_RATE / count as f32;
  let c_eff = materials.get(mat).heat_capacity.max(MIN_HEAT_CAPACITY);
  t + delta / c_eff
}

fn phase_change(grid: &mut Grid, materials: &MaterialTable, rng: &mut TickRng) {
  let width = grid.width() as i32;
  let height = grid.height() as i32;
  for y in 0..height {
    for x in 0..width {
      let mat = grid.get_mat(x, y);
      let tn = grid.temp_next_slot(x, y);

      match mat {
        MaterialId::ICE => {
          let melting_temp = materials.get(mat).melting_temp;
          if tn > melting_temp {
            let p = ICE_TO_WATER.base_probability + (tn - melting_temp) * ICE_MELT_SLOPE;
            if rng.chance(p) {
              grid.set_mat(x, y, MaterialId::WATER);
              grid.set_temp_next(x, y, tn - ICE_MELT_LATENT);
            }
          }
        }
        MaterialId::WATER => {
          if tn < 0.0 {
            let p = WATER_TO_ICE.base_probability + (-tn) * WATER_FREEZE_SLOPE;
            if rng.chance(p) {
              grid.set_mat(x, y, MaterialId::ICE);
              grid.set_temp_next(x, y, tn + WATER_FREEZE_LATENT);
              continue;
            }
          }
          let boiling_temp = materials.get(mat).boiling_temp;
          if tn > boiling_temp {
            let p = WATER_TO_STEAM.base_probability + (tn - boiling_temp) * WATER_BOIL_SLOPE;
            if rng.chance(p) {
              grid.set_mat(x, y, MaterialId::STEAM);
              grid.set_lifetime(x, y, 0);
              grid.set_temp_next(x, y, tn - WATER_BOIL_LATENT);
            }
          }
        }
        MaterialId::STEAM => {
          if tn < STEAM_TO_WATER.threshold_temp {
            let p = STEAM_TO_WATER.base_probability + (STEAM_TO_WATER.threshold_temp - tn) * STEAM_CONDENSE_SLOPE;
            if rng.chance(p) {
              grid.set_mat(x, y, MaterialId::WATER);
              grid.set_lifetime(x, y, 0);
              grid.set_temp_next(x, y, tn + STEAM_CONDENSE_LATENT);
            }
          }
        }
        _ => {}
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fire_cell_clamps_to_fire_temperature() {
    let mut grid = Grid::new(3, 3, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(1);
    grid.set_mat(1, 1, MaterialId::FIRE);
    run(&mut grid, &materials, &mut rng);
    assert!((grid.temp(1, 1) - FIRE_TEMPERATURE).abs() < 1.0);
  }

  #[test]
  fn empty_cell_relaxes_toward_ambient() {
    let mut grid = Grid::new(3, 3, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(1);
    grid.set_temp(1, 1, 200.0);
    run(&mut grid, &materials, &mut rng);
    assert!(grid.temp(1, 1) < 200.0);
    assert!(grid.temp(1, 1) > AMBIENT);
  }

  #[test]
  fn ice_melts_in_hot_surroundings() {
    let mut grid = Grid::new(3, 3, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(1);
    grid.set_mat(1, 1, MaterialId::ICE);
    grid.set_temp(1, 1, 500.0);
    let mut melted = false;
    for _ in 0..300 {
      run(&mut grid, &materials, &mut rng);
      if grid.get_mat(1, 1) == MaterialId::WATER {
        melted = true;
        break;
      }
    }
    assert!(melted);
  }

  #[test]
  fn heat_diffuses_between_conductive_neighbors() {
    let mut grid = Grid::new(3, 1, 1).unwrap();
    let materials = MaterialTable::new();
    let mut rng = TickRng::new(1);
    grid.set_mat(0, 0, MaterialId::STONE);
    grid.set_mat(1, 0, MaterialId::STONE);
    grid.set_mat(2, 0, MaterialId::STONE);
    grid.set_temp(0, 0, 500.0);
    run(&mut grid, &materials, &mut rng);
    assert!(grid.temp(1, 0) > crate::grid::AMBIENT_TEMP);
  }
}
