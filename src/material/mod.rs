//! Material definitions and the process-wide property table.
//!
//! A material id → record → palette lookup registry, generalized from a
//! small demo catalog to the full twelve-material set and from a flat RGB
//! palette to per-channel deterministic color variation.

pub mod behavior;

use crate::fixed::{self, Fixed};

/// Number of entries in the material catalog.
pub const MAT_COUNT: usize = 12;

/// Material id. Values `>= MAT_COUNT` are treated as [`MaterialId::EMPTY`]
/// everywhere a lookup is performed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u8);

impl MaterialId {
  pub const EMPTY: Self = Self(0);
  pub const SAND: Self = Self(1);
  pub const STONE: Self = Self(2);
  pub const WATER: Self = Self(3);
  pub const WOOD: Self = Self(4);
  pub const FIRE: Self = Self(5);
  pub const SMOKE: Self = Self(6);
  pub const SOIL: Self = Self(7);
  pub const ICE: Self = Self(8);
  pub const STEAM: Self = Self(9);
  pub const ASH: Self = Self(10);
  pub const ACID: Self = Self(11);

  #[inline]
  pub fn is_valid(self) -> bool {
    (self.0 as usize) < MAT_COUNT
  }
}

impl Default for MaterialId {
  fn default() -> Self {
    Self::EMPTY
  }
}

/// Physical state a material occupies, driving which stage processes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialState {
  Empty,
  Solid,
  Powder,
  Fluid,
  Gas,
}

/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }
}

/// Immutable per-material properties.
pub struct MaterialRecord {
  pub id: MaterialId,
  pub name: &'static str,
  pub state: MaterialState,
  pub color: Rgba,
  pub variation: u8,

  pub density: f32,
  pub friction: f32,
  pub restitution: f32,
  pub cohesion: f32,
  pub viscosity: f32,
  pub gravity_scale: f32,
  pub drag: f32,
  pub terminal_velocity: f32,
  pub flow_rate: f32,
  pub settle_probability: f32,
  pub slide_bias: f32,

  pub thermal_conductivity: f32,
  pub heat_capacity: f32,
  pub ignition_temp: f32,
  pub burn_rate: f32,
  pub smoke_rate: f32,
  pub melting_temp: f32,
  pub boiling_temp: f32,

  /// Precomputed `GRAVITY_ACCEL * gravity_scale`, fixed-point.
  pub gravity_step_fixed: Fixed,
  /// Precomputed `1 - drag`, fixed-point.
  pub drag_factor_fixed: Fixed,
  /// Precomputed terminal velocity, fixed-point.
  pub terminal_velocity_fixed: Fixed,
}

/// Base gravity acceleration, in cells/tick^2, applied to gravity-scaled
/// materials during velocity integration.
pub const GRAVITY_ACCEL: f32 = 0.08;

const INF_TEMP: f32 = 9999.0;

struct RawMaterial {
  id: MaterialId,
  name: &'static str,
  state: MaterialState,
  color: Rgba,
  variation: u8,
  density: f32,
  gravity_scale: f32,
  drag: f32,
  terminal_velocity: f32,
  flow_rate: f32,
  settle_probability: f32,
  cohesion: f32,
  slide_bias: f32,
  thermal_conductivity: f32,
  heat_capacity: f32,
  melting_temp: f32,
  boiling_temp: f32,
}

fn raw_catalog() -> [RawMaterial; MAT_COUNT] {
  [
    RawMaterial {
      id: MaterialId::EMPTY,
      name: "Empty",
      state: MaterialState::Empty,
      color: Rgba::new(0, 0, 0, 0),
      variation: 0,
      density: 1.225,
      gravity_scale: 0.0,
      drag: 0.0,
      terminal_velocity: 0.0,
      flow_rate: 0.0,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.0,
      heat_capacity: 0.0,
      melting_temp: 0.0,
      boiling_temp: 0.0,
    },
    RawMaterial {
      id: MaterialId::SAND,
      name: "Sand",
      state: MaterialState::Powder,
      color: Rgba::new(194, 178, 128, 255),
      variation: 20,
      density: 1600.0,
      gravity_scale: 1.2,
      drag: 0.25,
      terminal_velocity: 3.5,
      flow_rate: 0.0,
      settle_probability: 0.25,
      cohesion: 0.15,
      slide_bias: 0.5,
      thermal_conductivity: 0.3,
      heat_capacity: 0.8,
      melting_temp: 1700.0,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::STONE,
      name: "Stone",
      state: MaterialState::Solid,
      color: Rgba::new(128, 128, 128, 255),
      variation: 15,
      density: 2600.0,
      gravity_scale: 0.0,
      drag: 1.0,
      terminal_velocity: 0.0,
      flow_rate: 0.0,
      settle_probability: 1.0,
      cohesion: 1.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.8,
      heat_capacity: 0.9,
      melting_temp: 1200.0,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::WATER,
      name: "Water",
      state: MaterialState::Fluid,
      color: Rgba::new(64, 128, 220, 200),
      variation: 10,
      density: 1000.0,
      gravity_scale: 1.0,
      drag: 0.1,
      terminal_velocity: 4.0,
      flow_rate: 0.6,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.6,
      heat_capacity: 4.2,
      melting_temp: 0.0,
      boiling_temp: 100.0,
    },
    RawMaterial {
      id: MaterialId::WOOD,
      name: "Wood",
      state: MaterialState::Solid,
      color: Rgba::new(110, 70, 40, 255),
      variation: 18,
      density: 600.0,
      gravity_scale: 0.0,
      drag: 1.0,
      terminal_velocity: 0.0,
      flow_rate: 0.0,
      settle_probability: 1.0,
      cohesion: 1.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.15,
      heat_capacity: 1.7,
      melting_temp: INF_TEMP,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::FIRE,
      name: "Fire",
      state: MaterialState::Gas,
      color: Rgba::new(255, 120, 30, 255),
      variation: 40,
      density: 0.4,
      gravity_scale: -0.3,
      drag: 0.2,
      terminal_velocity: 2.0,
      flow_rate: 0.7,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.1,
      heat_capacity: 0.1,
      melting_temp: INF_TEMP,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::SMOKE,
      name: "Smoke",
      state: MaterialState::Gas,
      color: Rgba::new(90, 90, 90, 180),
      variation: 15,
      density: 0.6,
      gravity_scale: -0.1,
      drag: 0.8,
      terminal_velocity: 1.2,
      flow_rate: 0.5,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.02,
      heat_capacity: 0.1,
      melting_temp: INF_TEMP,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::SOIL,
      name: "Soil",
      state: MaterialState::Powder,
      color: Rgba::new(109, 74, 43, 255),
      variation: 22,
      density: 1800.0,
      gravity_scale: 1.1,
      drag: 0.3,
      terminal_velocity: 2.5,
      flow_rate: 0.0,
      settle_probability: 0.4,
      cohesion: 0.4,
      slide_bias: 0.5,
      thermal_conductivity: 0.5,
      heat_capacity: 1.0,
      melting_temp: INF_TEMP,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::ICE,
      name: "Ice",
      state: MaterialState::Solid,
      color: Rgba::new(180, 220, 240, 230),
      variation: 10,
      density: 917.0,
      gravity_scale: 0.0,
      drag: 1.0,
      terminal_velocity: 0.0,
      flow_rate: 0.0,
      settle_probability: 1.0,
      cohesion: 1.0,
      slide_bias: 0.5,
      thermal_conductivity: 2.2,
      heat_capacity: 2.1,
      melting_temp: 0.0,
      boiling_temp: 100.0,
    },
    RawMaterial {
      id: MaterialId::STEAM,
      name: "Steam",
      state: MaterialState::Gas,
      color: Rgba::new(220, 220, 225, 120),
      variation: 12,
      density: 0.6,
      gravity_scale: -0.5,
      drag: 0.5,
      terminal_velocity: 2.5,
      flow_rate: 0.6,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.02,
      heat_capacity: 2.0,
      melting_temp: 0.0,
      boiling_temp: 100.0,
    },
    RawMaterial {
      id: MaterialId::ASH,
      name: "Ash",
      state: MaterialState::Powder,
      color: Rgba::new(120, 120, 115, 255),
      variation: 18,
      density: 500.0,
      gravity_scale: 0.3,
      drag: 0.7,
      terminal_velocity: 1.0,
      flow_rate: 0.0,
      settle_probability: 0.15,
      cohesion: 0.05,
      slide_bias: 0.5,
      thermal_conductivity: 0.1,
      heat_capacity: 0.8,
      melting_temp: INF_TEMP,
      boiling_temp: INF_TEMP,
    },
    RawMaterial {
      id: MaterialId::ACID,
      name: "Acid",
      state: MaterialState::Fluid,
      color: Rgba::new(140, 220, 40, 210),
      variation: 14,
      density: 1100.0,
      gravity_scale: 1.0,
      drag: 0.15,
      terminal_velocity: 3.5,
      flow_rate: 0.7,
      settle_probability: 0.0,
      cohesion: 0.0,
      slide_bias: 0.5,
      thermal_conductivity: 0.5,
      heat_capacity: 3.0,
      melting_temp: -20.0,
      boiling_temp: 120.0,
    },
  ]
}

/// Process-wide, read-only after construction.
pub struct MaterialTable {
  records: [MaterialRecord; MAT_COUNT],
  is_empty: [bool; MAT_COUNT],
  is_solid: [bool; MAT_COUNT],
  is_powder: [bool; MAT_COUNT],
  is_fluid: [bool; MAT_COUNT],
  is_gas: [bool; MAT_COUNT],
}

impl MaterialTable {
  pub fn new() -> Self {
    let raw = raw_catalog();
    // `MaterialRecord` has no Default/Copy; build via array::map from the
    // raw catalog so every precomputed fixed-point field is derived once.
    let records = raw.map(|r| {
      let gravity_step_fixed = fixed::to_fixed(GRAVITY_ACCEL * r.gravity_scale);
      let drag_factor_fixed = fixed::to_fixed(1.0 - r.drag);
      let terminal_velocity_fixed = fixed::to_fixed(r.terminal_velocity);
      MaterialRecord {
        id: r.id,
        name: r.name,
        state: r.state,
        color: r.color,
        variation: r.variation,
        density: r.density,
        friction: 0.0,
        restitution: 0.0,
        cohesion: r.cohesion,
        viscosity: 0.0,
        gravity_scale: r.gravity_scale,
        drag: r.drag,
        terminal_velocity: r.terminal_velocity,
        flow_rate: r.flow_rate,
        settle_probability: r.settle_probability,
        slide_bias: r.slide_bias,
        thermal_conductivity: r.thermal_conductivity,
        heat_capacity: r.heat_capacity,
        ignition_temp: 300.0,
        burn_rate: 0.0,
        smoke_rate: 0.0,
        melting_temp: r.melting_temp,
        boiling_temp: r.boiling_temp,
        gravity_step_fixed,
        drag_factor_fixed,
        terminal_velocity_fixed,
      }
    });

    let mut is_empty = [false; MAT_COUNT];
    let mut is_solid = [false; MAT_COUNT];
    let mut is_powder = [false; MAT_COUNT];
    let mut is_fluid = [false; MAT_COUNT];
    let mut is_gas = [false; MAT_COUNT];
    for (i, rec) in records.iter().enumerate() {
      match rec.state {
        MaterialState::Empty => is_empty[i] = true,
        MaterialState::Solid => is_solid[i] = true,
        MaterialState::Powder => is_powder[i] = true,
        MaterialState::Fluid => is_fluid[i] = true,
        MaterialState::Gas => is_gas[i] = true,
      }
    }

    Self {
      records,
      is_empty,
      is_solid,
      is_powder,
      is_fluid,
      is_gas,
    }
  }

  #[inline]
  pub fn get(&self, id: MaterialId) -> &MaterialRecord {
    if id.is_valid() {
      &self.records[id.0 as usize]
    } else {
      &self.records[MaterialId::EMPTY.0 as usize]
    }
  }

  /// `material_state(id)`: Empty for out-of-range ids.
  #[inline]
  pub fn state(&self, id: MaterialId) -> MaterialState {
    self.get(id).state
  }

  #[inline]
  pub fn is_empty(&self, id: MaterialId) -> bool {
    id.is_valid() && self.is_empty[id.0 as usize]
  }

  #[inline]
  pub fn is_solid(&self, id: MaterialId) -> bool {
    !id.is_valid() || self.is_solid[id.0 as usize]
  }

  #[inline]
  pub fn is_powder(&self, id: MaterialId) -> bool {
    id.is_valid() && self.is_powder[id.0 as usize]
  }

  #[inline]
  pub fn is_fluid(&self, id: MaterialId) -> bool {
    id.is_valid() && self.is_fluid[id.0 as usize]
  }

  #[inline]
  pub fn is_gas(&self, id: MaterialId) -> bool {
    id.is_valid() && self.is_gas[id.0 as usize]
  }

  /// "Passable for powder": empty, fluid, or gas.
  #[inline]
  pub fn passable_for_powder(&self, id: MaterialId) -> bool {
    self.is_empty(id) || self.is_fluid(id) || self.is_gas(id)
  }

  /// "Passable for fluid": empty or gas.
  #[inline]
  pub fn passable_for_fluid(&self, id: MaterialId) -> bool {
    self.is_empty(id) || self.is_gas(id)
  }

  /// "Passable for gas": empty only.
  #[inline]
  pub fn passable_for_gas(&self, id: MaterialId) -> bool {
    self.is_empty(id)
  }

  /// Deterministic per-cell color: the material's base color perturbed by
  /// `seed` within `+/- variation` per channel.
  pub fn color(&self, id: MaterialId, seed: u32) -> Rgba {
    let rec = self.get(id);
    if rec.variation == 0 {
      return rec.color;
    }
    let mut x = seed;
    x = (x >> 16) ^ x;
    x = x.wrapping_mul(0x45d9_f3b);
    x = (x >> 16) ^ x;
    x = x.wrapping_mul(0x45d9_f3b);
    x = (x >> 16) ^ x;

    let span = rec.variation as i32 * 2 + 1;
    let perturb = |channel: u8, bits: u32| -> u8 {
      let raw = (x.rotate_left(bits) % span as u32) as i32 - rec.variation as i32;
      (channel as i32 + raw).clamp(0, 255) as u8
    };
    Rgba::new(
      perturb(rec.color.r, 0),
      perturb(rec.color.g, 8),
      perturb(rec.color.b, 16),
      rec.color.a,
    )
  }
}

impl Default for MaterialTable {
  fn default() -> Self {
    Self::new()
  }
}
