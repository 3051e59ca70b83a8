//! Behavior capability bitmask, state transitions, reactions, and movement
//! priority tables.
//!
//! `bitflags` is the natural fit for the per-material capability mask
//! instead of a `match` over `MaterialId`.

use bitflags::bitflags;

use crate::material::MaterialId;

bitflags! {
  /// Per-material capability bits.
  #[derive(Clone, Copy, Debug, PartialEq, Eq)]
  pub struct Capability: u32 {
    const FALLS          = 1 << 0;
    const RISES          = 1 << 1;
    const FLOWS          = 1 << 2;
    const SLIDES         = 1 << 3;
    const STATIC         = 1 << 4;
    const FLAMMABLE      = 1 << 5;
    const CONDUCTS_HEAT  = 1 << 6;
    const CORRODIBLE     = 1 << 7;
    const CORROSIVE      = 1 << 8;
    const EXTINGUISHES   = 1 << 9;
    const MELTS          = 1 << 10;
    const FREEZES        = 1 << 11;
    const BOILS          = 1 << 12;
    const CONDENSES      = 1 << 13;
    const BURNS_OUT      = 1 << 14;
    const DISSIPATES     = 1 << 15;
    const SPREADS        = 1 << 16;
    const PRODUCES_SMOKE = 1 << 17;
    const PRODUCES_HEAT  = 1 << 18;
  }
}

/// Capability lookup table indexed by material id.
pub fn capabilities(id: MaterialId) -> Capability {
  use MaterialId as M;
  match id {
    M::EMPTY => Capability::empty(),
    M::SAND | M::SOIL => {
      Capability::FALLS | Capability::SLIDES | Capability::CONDUCTS_HEAT | Capability::CORRODIBLE
    }
    M::STONE => Capability::STATIC | Capability::CONDUCTS_HEAT | Capability::MELTS | Capability::CORRODIBLE,
    M::WATER => {
      Capability::FALLS
        | Capability::FLOWS
        | Capability::CONDUCTS_HEAT
        | Capability::EXTINGUISHES
        | Capability::FREEZES
        | Capability::BOILS
    }
    M::WOOD => Capability::STATIC | Capability::FLAMMABLE | Capability::CONDUCTS_HEAT | Capability::CORRODIBLE,
    M::FIRE => {
      Capability::RISES
        | Capability::SPREADS
        | Capability::BURNS_OUT
        | Capability::PRODUCES_SMOKE
        | Capability::PRODUCES_HEAT
        | Capability::CONDUCTS_HEAT
    }
    M::SMOKE => Capability::RISES | Capability::DISSIPATES | Capability::CONDUCTS_HEAT,
    M::ICE => {
      Capability::STATIC | Capability::CONDUCTS_HEAT | Capability::MELTS | Capability::EXTINGUISHES | Capability::CORRODIBLE
    }
    M::STEAM => {
      Capability::RISES | Capability::CONDENSES | Capability::CONDUCTS_HEAT
    }
    M::ASH => Capability::FALLS | Capability::SLIDES | Capability::CONDUCTS_HEAT | Capability::CORRODIBLE,
    M::ACID => {
      Capability::FALLS
        | Capability::FLOWS
        | Capability::CORROSIVE
        | Capability::CONDUCTS_HEAT
    }
    _ => Capability::empty(),
  }
}

#[inline]
pub fn bhv_falls(id: MaterialId) -> bool {
  capabilities(id).contains(Capability::FALLS)
}

#[inline]
pub fn bhv_rises(id: MaterialId) -> bool {
  capabilities(id).contains(Capability::RISES)
}

#[inline]
pub fn bhv_is_flammable(id: MaterialId) -> bool {
  capabilities(id).contains(Capability::FLAMMABLE)
}

#[inline]
pub fn bhv_is_corrodible(id: MaterialId) -> bool {
  capabilities(id).contains(Capability::CORRODIBLE)
}

/// A state transition: `(result, threshold_temp, base_probability)`.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
  pub result: MaterialId,
  pub threshold_temp: f32,
  pub base_probability: f32,
}

pub const ICE_TO_WATER: Transition = Transition {
  result: MaterialId::WATER,
  threshold_temp: 0.0,
  base_probability: 0.01,
};
pub const WATER_TO_ICE: Transition = Transition {
  result: MaterialId::ICE,
  threshold_temp: 0.0,
  base_probability: 0.005,
};
pub const WATER_TO_STEAM: Transition = Transition {
  result: MaterialId::STEAM,
  threshold_temp: 100.0,
  base_probability: 0.02,
};
pub const STEAM_TO_WATER: Transition = Transition {
  result: MaterialId::WATER,
  threshold_temp: 80.0,
  base_probability: 0.01,
};
pub const WOOD_TO_FIRE: Transition = Transition {
  result: MaterialId::FIRE,
  threshold_temp: 300.0,
  base_probability: 0.03,
};

/// Fire death products.
pub const FIRE_ASH_CHANCE: f32 = 0.30;
pub const FIRE_SMOKE_CHANCE: f32 = 0.50;

/// A reaction record: `(target, result_self, result_target, probability,
/// byproduct, byproduct_chance)`.
#[derive(Clone, Copy, Debug)]
pub struct Reaction {
  pub result_self: MaterialId,
  pub result_target: MaterialId,
  pub probability: f32,
  pub byproduct: MaterialId,
  pub byproduct_chance: f32,
}

/// Corrosion: acid on any corrodible neighbor.
pub const CORROSION: Reaction = Reaction {
  result_self: MaterialId::EMPTY,
  result_target: MaterialId::EMPTY,
  probability: 0.08,
  byproduct: MaterialId::SMOKE,
  byproduct_chance: 0.5,
};

/// Fire spread on any flammable neighbor.
pub const FIRE_SPREAD: Reaction = Reaction {
  result_self: MaterialId::FIRE,
  result_target: MaterialId::FIRE,
  probability: 0.03,
  byproduct: MaterialId::EMPTY,
  byproduct_chance: 0.0,
};

/// Extinguish: reserved for a future reaction. Defined but not invoked by
/// any stage in this crate's scope.
pub const EXTINGUISH: Reaction = Reaction {
  result_self: MaterialId::STEAM,
  result_target: MaterialId::SMOKE,
  probability: 0.5,
  byproduct: MaterialId::STEAM,
  byproduct_chance: 0.3,
};

/// A relative movement offset, `(dx, dy)`.
pub type Offset = (i32, i32);

/// Powder movement priority: straight down, then diagonal-down, tie-broken
/// by RNG.
pub const POWDER_MOVES: [Offset; 3] = [(0, 1), (-1, 1), (1, 1)];

/// Fluid movement priority: down, horizontal, diagonal-down.
pub const FLUID_MOVES: [Offset; 5] = [(0, 1), (-1, 0), (1, 0), (-1, 1), (1, 1)];

/// Gas movement priority: up, diagonal-up, horizontal.
pub const GAS_MOVES: [Offset; 5] = [(0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0)];
