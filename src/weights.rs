//! Weighting cases: which blend-weight curve the tube's rings get.

use serde::{Deserialize, Serialize};

use crate::mesh::MeshGrid;
use crate::weight_table::{DEGENERATE_PROFILE, PROFILE_COUNT, PROFILE_RINGS, WEIGHT_PROFILES};

/// One of the five selectable weight profiles.
///
/// Serialized as its number `1..=5`; any other number reads back as `Case1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum WeightCase {
    /// Linear ramp over every ring
    #[default]
    Case1,
    /// Ramp over rings 6..=14
    Case2,
    /// Ramp over rings 8..=12
    Case3,
    /// Both weights zero on every ring
    Case4,
    /// Upper arm weight one on every ring
    Case5,
}

impl WeightCase {
    pub const ALL: [WeightCase; PROFILE_COUNT] = [
        WeightCase::Case1,
        WeightCase::Case2,
        WeightCase::Case3,
        WeightCase::Case4,
        WeightCase::Case5,
    ];

    /// Select by number; anything outside `1..=5` falls back to `Case1`
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => WeightCase::Case1,
            2 => WeightCase::Case2,
            3 => WeightCase::Case3,
            4 => WeightCase::Case4,
            5 => WeightCase::Case5,
            other => {
                log::warn!("Unknown weighting case {}, using case 1", other);
                WeightCase::Case1
            }
        }
    }

    /// Case number, `1..=5`
    pub const fn number(self) -> u32 {
        self as u32 + 1
    }

    /// Caption shown next to the mesh
    pub fn label(self) -> String {
        format!("Weighting Case {}", self.number())
    }

    fn profile(self) -> &'static [f32; PROFILE_RINGS] {
        &WEIGHT_PROFILES[self as usize]
    }

    /// `(upper, lower)` weights for a ring, or `None` past the end of the
    /// profile.
    pub fn weights_for_ring(self, ring: usize) -> Option<(f32, f32)> {
        let w = *self.profile().get(ring)?;
        if self as usize == DEGENERATE_PROFILE {
            Some((w, 0.0))
        } else {
            Some((w, 1.0 - w))
        }
    }

    /// Overwrite the weights of every vertex in `mesh`. Rings the profile
    /// does not cover get the default `(0, 0)`.
    pub fn apply(self, mesh: &mut MeshGrid) {
        for ring in 0..mesh.rings() {
            let weights = self
                .weights_for_ring(ring)
                .map_or([0.0, 0.0], |(w1, w2)| [w1, w2]);
            if let Ok(vertices) = mesh.ring_mut(ring) {
                for vertex in vertices {
                    vertex.weights = weights;
                }
            }
        }
    }
}

impl From<i64> for WeightCase {
    fn from(index: i64) -> Self {
        Self::from_index(index)
    }
}

impl From<WeightCase> for i64 {
    fn from(case: WeightCase) -> Self {
        case.number() as i64
    }
}
