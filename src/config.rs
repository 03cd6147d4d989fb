//! Skinning configuration, loadable from JSON

use serde::{Deserialize, Serialize};

use crate::mesh::TubeParams;
use crate::skinning::BONE_BASE_OFFSET;
use crate::weights::WeightCase;

/// Reference configuration shipped with the crate
pub const REFERENCE_CONFIG_JSON: &str = include_str!("../config/reference.json");

/// Tube geometry, bone pivot and weighting case for one context.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SkinningConfig {
    /// `height` and `radius` keys at the top level
    #[serde(flatten)]
    pub tube: TubeParams,
    #[serde(default = "default_bone_base_offset")]
    pub bone_base_offset: f32,
    #[serde(default)]
    pub weight_case: WeightCase,
}

fn default_bone_base_offset() -> f32 {
    BONE_BASE_OFFSET
}

impl Default for SkinningConfig {
    fn default() -> Self {
        Self {
            tube: TubeParams::default(),
            bone_base_offset: BONE_BASE_OFFSET,
            weight_case: WeightCase::Case1,
        }
    }
}

impl SkinningConfig {
    /// Parse from JSON string; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn reference() -> Result<Self, serde_json::Error> {
        Self::from_json(REFERENCE_CONFIG_JSON)
    }
}
