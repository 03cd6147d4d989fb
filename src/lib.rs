//! Arm Skinning - Wasm Core
//!
//! Two-bone linear blend skinning of a tube mesh: bone matrices, a
//! parametric rest mesh with per-ring weights, and the deformed mesh handed
//! to a renderer.

#![cfg_attr(feature = "portable_simd", feature(portable_simd))]

pub mod app;
pub mod bone;
pub mod config;
pub mod context;
mod math;
pub mod mesh;
pub mod skeleton;
pub mod skinning;
mod weight_table;
pub mod weights;

use thiserror::Error;
use wasm_bindgen::prelude::*;

pub use app::SkinningApp;
pub use bone::{Axis, BoneId, BoneTransform, EulerAngles};
pub use config::SkinningConfig;
pub use context::SkinningContext;
pub use glam::{Mat4, Vec3, Vec4};
pub use math::{Mat4Kernels, Vec4Kernels};
pub use mesh::{
    generate_rest_mesh, MeshError, MeshGrid, PackedVertex, SkinVertex, TubeParams, MAX_HEIGHT,
};
pub use skeleton::{Bone, Skeleton};
pub use skinning::{compute_skinning, compute_skinning_into, SkinningInput, BONE_BASE_OFFSET};
pub use weights::WeightCase;

/// Small epsilon value for floating-point comparisons
pub const EPSILON: f32 = 1e-6;

#[derive(Error, Debug)]
pub enum SkinError {
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown bone id: {0}")]
    UnknownBone(u32),

    #[error("Unknown rotation axis index: {0}")]
    UnknownAxis(u8),

    #[error("Bone {0:?} is not part of the skeleton")]
    MissingBone(BoneId),
}

pub type Result<T> = std::result::Result<T, SkinError>;

/// Log to browser console
#[wasm_bindgen]
pub fn log(msg: &str) {
    log::info!("{}", msg);
}
