use crate::math::{Mat4, Mat4Kernels};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Euler angles in degrees, applied X then Y then Z
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct EulerAngles {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotation matrix `Rz * Ry * Rx`
    pub fn to_matrix(&self) -> Mat4 {
        rotation_z(self.z)
            .multiply_handwritten(&rotation_y(self.y))
            .multiply_handwritten(&rotation_x(self.x))
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, degrees: f32) {
        match axis {
            Axis::X => self.x = degrees,
            Axis::Y => self.y = degrees,
            Axis::Z => self.z = degrees,
        }
    }
}

/// Rotation axis selector for per-axis pose input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// 0 = x, 1 = y, 2 = z
    pub fn from_index(index: u8) -> Option<Axis> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

fn rotation_x(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    #[rustfmt::skip]
    let cols = [
        1.0, 0.0, 0.0, 0.0,
        0.0,   c,   s, 0.0,
        0.0,  -s,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    Mat4::from_cols_array(&cols)
}

fn rotation_y(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    #[rustfmt::skip]
    let cols = [
          c, 0.0,  -s, 0.0,
        0.0, 1.0, 0.0, 0.0,
          s, 0.0,   c, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    Mat4::from_cols_array(&cols)
}

fn rotation_z(degrees: f32) -> Mat4 {
    let (s, c) = degrees.to_radians().sin_cos();
    #[rustfmt::skip]
    let cols = [
          c,   s, 0.0, 0.0,
         -s,   c, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    Mat4::from_cols_array(&cols)
}

/// Translation, rotation and scale state of a single bone.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoneTransform {
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default)]
    pub rotation: EulerAngles,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: EulerAngles::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl BoneTransform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    /// Local skinning matrix `Rz * Ry * Rx * S`.
    ///
    /// Translation is not part of the result and nothing is inherited from
    /// the parent bone. The skinning pass re-centers vertices on the bone
    /// base instead.
    pub fn local_matrix(&self) -> Mat4 {
        self.rotation
            .to_matrix()
            .multiply_handwritten(&Mat4::from_scale(self.scale))
    }

    /// `T * Rz * Ry * Rx`, the transform a bone gizmo is drawn with
    /// relative to its parent. Scale stays local to the gizmo.
    pub fn pose_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation).multiply_handwritten(&self.rotation.to_matrix())
    }
}
