//! Linear algebra primitives using glam with handwritten column-major kernels.
//!
//! Element (row r, column c) of a matrix lives at index `r + 4 * c` of its
//! column array. Every kernel takes and returns plain values.

pub use glam::{Mat4, Vec3, Vec4};

/// Handwritten matrix kernels used by the bone evaluator and the skinning pass.
pub trait Mat4Kernels {
    /// Multiply each of the 16 entries by `k`
    fn scale_scalar(&self, k: f32) -> Mat4;

    /// Element-wise sum
    fn add_scalar(&self, other: &Mat4) -> Mat4;

    /// Scalar implementation of matrix multiplication (`self * other`)
    fn multiply_scalar(&self, other: &Mat4) -> Mat4;

    /// Portable SIMD implementation (requires nightly + portable_simd feature)
    #[cfg(feature = "portable_simd")]
    fn multiply_std_simd(&self, other: &Mat4) -> Mat4;

    /// Dispatcher for the best available multiplication kernel
    fn multiply_handwritten(&self, other: &Mat4) -> Mat4;

    /// Scalar matrix-vector product, `result[r] = sum_c self[r + 4c] * v[c]`
    fn transform_scalar(&self, v: Vec4) -> Vec4;

    /// Portable SIMD matrix-vector product
    #[cfg(feature = "portable_simd")]
    fn transform_std_simd(&self, v: Vec4) -> Vec4;

    /// Dispatcher for the best available matrix-vector kernel
    fn transform_handwritten(&self, v: Vec4) -> Vec4;
}

impl Mat4Kernels for Mat4 {
    fn scale_scalar(&self, k: f32) -> Mat4 {
        let mut data = self.to_cols_array();
        for value in data.iter_mut() {
            *value *= k;
        }
        Mat4::from_cols_array(&data)
    }

    fn add_scalar(&self, other: &Mat4) -> Mat4 {
        let mut data = self.to_cols_array();
        let b = other.to_cols_array();
        for (value, rhs) in data.iter_mut().zip(b.iter()) {
            *value += rhs;
        }
        Mat4::from_cols_array(&data)
    }

    fn multiply_scalar(&self, other: &Mat4) -> Mat4 {
        let mut result_data = [0.0f32; 16];
        let a = self.to_cols_array();
        let b = other.to_cols_array();

        for col in 0..4 {
            for row in 0..4 {
                // accumulate in f64 to keep chained rotations stable
                let mut sum = 0.0f64;
                for k in 0..4 {
                    sum += a[row + k * 4] as f64 * b[col * 4 + k] as f64;
                }
                result_data[row + col * 4] = sum as f32;
            }
        }
        Mat4::from_cols_array(&result_data)
    }

    #[cfg(feature = "portable_simd")]
    fn multiply_std_simd(&self, other: &Mat4) -> Mat4 {
        use std::simd::prelude::*;
        let mut result_data = [0.0f32; 16];
        let a = self.to_cols_array();
        let b = other.to_cols_array();

        let a0 = f32x4::from_slice(&a[0..4]);
        let a1 = f32x4::from_slice(&a[4..8]);
        let a2 = f32x4::from_slice(&a[8..12]);
        let a3 = f32x4::from_slice(&a[12..16]);

        for col in 0..4 {
            let r = f32x4::splat(b[col * 4]) * a0
                + f32x4::splat(b[col * 4 + 1]) * a1
                + f32x4::splat(b[col * 4 + 2]) * a2
                + f32x4::splat(b[col * 4 + 3]) * a3;
            r.copy_to_slice(&mut result_data[col * 4..col * 4 + 4]);
        }
        Mat4::from_cols_array(&result_data)
    }

    #[inline(always)]
    fn multiply_handwritten(&self, other: &Mat4) -> Mat4 {
        cfg_if::cfg_if! {
            if #[cfg(feature = "portable_simd")] {
                self.multiply_std_simd(other)
            } else {
                self.multiply_scalar(other)
            }
        }
    }

    fn transform_scalar(&self, v: Vec4) -> Vec4 {
        let a = self.to_cols_array();
        let b = v.to_array();
        let mut out = [0.0f32; 4];
        for (row, slot) in out.iter_mut().enumerate() {
            *slot = a[row] * b[0] + a[row + 4] * b[1] + a[row + 8] * b[2] + a[row + 12] * b[3];
        }
        Vec4::from_array(out)
    }

    #[cfg(feature = "portable_simd")]
    fn transform_std_simd(&self, v: Vec4) -> Vec4 {
        use std::simd::prelude::*;
        let a = self.to_cols_array();
        let r = f32x4::from_slice(&a[0..4]) * f32x4::splat(v.x)
            + f32x4::from_slice(&a[4..8]) * f32x4::splat(v.y)
            + f32x4::from_slice(&a[8..12]) * f32x4::splat(v.z)
            + f32x4::from_slice(&a[12..16]) * f32x4::splat(v.w);
        Vec4::from_array(r.to_array())
    }

    #[inline(always)]
    fn transform_handwritten(&self, v: Vec4) -> Vec4 {
        cfg_if::cfg_if! {
            if #[cfg(feature = "portable_simd")] {
                self.transform_std_simd(v)
            } else {
                self.transform_scalar(v)
            }
        }
    }
}

/// Handwritten vector kernels
pub trait Vec4Kernels {
    /// Multiply each of the 4 components by `k`
    fn scale_scalar(&self, k: f32) -> Vec4;
}

impl Vec4Kernels for Vec4 {
    fn scale_scalar(&self, k: f32) -> Vec4 {
        let mut data = self.to_array();
        for value in data.iter_mut() {
            *value *= k;
        }
        Vec4::from_array(data)
    }
}

/// Homogeneous point (`w = 1`) from a position
#[inline]
pub fn point(p: Vec3) -> Vec4 {
    p.extend(1.0)
}
