//! Tube mesh: a ring-major grid of skinned vertices
//!
//! The rest-pose grid is generated from the tube parameters and a weighting
//! case. The deformed grid has the same layout and is rebuilt by the
//! skinning pass.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::const_assert_eq;
use thiserror::Error;

use crate::bone::BoneId;
use crate::weights::WeightCase;

/// Angular step between segments, in degrees
pub const ANGLE_STEP_DEGREES: u32 = 10;

/// Segments per ring. 0..=360 degrees, so the seam vertex appears twice.
pub const SEGMENTS: usize = (360 / ANGLE_STEP_DEGREES) as usize + 1;

/// Distance between consecutive rings along the tube axis
pub const RING_SPACING: f32 = 0.5;

/// Default tube height (rings = 2 * height + 1)
pub const DEFAULT_HEIGHT: u32 = 11;

pub const DEFAULT_RADIUS: f32 = 1.75;

/// Tallest tube accepted (8193 rings, about 300k vertices)
pub const MAX_HEIGHT: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("ring {index} out of range (mesh has {rings} rings)")]
    RingOutOfRange { index: usize, rings: usize },

    #[error("segment {index} out of range (mesh has {segments} segments)")]
    SegmentOutOfRange { index: usize, segments: usize },

    #[error("tube height {height} exceeds the maximum of {max}")]
    HeightTooLarge { height: u32, max: u32 },
}

/// Tube geometry parameters. The height never exceeds `MAX_HEIGHT`, so
/// ring and vertex counts cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawTubeParams")]
pub struct TubeParams {
    height: u32,
    radius: f32,
}

/// Unchecked form read from config files
#[derive(Deserialize)]
struct RawTubeParams {
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_radius")]
    radius: f32,
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

impl TryFrom<RawTubeParams> for TubeParams {
    type Error = MeshError;

    fn try_from(raw: RawTubeParams) -> Result<Self, MeshError> {
        Self::new(raw.height, raw.radius)
    }
}

impl Default for TubeParams {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl TubeParams {
    pub fn new(height: u32, radius: f32) -> Result<Self, MeshError> {
        if height > MAX_HEIGHT {
            return Err(MeshError::HeightTooLarge {
                height,
                max: MAX_HEIGHT,
            });
        }
        Ok(Self { height, radius })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rings(&self) -> usize {
        2 * self.height as usize + 1
    }
}

/// A surface point influenced by two bones. `weights[k]` pairs with
/// `bones[k]`; the homogeneous `w` is always 1 and not stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinVertex {
    pub position: Vec3,
    pub bones: [BoneId; 2],
    pub weights: [f32; 2],
}

impl SkinVertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            bones: [BoneId::UpperArm, BoneId::LowerArm],
            weights: [0.0, 0.0],
        }
    }

    pub fn packed(&self) -> PackedVertex {
        PackedVertex {
            position: self.position.to_array(),
            bone_ids: [self.bones[0].raw(), self.bones[1].raw()],
            weights: self.weights,
        }
    }
}

/// GPU upload layout for a skinned vertex
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 3],
    /// External bone identifiers (`BoneId::raw`)
    pub bone_ids: [u32; 2],
    pub weights: [f32; 2],
}

const_assert_eq!(std::mem::size_of::<PackedVertex>(), 28);

/// Ring-major grid of vertices: index = ring * segments + segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    rings: usize,
    segments: usize,
    vertices: Vec<SkinVertex>,
}

impl MeshGrid {
    /// Grid of default vertices at the origin
    pub fn new(rings: usize, segments: usize) -> Self {
        Self {
            rings,
            segments,
            vertices: vec![SkinVertex::new(Vec3::ZERO); rings * segments],
        }
    }

    pub fn rings(&self) -> usize {
        self.rings
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[SkinVertex] {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut [SkinVertex] {
        &mut self.vertices
    }

    fn check(&self, ring: usize, segment: usize) -> Result<usize, MeshError> {
        if ring >= self.rings {
            return Err(MeshError::RingOutOfRange {
                index: ring,
                rings: self.rings,
            });
        }
        if segment >= self.segments {
            return Err(MeshError::SegmentOutOfRange {
                index: segment,
                segments: self.segments,
            });
        }
        Ok(ring * self.segments + segment)
    }

    pub fn get(&self, ring: usize, segment: usize) -> Result<&SkinVertex, MeshError> {
        let i = self.check(ring, segment)?;
        Ok(&self.vertices[i])
    }

    pub fn get_mut(&mut self, ring: usize, segment: usize) -> Result<&mut SkinVertex, MeshError> {
        let i = self.check(ring, segment)?;
        Ok(&mut self.vertices[i])
    }

    /// All segments of one ring
    pub fn ring(&self, ring: usize) -> Result<&[SkinVertex], MeshError> {
        let start = self.check(ring, 0)?;
        Ok(&self.vertices[start..start + self.segments])
    }

    pub fn ring_mut(&mut self, ring: usize) -> Result<&mut [SkinVertex], MeshError> {
        let start = self.check(ring, 0)?;
        Ok(&mut self.vertices[start..start + self.segments])
    }

    /// Positions in ring-major, segment-minor order
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.position.to_array()).collect()
    }

    /// Positions flattened to `x, y, z, x, y, z, ...`
    pub fn flat_positions(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| v.position.to_array())
            .collect()
    }

    /// Interleaved positions `(ring, j), (ring + 1, j)` for every segment j,
    /// ready to draw as one quad/triangle strip.
    pub fn strip(&self, ring: usize) -> Result<Vec<Vec3>, MeshError> {
        let lower = self.ring(ring)?;
        let upper = self.ring(ring + 1)?;
        Ok(lower
            .iter()
            .zip(upper)
            .flat_map(|(a, b)| [a.position, b.position])
            .collect())
    }

    pub fn packed(&self) -> Vec<PackedVertex> {
        self.vertices.iter().map(SkinVertex::packed).collect()
    }
}

/// Build the rest-pose tube: ring i sits at height `0.5 * i`, segment j at
/// angle `10 * j` degrees around the Y axis. Weights come from `case`.
pub fn generate_rest_mesh(params: &TubeParams, case: WeightCase) -> MeshGrid {
    let rings = params.rings();
    let mut mesh = MeshGrid::new(rings, SEGMENTS);

    for (index, vertex) in mesh.vertices_mut().iter_mut().enumerate() {
        let ring = index / SEGMENTS;
        let segment = index % SEGMENTS;
        let (sin, cos) = ((segment as u32 * ANGLE_STEP_DEGREES) as f32)
            .to_radians()
            .sin_cos();
        *vertex = SkinVertex::new(Vec3::new(
            params.radius * sin,
            RING_SPACING * ring as f32,
            params.radius * cos,
        ));
    }

    case.apply(&mut mesh);
    log::debug!(
        "Generated rest mesh: {} rings x {} segments, radius {}, {}",
        rings,
        SEGMENTS,
        params.radius,
        case.label()
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f32 = 1e-5;

    #[test]
    fn test_reference_dimensions() {
        let mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case1);
        assert_eq!(SEGMENTS, 37);
        assert_eq!(mesh.rings(), 23);
        assert_eq!(mesh.segments(), 37);
        assert_eq!(mesh.len(), 23 * 37);
    }

    #[test]
    fn test_vertex_placement() {
        let params = TubeParams::new(2, 2.0).unwrap();
        let mesh = generate_rest_mesh(&params, WeightCase::Case1);

        let v = mesh.get(0, 0).unwrap();
        assert!(v.position.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), TOL));

        // 90 degrees
        let v = mesh.get(3, 9).unwrap();
        assert!(v.position.abs_diff_eq(Vec3::new(2.0, 1.5, 0.0), TOL));

        for ring in 0..mesh.rings() {
            let row = mesh.ring(ring).unwrap();
            for v in row {
                let r = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
                assert!((r - 2.0).abs() < TOL);
                assert_eq!(v.bones, [BoneId::UpperArm, BoneId::LowerArm]);
            }
        }
    }

    #[test]
    fn test_seam_is_duplicated() {
        let mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case2);
        for ring in 0..mesh.rings() {
            let first = mesh.get(ring, 0).unwrap().position;
            let last = mesh.get(ring, SEGMENTS - 1).unwrap().position;
            assert!(first.abs_diff_eq(last, 1e-4));
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let params = TubeParams::new(11, 1.75).unwrap();
        let a = generate_rest_mesh(&params, WeightCase::Case3);
        let b = generate_rest_mesh(&params, WeightCase::Case3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_weights_follow_case() {
        let mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case1);
        assert_eq!(mesh.get(0, 5).unwrap().weights, [0.0, 1.0]);
        assert_eq!(mesh.get(20, 5).unwrap().weights, [1.0, 0.0]);
        assert_eq!(mesh.get(10, 0).unwrap().weights, [0.5, 0.5]);
    }

    #[test]
    fn test_out_of_range_access() {
        let mut mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case1);
        assert_eq!(
            mesh.get(23, 0).unwrap_err(),
            MeshError::RingOutOfRange {
                index: 23,
                rings: 23
            }
        );
        assert_eq!(
            mesh.get(0, 37).unwrap_err(),
            MeshError::SegmentOutOfRange {
                index: 37,
                segments: 37
            }
        );
        assert!(mesh.get_mut(100, 100).is_err());
        assert!(mesh.ring(23).is_err());
        assert!(mesh.strip(22).is_err());

        let message = mesh.get(30, 0).unwrap_err().to_string();
        assert!(message.contains("ring 30"), "{}", message);
    }

    #[test]
    fn test_height_is_capped() {
        assert_eq!(TubeParams::new(MAX_HEIGHT, 1.0).unwrap().rings(), 8193);
        assert_eq!(
            TubeParams::new(u32::MAX, 1.0).unwrap_err(),
            MeshError::HeightTooLarge {
                height: u32::MAX,
                max: MAX_HEIGHT
            }
        );

        let err = serde_json::from_str::<TubeParams>(r#"{ "height": 5000 }"#).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{}", err);
        let params: TubeParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, TubeParams::default());
    }

    #[test]
    fn test_strip_interleaves_rings() {
        let mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case1);
        let strip = mesh.strip(4).unwrap();
        assert_eq!(strip.len(), 2 * SEGMENTS);
        assert!((strip[0].y - 2.0).abs() < TOL);
        assert!((strip[1].y - 2.5).abs() < TOL);
        assert_eq!(strip[2], mesh.get(4, 1).unwrap().position);
    }

    #[test]
    fn test_flat_and_packed_layouts() {
        let mesh = generate_rest_mesh(&TubeParams::default(), WeightCase::Case1);
        let flat = mesh.flat_positions();
        assert_eq!(flat.len(), mesh.len() * 3);
        let positions = mesh.positions();
        assert_eq!(positions[38], [flat[114], flat[115], flat[116]]);

        let packed = mesh.packed();
        assert_eq!(packed[0].bone_ids, [4, 5]);
        let bytes: &[u8] = bytemuck::cast_slice(&packed);
        assert_eq!(bytes.len(), mesh.len() * 28);
    }
}
