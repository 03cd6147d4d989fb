//! Linear blend skinning with two influences per vertex

use glam::{Mat4, Vec3};

use crate::bone::BoneId;
use crate::math::{point, Mat4Kernels};
use crate::mesh::{MeshGrid, SkinVertex};

/// Height of the bone pivot the rest mesh is re-centered on before skinning
pub const BONE_BASE_OFFSET: f32 = 5.0;

/// Local bone matrices indexed by `BoneId::index`
pub type BoneMatrices = [Mat4; BoneId::COUNT];

/// Skinning input data
pub struct SkinningInput<'a> {
    /// Rest-pose mesh with bone ids and weights
    pub rest: &'a MeshGrid,
    /// Current bone matrices
    pub bone_matrices: &'a BoneMatrices,
    /// Subtracted from every rest vertex's y before transforming
    pub bone_base_offset: f32,
}

/// `w1 * m1 + w2 * m2`
pub fn blend_matrices(m1: &Mat4, w1: f32, m2: &Mat4, w2: f32) -> Mat4 {
    m1.scale_scalar(w1).add_scalar(&m2.scale_scalar(w2))
}

/// Deform a single vertex. Bone ids and weights carry over unchanged.
pub fn skin_vertex(vertex: &SkinVertex, matrices: &BoneMatrices, bone_base_offset: f32) -> SkinVertex {
    let blended = blend_matrices(
        &matrices[vertex.bones[0].index()],
        vertex.weights[0],
        &matrices[vertex.bones[1].index()],
        vertex.weights[1],
    );

    let origin = point(vertex.position - Vec3::new(0.0, bone_base_offset, 0.0));
    let deformed = blended.transform_handwritten(origin);

    SkinVertex {
        position: deformed.truncate(),
        ..*vertex
    }
}

/// Compute a freshly allocated deformed mesh
pub fn compute_skinning(input: &SkinningInput) -> MeshGrid {
    let mut output = MeshGrid::new(input.rest.rings(), input.rest.segments());
    compute_skinning_into(input, &mut output);
    output
}

/// Overwrite `output` with the deformed mesh. `output` is resized to the
/// rest mesh's dimensions if they differ.
pub fn compute_skinning_into(input: &SkinningInput, output: &mut MeshGrid) {
    if output.rings() != input.rest.rings() || output.segments() != input.rest.segments() {
        *output = MeshGrid::new(input.rest.rings(), input.rest.segments());
    }

    for (out, vertex) in output
        .vertices_mut()
        .iter_mut()
        .zip(input.rest.vertices())
    {
        *out = skin_vertex(vertex, input.bone_matrices, input.bone_base_offset);
    }
}
