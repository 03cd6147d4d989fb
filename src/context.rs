//! Evaluation context passed to input handlers and the per-frame cycle
//!
//! `SkinningContext` owns everything one arm needs: the skeleton, the
//! configuration, the rest-pose mesh and the deformed mesh. Input handlers
//! and the evaluation cycle take it by `&mut`, so there is no hidden global
//! state and no locking.

use glam::Vec3;

use crate::bone::{Axis, BoneId, EulerAngles};
use crate::config::SkinningConfig;
use crate::mesh::{generate_rest_mesh, MeshGrid, TubeParams};
use crate::skeleton::Skeleton;
use crate::skinning::{compute_skinning_into, SkinningInput};
use crate::weights::WeightCase;
use crate::Result;

pub struct SkinningContext {
    skeleton: Skeleton,
    config: SkinningConfig,
    rest_mesh: MeshGrid,
    deformed_mesh: MeshGrid,
    /// Geometry or weighting changed since the rest mesh was built
    rest_mesh_dirty: bool,
    /// Deformed mesh reflects the current pose and rest mesh
    skinned: bool,
}

impl Default for SkinningContext {
    fn default() -> Self {
        Self::new(SkinningConfig::default())
    }
}

impl SkinningContext {
    pub fn new(config: SkinningConfig) -> Self {
        let rest_mesh = generate_rest_mesh(&config.tube, config.weight_case);
        let deformed_mesh = MeshGrid::new(rest_mesh.rings(), rest_mesh.segments());
        log::info!(
            "Skinning context: height {}, radius {}, {}",
            config.tube.height(),
            config.tube.radius(),
            config.weight_case.label()
        );
        Self {
            skeleton: Skeleton::arm(),
            config,
            rest_mesh,
            deformed_mesh,
            rest_mesh_dirty: false,
            skinned: false,
        }
    }

    pub fn config(&self) -> &SkinningConfig {
        &self.config
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn weight_case(&self) -> WeightCase {
        self.config.weight_case
    }

    /// Select a weighting case by number; unknown numbers select case 1
    pub fn select_weight_case(&mut self, index: i64) -> WeightCase {
        let case = WeightCase::from_index(index);
        if case != self.config.weight_case {
            self.config.weight_case = case;
            self.rest_mesh_dirty = true;
            log::info!("{} selected", case.label());
        }
        case
    }

    /// Change the tube shape. Heights above `MAX_HEIGHT` are rejected and
    /// leave the current geometry in place.
    pub fn set_geometry(&mut self, height: u32, radius: f32) -> Result<()> {
        let tube = TubeParams::new(height, radius)?;
        if tube != self.config.tube {
            self.config.tube = tube;
            self.rest_mesh_dirty = true;
        }
        Ok(())
    }

    pub fn set_translation(&mut self, bone: BoneId, translation: Vec3) -> Result<()> {
        self.skeleton.set_translation(bone, translation)
    }

    pub fn set_rotation(&mut self, bone: BoneId, rotation: EulerAngles) -> Result<()> {
        self.skeleton.set_rotation(bone, rotation)
    }

    pub fn adjust_rotation(&mut self, bone: BoneId, axis: Axis, delta_degrees: f32) -> Result<()> {
        self.skeleton.adjust_rotation(bone, axis, delta_degrees)
    }

    pub fn set_scale(&mut self, bone: BoneId, scale: Vec3) -> Result<()> {
        self.skeleton.set_scale(bone, scale)
    }

    /// Run one evaluation cycle: bone matrices, rest mesh (only if geometry
    /// or weighting changed), then skinning (only if anything changed).
    pub fn evaluate(&mut self) {
        let posed = self.skeleton.evaluate_dirty();

        let remeshed = self.rest_mesh_dirty;
        if remeshed {
            self.rebuild_rest_mesh();
        }

        if posed || remeshed || !self.skinned {
            self.skin();
        }
    }

    /// Run every step of the cycle regardless of dirty state
    pub fn evaluate_full(&mut self) {
        self.skeleton.evaluate();
        self.rebuild_rest_mesh();
        self.skin();
    }

    fn rebuild_rest_mesh(&mut self) {
        self.rest_mesh = generate_rest_mesh(&self.config.tube, self.config.weight_case);
        self.rest_mesh_dirty = false;
    }

    fn skin(&mut self) {
        let matrices = self.skeleton.local_matrices();
        let input = SkinningInput {
            rest: &self.rest_mesh,
            bone_matrices: &matrices,
            bone_base_offset: self.config.bone_base_offset,
        };
        compute_skinning_into(&input, &mut self.deformed_mesh);
        self.skinned = true;
        log::debug!("Skinned {} vertices", self.deformed_mesh.len());
    }

    pub fn rest_mesh(&self) -> &MeshGrid {
        &self.rest_mesh
    }

    /// Deformed mesh from the last `evaluate`
    pub fn deformed_mesh(&self) -> &MeshGrid {
        &self.deformed_mesh
    }

    /// Column-major local matrix of a bone, for inspection
    pub fn bone_matrix(&self, bone: BoneId) -> Option<[f32; 16]> {
        self.skeleton.matrix_columns(bone)
    }
}
