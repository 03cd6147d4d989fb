//! Two-bone arm skeleton
//!
//! The rig is a chain: the upper arm owns the lower arm, which ends the
//! chain. Each bone keeps its own transform state and a derived local
//! matrix that is rewritten on every evaluation.

use glam::{Mat4, Vec3};

use crate::bone::{Axis, BoneId, BoneTransform, DirtyFlags, EulerAngles, BONE_HIERARCHY};
use crate::math::Mat4Kernels;
use crate::{Result, SkinError};

/// Half-width of the bone gizmo's shoulder ring
pub const GIZMO_HALF_WIDTH: f32 = 0.4;

/// Vertices in one bone gizmo line strip
pub const GIZMO_STRIP_LEN: usize = 14;

/// A joint in the chain. Owns at most one child.
#[derive(Debug, Clone)]
pub struct Bone {
    pub id: BoneId,
    pub transform: BoneTransform,
    /// Derived from `transform` by the last evaluation, never authoritative
    pub local_matrix: Mat4,
    /// Distance from this bone's base to its child joint
    pub length: f32,
    pub child: Option<Box<Bone>>,
}

impl Bone {
    pub fn new(id: BoneId, transform: BoneTransform, length: f32) -> Self {
        Self {
            id,
            transform,
            local_matrix: Mat4::IDENTITY,
            length,
            child: None,
        }
    }

    pub fn with_child(mut self, child: Bone) -> Self {
        self.child = Some(Box::new(child));
        self
    }

    /// Rewrite this bone's local matrix and recurse down the chain
    fn evaluate(&mut self) {
        self.local_matrix = self.transform.local_matrix();
        if let Some(child) = self.child.as_deref_mut() {
            child.evaluate();
        }
    }

    fn find(&self, id: BoneId) -> Option<&Bone> {
        if self.id == id {
            return Some(self);
        }
        self.child.as_deref().and_then(|child| child.find(id))
    }

    fn find_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        if self.id == id {
            return Some(self);
        }
        self.child.as_deref_mut().and_then(|child| child.find_mut(id))
    }
}

/// The arm rig plus per-bone dirty tracking.
#[derive(Debug, Clone)]
pub struct Skeleton {
    root: Bone,
    dirty: DirtyFlags,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::arm()
    }
}

impl Skeleton {
    /// Build the reference rig: upper arm at (0, 5, 0), lower arm 5 units
    /// below it, unit scale, no rotation. Matrices are evaluated immediately.
    pub fn arm() -> Self {
        let upper_def = &BONE_HIERARCHY[BoneId::UpperArm.index()];
        let lower_def = &BONE_HIERARCHY[BoneId::LowerArm.index()];

        let lower = Bone::new(
            BoneId::LowerArm,
            BoneTransform::from_translation(lower_def.translation),
            lower_def.length,
        );
        let upper = Bone::new(
            BoneId::UpperArm,
            BoneTransform::from_translation(upper_def.translation),
            upper_def.length,
        )
        .with_child(lower);

        let mut skeleton = Self {
            root: upper,
            dirty: DirtyFlags::all_dirty(),
        };
        skeleton.evaluate();
        skeleton
    }

    pub fn root(&self) -> &Bone {
        &self.root
    }

    /// Iterate the chain from the root down
    pub fn bones(&self) -> impl Iterator<Item = &Bone> {
        std::iter::successors(Some(&self.root), |bone| bone.child.as_deref())
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.root.find(id)
    }

    fn bone_mut(&mut self, id: BoneId) -> Result<&mut Bone> {
        self.root.find_mut(id).ok_or(SkinError::MissingBone(id))
    }

    /// Apply a change to a bone's transform and mark it dirty
    fn update(&mut self, id: BoneId, f: impl FnOnce(&mut BoneTransform)) -> Result<()> {
        let bone = self.bone_mut(id)?;
        f(&mut bone.transform);
        self.dirty = self.dirty.with_marked_dirty(id);
        Ok(())
    }

    pub fn set_translation(&mut self, id: BoneId, translation: Vec3) -> Result<()> {
        self.update(id, |t| t.translation = translation)
    }

    pub fn set_rotation(&mut self, id: BoneId, rotation: EulerAngles) -> Result<()> {
        self.update(id, |t| t.rotation = rotation)
    }

    /// Add `delta_degrees` to one rotation axis
    pub fn adjust_rotation(&mut self, id: BoneId, axis: Axis, delta_degrees: f32) -> Result<()> {
        self.update(id, |t| {
            let current = t.rotation.get(axis);
            t.rotation.set(axis, current + delta_degrees);
        })
    }

    pub fn set_scale(&mut self, id: BoneId, scale: Vec3) -> Result<()> {
        self.update(id, |t| t.scale = scale)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_any_dirty()
    }

    /// Rewrite every bone's local matrix, dirty or not
    pub fn evaluate(&mut self) {
        self.root.evaluate();
        self.dirty = DirtyFlags::cleared();
    }

    /// Rewrite only the bones whose transform changed since the last
    /// evaluation. Returns whether any matrix was rewritten.
    pub fn evaluate_dirty(&mut self) -> bool {
        let dirty = self.dirty;
        if !dirty.is_any_dirty() {
            return false;
        }

        let mut remaining = dirty;
        let mut current = Some(&mut self.root);
        while let Some(bone) = current {
            if dirty.is_dirty(bone.id) {
                bone.local_matrix = bone.transform.local_matrix();
                remaining = remaining.with_cleared(bone.id);
            }
            current = bone.child.as_deref_mut();
        }

        self.dirty = remaining;
        true
    }

    pub fn local_matrix(&self, id: BoneId) -> Option<Mat4> {
        self.bone(id).map(|bone| bone.local_matrix)
    }

    /// Local matrices indexed by `BoneId::index`
    pub fn local_matrices(&self) -> [Mat4; BoneId::COUNT] {
        let mut matrices = [Mat4::IDENTITY; BoneId::COUNT];
        for bone in self.bones() {
            matrices[bone.id.index()] = bone.local_matrix;
        }
        matrices
    }

    /// Flat column-major copy of a bone's local matrix
    pub fn matrix_columns(&self, id: BoneId) -> Option<[f32; 16]> {
        self.local_matrix(id).map(|m| m.to_cols_array())
    }

    pub fn log_bone_matrix(&self, id: BoneId) {
        match self.matrix_columns(id) {
            Some(cols) => log::debug!("bone {} ({}) matrix: {:?}", id.raw(), id.name(), cols),
            None => log::warn!("bone {} ({}) is not in the rig", id.raw(), id.name()),
        }
    }

    /// Accumulated `T * R` matrices down the chain, indexed by
    /// `BoneId::index`. These place bone gizmos; skinning never reads them.
    pub fn pose_matrices(&self) -> [Mat4; BoneId::COUNT] {
        let mut matrices = [Mat4::IDENTITY; BoneId::COUNT];
        let mut parent = Mat4::IDENTITY;
        for bone in self.bones() {
            let world = parent.multiply_handwritten(&bone.transform.pose_matrix());
            matrices[bone.id.index()] = world;
            parent = world;
        }
        matrices
    }

    /// World position of each bone's base followed by the end of the chain
    pub fn joint_positions(&self) -> Vec<Vec3> {
        let pose = self.pose_matrices();
        let mut joints: Vec<Vec3> = self
            .bones()
            .map(|bone| pose[bone.id.index()].transform_point3(Vec3::ZERO))
            .collect();

        if let Some(last) = self.bones().last() {
            let tip = Vec3::new(0.0, -last.length, 0.0);
            joints.push(pose[last.id.index()].transform_point3(tip));
        }
        joints
    }
}

/// Line strip outlining a bone gizmo in the bone's local frame: a small
/// square ring at the base, a cap above it, and edges down to the child
/// joint at `(0, -length, 0)`.
pub fn bone_gizmo_strip(length: f32) -> [Vec3; GIZMO_STRIP_LEN] {
    let w = GIZMO_HALF_WIDTH;
    let top = Vec3::new(0.0, w, 0.0);
    let c1 = Vec3::new(-w, 0.0, -w);
    let c2 = Vec3::new(w, 0.0, -w);
    let c3 = Vec3::new(w, 0.0, w);
    let c4 = Vec3::new(-w, 0.0, w);
    let tip = Vec3::new(0.0, -length, 0.0);

    [top, c1, c2, tip, c1, c4, top, c2, c3, top, c4, tip, c3, c4]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const TOL: f32 = 1e-5;

    #[test]
    fn test_arm_rig_layout() {
        let skeleton = Skeleton::arm();
        let ids: Vec<BoneId> = skeleton.bones().map(|b| b.id).collect();
        assert_eq!(ids, vec![BoneId::UpperArm, BoneId::LowerArm]);
        assert!(skeleton.bone(BoneId::LowerArm).unwrap().child.is_none());
        assert!(!skeleton.is_dirty());

        for bone in skeleton.bones() {
            assert!(bone.local_matrix.abs_diff_eq(Mat4::IDENTITY, TOL));
        }
    }

    #[test]
    fn test_rotation_updates_only_that_bone() {
        let mut skeleton = Skeleton::arm();
        skeleton
            .set_rotation(BoneId::LowerArm, EulerAngles::new(0.0, 0.0, 90.0))
            .unwrap();
        assert!(skeleton.is_dirty());

        // Stale until evaluated
        assert!(skeleton
            .local_matrix(BoneId::LowerArm)
            .unwrap()
            .abs_diff_eq(Mat4::IDENTITY, TOL));

        skeleton.evaluate();
        let lower = skeleton.local_matrix(BoneId::LowerArm).unwrap();
        let p = lower * Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert!((p - Vec4::new(0.0, 1.0, 0.0, 1.0)).abs().max_element() < TOL);

        // No parent accumulation: the upper arm is untouched
        let upper = skeleton.local_matrix(BoneId::UpperArm).unwrap();
        assert!(upper.abs_diff_eq(Mat4::IDENTITY, TOL));
    }

    #[test]
    fn test_parent_rotation_does_not_reach_child_matrix() {
        let mut skeleton = Skeleton::arm();
        skeleton
            .set_rotation(BoneId::UpperArm, EulerAngles::new(45.0, 10.0, 0.0))
            .unwrap();
        skeleton.evaluate();
        assert!(skeleton
            .local_matrix(BoneId::LowerArm)
            .unwrap()
            .abs_diff_eq(Mat4::IDENTITY, TOL));
    }

    #[test]
    fn test_adjust_rotation_accumulates() {
        let mut skeleton = Skeleton::arm();
        for _ in 0..3 {
            skeleton
                .adjust_rotation(BoneId::LowerArm, Axis::Z, 2.0)
                .unwrap();
        }
        skeleton.adjust_rotation(BoneId::LowerArm, Axis::Y, -2.0).unwrap();
        let rotation = skeleton.bone(BoneId::LowerArm).unwrap().transform.rotation;
        assert_eq!(rotation, EulerAngles::new(0.0, -2.0, 6.0));
    }

    #[test]
    fn test_translation_does_not_change_local_matrix() {
        let mut skeleton = Skeleton::arm();
        skeleton
            .set_translation(BoneId::UpperArm, Vec3::new(10.0, 0.0, 3.0))
            .unwrap();
        skeleton.evaluate();
        assert!(skeleton
            .local_matrix(BoneId::UpperArm)
            .unwrap()
            .abs_diff_eq(Mat4::IDENTITY, TOL));
    }

    #[test]
    fn test_evaluate_dirty_matches_full_evaluation() {
        let mut lazy = Skeleton::arm();
        let mut full = Skeleton::arm();
        for skeleton in [&mut lazy, &mut full] {
            skeleton
                .set_rotation(BoneId::UpperArm, EulerAngles::new(12.0, 34.0, 56.0))
                .unwrap();
            skeleton
                .set_scale(BoneId::LowerArm, Vec3::new(1.0, 2.0, 1.0))
                .unwrap();
        }

        assert!(lazy.evaluate_dirty());
        full.evaluate();
        assert_eq!(lazy.local_matrices(), full.local_matrices());

        // Nothing left to do
        assert!(!lazy.evaluate_dirty());
    }

    #[test]
    fn test_matrix_columns_are_column_major() {
        let mut skeleton = Skeleton::arm();
        skeleton
            .set_scale(BoneId::UpperArm, Vec3::new(2.0, 3.0, 4.0))
            .unwrap();
        skeleton.evaluate();
        let cols = skeleton.matrix_columns(BoneId::UpperArm).unwrap();
        assert_eq!(cols[0], 2.0);
        assert_eq!(cols[5], 3.0);
        assert_eq!(cols[10], 4.0);
        assert_eq!(cols[15], 1.0);
    }

    #[test]
    fn test_joint_positions_at_rest() {
        let skeleton = Skeleton::arm();
        let joints = skeleton.joint_positions();
        assert_eq!(joints.len(), BoneId::COUNT + 1);
        assert!(joints[0].abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), TOL));
        assert!(joints[1].abs_diff_eq(Vec3::ZERO, TOL));
        assert!(joints[2].abs_diff_eq(Vec3::new(0.0, -5.0, 0.0), TOL));
    }

    #[test]
    fn test_joint_positions_follow_parent_rotation() {
        let mut skeleton = Skeleton::arm();
        skeleton
            .set_rotation(BoneId::UpperArm, EulerAngles::new(0.0, 0.0, 90.0))
            .unwrap();
        let joints = skeleton.joint_positions();
        // The elbow swings from below the shoulder to its side
        assert!(joints[1].abs_diff_eq(Vec3::new(5.0, 5.0, 0.0), 1e-4));
        assert!(joints[2].abs_diff_eq(Vec3::new(10.0, 5.0, 0.0), 1e-4));
    }

    #[test]
    fn test_gizmo_strip_reaches_child_joint() {
        let strip = bone_gizmo_strip(5.0);
        assert_eq!(strip.len(), GIZMO_STRIP_LEN);
        let tips = strip
            .iter()
            .filter(|v| v.abs_diff_eq(Vec3::new(0.0, -5.0, 0.0), TOL))
            .count();
        assert_eq!(tips, 2);
    }
}
