//! wasm-bindgen surface over `SkinningContext`
//!
//! Bones are addressed by their external ids (4 = upper arm, 5 = lower arm)
//! and axes by index (0 = x, 1 = y, 2 = z). Meshes come back as flat
//! ring-major arrays.

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::bone::{Axis, BoneId, EulerAngles};
use crate::config::SkinningConfig;
use crate::context::SkinningContext;
use crate::{Result, SkinError};

/// Install the console logger and panic hook. Call once from JS at startup.
#[wasm_bindgen]
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
    }
    log::info!("Arm skinning core ready");
}

fn resolve_bone(raw: u32) -> Result<BoneId> {
    BoneId::from_raw(raw).ok_or(SkinError::UnknownBone(raw))
}

fn resolve_axis(index: u8) -> Result<Axis> {
    Axis::from_index(index).ok_or(SkinError::UnknownAxis(index))
}

fn to_js(err: SkinError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct SkinningApp {
    context: SkinningContext,
}

impl Default for SkinningApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SkinningApp {
    pub fn context(&self) -> &SkinningContext {
        &self.context
    }

    fn try_from_config(json: &str) -> Result<Self> {
        let config = SkinningConfig::from_json(json)?;
        Ok(Self {
            context: SkinningContext::new(config),
        })
    }

    fn try_set_geometry(&mut self, height: u32, radius: f32) -> Result<()> {
        self.context.set_geometry(height, radius)
    }

    fn try_set_rotation(&mut self, bone: u32, x: f32, y: f32, z: f32) -> Result<()> {
        let bone = resolve_bone(bone)?;
        self.context.set_rotation(bone, EulerAngles::new(x, y, z))
    }

    fn try_adjust_rotation(&mut self, bone: u32, axis: u8, delta: f32) -> Result<()> {
        let bone = resolve_bone(bone)?;
        let axis = resolve_axis(axis)?;
        self.context.adjust_rotation(bone, axis, delta)
    }

    fn try_set_translation(&mut self, bone: u32, x: f32, y: f32, z: f32) -> Result<()> {
        let bone = resolve_bone(bone)?;
        self.context.set_translation(bone, Vec3::new(x, y, z))
    }

    fn try_set_scale(&mut self, bone: u32, x: f32, y: f32, z: f32) -> Result<()> {
        let bone = resolve_bone(bone)?;
        self.context.set_scale(bone, Vec3::new(x, y, z))
    }

    fn try_bone_matrix(&self, bone: u32) -> Result<Vec<f32>> {
        let id = resolve_bone(bone)?;
        self.context
            .bone_matrix(id)
            .map(|cols| cols.to_vec())
            .ok_or(SkinError::MissingBone(id))
    }
}

#[wasm_bindgen]
impl SkinningApp {
    /// Context with the reference configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> SkinningApp {
        SkinningApp {
            context: SkinningContext::default(),
        }
    }

    /// Context from a JSON configuration
    pub fn from_config_json(json: &str) -> std::result::Result<SkinningApp, JsValue> {
        Self::try_from_config(json).map_err(to_js)
    }

    /// Select a weighting case; returns the case actually selected
    pub fn select_weight_case(&mut self, index: i32) -> u32 {
        self.context.select_weight_case(index as i64).number()
    }

    pub fn weight_case_label(&self) -> String {
        self.context.weight_case().label()
    }

    /// Change the tube shape; fails for heights above `MAX_HEIGHT`
    pub fn set_geometry(&mut self, height: u32, radius: f32) -> std::result::Result<(), JsValue> {
        self.try_set_geometry(height, radius).map_err(to_js)
    }

    pub fn set_bone_rotation(
        &mut self,
        bone: u32,
        x: f32,
        y: f32,
        z: f32,
    ) -> std::result::Result<(), JsValue> {
        self.try_set_rotation(bone, x, y, z).map_err(to_js)
    }

    /// Add `delta` degrees to one rotation axis of a bone
    pub fn adjust_bone_rotation(
        &mut self,
        bone: u32,
        axis: u8,
        delta: f32,
    ) -> std::result::Result<(), JsValue> {
        self.try_adjust_rotation(bone, axis, delta).map_err(to_js)
    }

    pub fn set_bone_translation(
        &mut self,
        bone: u32,
        x: f32,
        y: f32,
        z: f32,
    ) -> std::result::Result<(), JsValue> {
        self.try_set_translation(bone, x, y, z).map_err(to_js)
    }

    pub fn set_bone_scale(
        &mut self,
        bone: u32,
        x: f32,
        y: f32,
        z: f32,
    ) -> std::result::Result<(), JsValue> {
        self.try_set_scale(bone, x, y, z).map_err(to_js)
    }

    /// Run one evaluation cycle. Call every frame before reading meshes.
    pub fn evaluate(&mut self) {
        self.context.evaluate();
    }

    pub fn rings(&self) -> usize {
        self.context.deformed_mesh().rings()
    }

    pub fn segments(&self) -> usize {
        self.context.deformed_mesh().segments()
    }

    pub fn deformed_positions(&self) -> Vec<f32> {
        self.context.deformed_mesh().flat_positions()
    }

    pub fn rest_positions(&self) -> Vec<f32> {
        self.context.rest_mesh().flat_positions()
    }

    /// Deformed mesh in `PackedVertex` layout, ready for a vertex buffer
    pub fn deformed_vertex_bytes(&self) -> Vec<u8> {
        let packed = self.context.deformed_mesh().packed();
        bytemuck::cast_slice(&packed).to_vec()
    }

    /// Column-major local matrix of a bone
    pub fn bone_matrix(&self, bone: u32) -> std::result::Result<Vec<f32>, JsValue> {
        self.try_bone_matrix(bone).map_err(to_js)
    }

    /// Joint positions (bone bases, then chain end) as flat x, y, z triples
    pub fn joint_positions(&self) -> Vec<f32> {
        self.context
            .skeleton()
            .joint_positions()
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SEGMENTS;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::*;

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), test)]
    fn test_reference_app_dimensions() {
        let mut app = SkinningApp::new();
        app.evaluate();
        assert_eq!(app.rings(), 23);
        assert_eq!(app.segments(), SEGMENTS);
        assert_eq!(app.deformed_positions().len(), 23 * SEGMENTS * 3);
        assert_eq!(app.rest_positions().len(), 23 * SEGMENTS * 3);
        assert_eq!(app.deformed_vertex_bytes().len(), 23 * SEGMENTS * 28);
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), test)]
    fn test_weight_case_selection() {
        let mut app = SkinningApp::new();
        assert_eq!(app.select_weight_case(5), 5);
        assert_eq!(app.weight_case_label(), "Weighting Case 5");
        assert_eq!(app.select_weight_case(0), 1);
        assert_eq!(app.weight_case_label(), "Weighting Case 1");
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), test)]
    fn test_pose_input_by_raw_id() {
        let mut app = SkinningApp::new();
        app.set_bone_rotation(5, 0.0, 0.0, 90.0).unwrap();
        app.adjust_bone_rotation(5, 2, -90.0).unwrap();
        app.set_bone_scale(4, 3.0, 1.0, 1.0).unwrap();
        app.set_bone_translation(4, 0.0, 6.0, 0.0).unwrap();
        app.evaluate();

        let lower = app.bone_matrix(5).unwrap();
        assert!((lower[0] - 1.0).abs() < 1e-5);
        assert!(lower[1].abs() < 1e-5);
        let upper = app.bone_matrix(4).unwrap();
        assert_eq!(upper[0], 3.0);

        let joints = app.joint_positions();
        assert_eq!(joints.len(), 9);
        assert_eq!(&joints[0..3], &[0.0, 6.0, 0.0]);
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut app = SkinningApp::new();
        assert!(matches!(
            app.try_set_rotation(9, 0.0, 0.0, 0.0),
            Err(SkinError::UnknownBone(9))
        ));
        assert!(matches!(
            app.try_adjust_rotation(4, 3, 1.0),
            Err(SkinError::UnknownAxis(3))
        ));
        assert!(matches!(app.try_bone_matrix(0), Err(SkinError::UnknownBone(0))));
        assert!(matches!(
            app.try_set_geometry(1 << 30, 1.0),
            Err(SkinError::Mesh(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let app = SkinningApp::try_from_config(r#"{ "height": 3, "weight_case": 2 }"#).unwrap();
        assert_eq!(app.context().rest_mesh().rings(), 7);
        assert_eq!(app.weight_case_label(), "Weighting Case 2");
        assert!(matches!(
            SkinningApp::try_from_config("not json"),
            Err(SkinError::Config(_))
        ));
    }
}
