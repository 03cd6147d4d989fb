use glam::Vec3;

// --- Constants ---

/// Upper arm base position relative to the rig origin
pub const UPPER_ARM_TRANSLATION: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// Lower arm base position relative to the upper arm base
pub const LOWER_ARM_TRANSLATION: Vec3 = Vec3::new(0.0, -5.0, 0.0);

/// Distance from each bone's base to its child joint
pub const BONE_LENGTH: f32 = 5.0;

/// Identifier for each bone in the arm rig.
/// Ordered parent before child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BoneId {
    UpperArm = 0,
    LowerArm = 1,
}

impl BoneId {
    /// Total number of bones in the rig
    pub const COUNT: usize = 2;

    /// All bone IDs, parent first
    pub const ALL: [BoneId; Self::COUNT] = [BoneId::UpperArm, BoneId::LowerArm];

    /// Convert to array index
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// External identifier, as exposed to renderers and pose input
    pub const fn raw(self) -> u32 {
        match self {
            BoneId::UpperArm => 4,
            BoneId::LowerArm => 5,
        }
    }

    pub const fn from_raw(raw: u32) -> Option<BoneId> {
        match raw {
            4 => Some(BoneId::UpperArm),
            5 => Some(BoneId::LowerArm),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BoneId::UpperArm => "upper_arm",
            BoneId::LowerArm => "lower_arm",
        }
    }
}

/// Static bone definition: rest placement and gizmo length
#[derive(Debug, Clone, Copy)]
pub struct BoneDef {
    /// Parent bone (None for root)
    pub parent: Option<BoneId>,
    /// Base position relative to the parent's base
    pub translation: Vec3,
    /// Distance to the child joint
    pub length: f32,
}

/// Arm rig definition. The lower arm hangs below the upper arm and its own
/// end joint sits a further `BONE_LENGTH` below.
pub const BONE_HIERARCHY: [BoneDef; BoneId::COUNT] = [
    BoneDef {
        parent: None,
        translation: UPPER_ARM_TRANSLATION,
        length: BONE_LENGTH,
    },
    BoneDef {
        parent: Some(BoneId::UpperArm),
        translation: LOWER_ARM_TRANSLATION,
        length: BONE_LENGTH,
    },
];
