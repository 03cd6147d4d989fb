use super::id::BoneId;

/// Dirty flags for skipping bone evaluation work.
/// Bit i corresponds to the BoneId with index i.
///
/// Bones do not inherit their parent's matrix, so marking a bone never
/// dirties its child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    /// Create with every bone marked dirty
    pub fn all_dirty() -> Self {
        Self((1 << BoneId::COUNT) - 1)
    }

    /// Check if a bone is dirty (needs recomputation)
    #[inline]
    pub fn is_dirty(&self, bone: BoneId) -> bool {
        (self.0 & (1 << bone.index())) != 0
    }

    /// Check if any bone is dirty
    #[inline]
    pub fn is_any_dirty(&self) -> bool {
        self.0 != 0
    }

    /// Return new flags with a bone marked dirty
    #[inline]
    pub fn with_marked_dirty(self, bone: BoneId) -> Self {
        Self(self.0 | (1 << bone.index()))
    }

    /// Return new flags with dirty flag cleared for a bone
    #[inline]
    pub fn with_cleared(self, bone: BoneId) -> Self {
        Self(self.0 & !(1 << bone.index()))
    }

    /// Return clean flags
    #[inline]
    pub fn cleared() -> Self {
        Self(0)
    }
}
