//! Instance data handed to the renderer each frame.

use bytemuck::{Pod, Zeroable};

/// Per-element data for the instance buffer.
///
/// 32 bytes, 16-byte aligned rows. The renderer uploads the slice as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Display position (x, y, z) + scale packed in w.
    pub position_scale: [f32; 4],
    /// Visual code, class tag, focus flag, padding.
    pub visual_class_focus: [u32; 4],
}

impl InstanceData {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Flag value in the focus slot for the focused element.
    pub const FOCUSED: u32 = 1;

    /// Packs one element.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], scale: f32, visual: u32, class_tag: u32, focused: bool) -> Self {
        Self {
            position_scale: [position[0], position[1], position[2], scale],
            visual_class_focus: [visual, class_tag, focused as u32, 0],
        }
    }

    /// Position part.
    #[must_use]
    pub const fn position(&self) -> [f32; 3] {
        [self.position_scale[0], self.position_scale[1], self.position_scale[2]]
    }

    /// Scale part.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.position_scale[3]
    }

    /// Whether this row is the focused element.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.visual_class_focus[2] == Self::FOCUSED
    }
}
