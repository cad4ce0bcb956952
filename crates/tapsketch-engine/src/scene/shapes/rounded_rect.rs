use crate::coords::{CornerRadii, Rect};
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Rounded rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub color: Color,
}

impl DrawList {
    /// Records a filled rounded rectangle with a uniform corner radius.
    #[inline]
    pub fn push_rounded_rect(&mut self, z: ZIndex, rect: Rect, radius: f32, color: Color) {
        self.push(z, DrawCmd::RoundedRect(RoundedRectCmd { rect, radii: CornerRadii::all(radius), color }));
    }
}
