/// Z-ordering layer for draw items.
///
/// Higher values appear on top of lower values. Items on the same layer keep
/// their insertion order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Default layer for the sketch canvas; paint order is call order.
    pub const CANVAS: ZIndex = ZIndex(0);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}
