//! Inclusive integer cell box

use crate::core::types::IVec3;

/// Inclusive box over integer cell coordinates
///
/// `max < min` on any axis marks the empty box; `EMPTY` is the identity
/// for `extend_*` operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IBox3 {
    pub min: IVec3,
    pub max: IVec3,
}

impl IBox3 {
    /// The empty box
    pub const EMPTY: IBox3 = IBox3 {
        min: IVec3::MAX,
        max: IVec3::MIN,
    };

    /// Box from inclusive corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Box covering `size` cells starting at `origin`; non-positive sizes
    /// produce the empty box
    pub fn from_origin_size(origin: IVec3, size: IVec3) -> Self {
        if size.cmple(IVec3::ZERO).any() {
            return Self::EMPTY;
        }
        Self { min: origin, max: origin + size - IVec3::ONE }
    }

    pub fn is_empty(&self) -> bool {
        self.max.cmplt(self.min).any()
    }

    /// Cell count per axis; zero when empty
    pub fn size(&self) -> IVec3 {
        if self.is_empty() {
            IVec3::ZERO
        } else {
            self.max - self.min + IVec3::ONE
        }
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Grow to include a single cell
    pub fn extend_point(&mut self, p: IVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to include another box
    pub fn extend_box(&mut self, other: &IBox3) {
        if !other.is_empty() {
            self.extend_point(other.min);
            self.extend_point(other.max);
        }
    }

    /// Union of two boxes
    pub fn union(&self, other: &IBox3) -> IBox3 {
        let mut out = *self;
        out.extend_box(other);
        out
    }
}

impl Default for IBox3 {
    fn default() -> Self {
        Self::EMPTY
    }
}
