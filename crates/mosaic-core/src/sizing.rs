//! Per-axis layout intent.
//!
//! A node answers `layout(container)` with a [`LayoutSize`]: for each axis it
//! says whether it wants an exact extent, any extent, or something in between.
//! Parents turn these intents into concrete sizes with [`crate::stack_layout`]
//! along their main axis and [`Sizing::resolve`] along the cross axis.

use crate::{Size, SizingError};

/// Layout intent for one axis.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Sizing {
    Fixed(f32),
    /// Takes whatever it is given. Same as `Range { min: 0, max: inf }`.
    #[default]
    Flexible,
    Range { min: f32, max: f32 },
}

impl Sizing {
    /// Bounded sizing. Panics when `min > max` or either bound is negative or NaN.
    pub fn range(min: f32, max: f32) -> Self {
        match Self::try_range(min, max) {
            Ok(s) => s,
            Err(e) => panic!("invalid sizing: {e}"),
        }
    }

    pub fn try_range(min: f32, max: f32) -> Result<Self, SizingError> {
        if min.is_nan() || max.is_nan() {
            return Err(SizingError::NotANumber);
        }
        if min < 0.0 {
            return Err(SizingError::Negative(min));
        }
        if min > max {
            return Err(SizingError::MinExceedsMax { min, max });
        }
        Ok(Sizing::Range { min, max })
    }

    /// At least `min`, no upper bound.
    pub fn at_least(min: f32) -> Self {
        Self::range(min, f32::INFINITY)
    }

    /// Anything up to `max`.
    pub fn at_most(max: f32) -> Self {
        Self::range(0.0, max)
    }

    pub fn min(&self) -> f32 {
        match *self {
            Sizing::Fixed(v) => v,
            Sizing::Flexible => 0.0,
            Sizing::Range { min, .. } => min,
        }
    }

    pub fn max(&self) -> f32 {
        match *self {
            Sizing::Fixed(v) => v,
            Sizing::Flexible => f32::INFINITY,
            Sizing::Range { max, .. } => max,
        }
    }

    /// Whether the stack allocator may hand this axis more than its minimum.
    pub fn is_expandable(&self) -> bool {
        !matches!(self, Sizing::Fixed(_))
    }

    /// Concrete extent when offered `available`.
    pub fn resolve(&self, available: f32) -> f32 {
        match *self {
            Sizing::Fixed(v) => v,
            Sizing::Flexible => available.max(0.0),
            Sizing::Range { min, max } => available.clamp(min, max),
        }
    }

    /// Collapses degenerate ranges so equal bounds compare as fixed.
    pub fn normalized(self) -> Self {
        match self {
            Sizing::Range { min, max } if min == max => Sizing::Fixed(min),
            Sizing::Range { min, max } if min == 0.0 && max == f32::INFINITY => Sizing::Flexible,
            other => other,
        }
    }
}

/// Layout result of a node for a given container size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutSize {
    pub width: Sizing,
    pub height: Sizing,
}

impl LayoutSize {
    pub fn new(width: Sizing, height: Sizing) -> Self {
        Self { width, height }
    }

    pub fn fixed(size: Size) -> Self {
        Self {
            width: Sizing::Fixed(size.width),
            height: Sizing::Fixed(size.height),
        }
    }

    pub fn flexible() -> Self {
        Self {
            width: Sizing::Flexible,
            height: Sizing::Flexible,
        }
    }

    pub fn resolve(&self, container: Size) -> Size {
        Size {
            width: self.width.resolve(container.width),
            height: self.height.resolve(container.height),
        }
    }

    pub fn along(&self, axis: Axis) -> Sizing {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    pub fn extent(self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    /// Builds a size from main/cross extents along this axis.
    pub fn pack(self, main: f32, cross: f32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }
}
