// Copyright 2016 spatial-rs Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Axis-aligned rectangles and the geometric operations the tree strategies rely on.

use crate::error::RTreeError;

/// An axis-aligned rectangle in 2D, immutable after construction.
///
/// `min_x <= max_x` and `min_y <= max_y` always hold; a degenerate rect with
/// zero width or height on an axis is permitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Rect {
    /// Builds a new rect, failing with [`RTreeError::InvalidRectangle`] if either axis
    /// has `min > max` or any coordinate is non-finite.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Rect, RTreeError> {
        let finite = [min_x, min_y, max_x, max_y].iter().all(|c| c.is_finite());
        if !finite || min_x > max_x || min_y > max_y {
            return Err(RTreeError::InvalidRectangle {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Rect {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// The smallest rect enclosing a single point.
    pub fn from_point(x: f64, y: f64) -> Result<Rect, RTreeError> {
        Rect::new(x, y, x, y)
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `(max_x - min_x) * (max_y - min_y)`.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The smallest rect containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// The area added to `self`'s cover by growing it to also contain `other`.
    /// Always non-negative.
    pub fn enlargement(&self, other: &Rect) -> f64 {
        (self.union(other).area() - self.area()).max(0.0)
    }

    /// `true` iff the two rects' projections overlap on both axes. Touching edges count
    /// as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// The overlapping region of `self` and `other`, or `None` if they do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// The "dead space" of grouping `self` and `other`: the area of their union minus
    /// the sum of their individual areas. Used by the quadratic split seed selection.
    pub fn dead_space(&self, other: &Rect) -> f64 {
        self.union(other).area() - self.area() - other.area()
    }
}

#[cfg(feature = "geo")]
mod geo_interop {
    use super::Rect;
    use crate::error::RTreeError;

    impl TryFrom<geo::Rect<f64>> for Rect {
        type Error = RTreeError;

        fn try_from(rect: geo::Rect<f64>) -> Result<Rect, RTreeError> {
            let min = rect.min();
            let max = rect.max();
            Rect::new(min.x, min.y, max.x, max.y)
        }
    }

    impl From<Rect> for geo::Rect<f64> {
        fn from(rect: Rect) -> geo::Rect<f64> {
            geo::Rect::new(
                geo::coord! { x: rect.min_x(), y: rect.min_y() },
                geo::coord! { x: rect.max_x(), y: rect.max_y() },
            )
        }
    }
}
