//! Maps pointer clicks on a horizontal bar into a normalized fraction.
//!
//! Used identically for the timeline and the volume bar; only the controller
//! method that consumes the fraction differs.

/// Horizontal extent of a rendered bar, in the same coordinate space as the
/// pointer position (pixels, terminal cells, whatever the front end uses).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarBounds {
    pub left: f64,
    pub width: f64,
}

impl BarBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }
}

/// Fraction of the bar covered by a click at `pointer_x`, clamped to [0, 1].
/// A degenerate bar (zero or negative width) yields 0.0 rather than dividing
/// by zero.
pub fn click_fraction(pointer_x: f64, bar: BarBounds) -> f64 {
    if bar.width <= 0.0 {
        return 0.0;
    }
    ((pointer_x - bar.left) / bar.width).clamp(0.0, 1.0)
}
