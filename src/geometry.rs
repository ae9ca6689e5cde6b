pub use kurbo::{Point, Rect, Size, Vec2};

use crate::error::{MenuetError, MenuetResult};

/// Minimum committed width/height for boxed geometry (free-form items,
/// image widgets), in canvas pixels.
pub const MIN_BOX_PX: f64 = 20.0;

/// Minimum font size a text widget can be resized down to, in canvas pixels.
pub const MIN_TEXT_WIDGET_SIZE: f64 = 10.0;

/// Radius around zero inside which a moved axis snaps to exactly 0.
pub const SNAP_ZERO_PX: f64 = 10.0;

/// Screen-space displacement below which a pointer gesture is a click, not
/// a drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

const MIN_VIEWPORT_SCALE: f64 = 1e-3;

/// The viewport-to-canvas mapping in effect while a gesture runs.
///
/// The presentation layer shrinks the canvas to fit the available width;
/// it never magnifies. All pointer deltas are divided by `scale` to land in
/// canvas-pixel units, the units stored geometry uses. The value is passed
/// into every delta computation rather than read from shared state.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Viewport {
    /// Derive the scale from available viewport width vs. the canvas's
    /// configured width. Degenerate ratios (zero, negative, non-finite)
    /// default to 1.0; valid ratios clamp to `(epsilon, 1.0]`.
    pub fn fit(avail_width: f64, canvas_width: f64) -> Self {
        let ratio = avail_width / canvas_width;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Self { scale: 1.0 };
        }
        Self {
            scale: ratio.clamp(MIN_VIEWPORT_SCALE, 1.0),
        }
    }

    /// Convert a screen-space pointer delta into canvas-pixel units.
    pub fn to_model_delta(self, viewport_delta: Vec2) -> Vec2 {
        Vec2::new(viewport_delta.x / self.scale, viewport_delta.y / self.scale)
    }
}

/// Snap an axis value to exactly 0 when it lands within [`SNAP_ZERO_PX`].
pub fn snap_to_zero(v: f64) -> f64 {
    if v.abs() < SNAP_ZERO_PX { 0.0 } else { v }
}

/// Explicit pixel geometry owned by items of free-form groups.
///
/// Coordinates are canvas pixels relative to the owning group's content
/// origin; committed values are always integral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ItemGeometry {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Default for ItemGeometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            w: 280,
            h: 100,
        }
    }
}

impl ItemGeometry {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> MenuetResult<Self> {
        let geo = Self { x, y, w, h };
        if f64::from(w) < MIN_BOX_PX || f64::from(h) < MIN_BOX_PX {
            return Err(MenuetError::validation(format!(
                "item geometry {w}x{h} is below the {MIN_BOX_PX}px minimum"
            )));
        }
        Ok(geo)
    }

    /// Clamp both size axes up to the minimum. Used on load, never rejects.
    pub fn clamped(mut self) -> Self {
        self.w = self.w.max(MIN_BOX_PX as u32);
        self.h = self.h.max(MIN_BOX_PX as u32);
        self
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h as i32)
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.w),
            f64::from(self.y) + f64::from(self.h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_shrinks_but_never_magnifies() {
        assert_eq!(Viewport::fit(500.0, 1000.0).scale, 0.5);
        assert_eq!(Viewport::fit(2000.0, 1000.0).scale, 1.0);
    }

    #[test]
    fn fit_defaults_on_degenerate_input() {
        assert_eq!(Viewport::fit(800.0, 0.0).scale, 1.0);
        assert_eq!(Viewport::fit(-10.0, 1000.0).scale, 1.0);
        assert_eq!(Viewport::fit(f64::NAN, 1000.0).scale, 1.0);
    }

    #[test]
    fn fit_floors_extreme_ratios() {
        let v = Viewport::fit(1.0, 1e9);
        assert!(v.scale >= MIN_VIEWPORT_SCALE);
    }

    #[test]
    fn model_delta_divides_by_scale() {
        let v = Viewport { scale: 0.5 };
        let d = v.to_model_delta(Vec2::new(100.0, -30.0));
        assert_eq!(d, Vec2::new(200.0, -60.0));
    }

    #[test]
    fn snap_only_inside_radius() {
        assert_eq!(snap_to_zero(9.9), 0.0);
        assert_eq!(snap_to_zero(-9.9), 0.0);
        assert_eq!(snap_to_zero(10.0), 10.0);
        assert_eq!(snap_to_zero(-240.0), -240.0);
    }

    #[test]
    fn geometry_enforces_minimums() {
        assert!(ItemGeometry::new(0, 0, 19, 100).is_err());
        assert!(ItemGeometry::new(-40, 7, 20, 20).is_ok());
        let fixed = ItemGeometry {
            x: 5,
            y: 5,
            w: 1,
            h: 300,
        }
        .clamped();
        assert_eq!((fixed.w, fixed.h), (20, 300));
    }

    #[test]
    fn bottom_edge_and_rect_agree() {
        let g = ItemGeometry::new(10, 20, 30, 40).unwrap();
        assert_eq!(g.bottom(), 60);
        assert_eq!(g.to_rect(), Rect::new(10.0, 20.0, 40.0, 60.0));
    }
}
