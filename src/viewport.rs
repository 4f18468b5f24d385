//! Screen/world coordinate transform.
//!
//! The editor composes its canvas transform as scale-then-translate:
//!
//! ```text
//! screen = world * zoom + pan
//! world  = (screen - pan) / zoom
//! ```
//!
//! Both directions in this module use that order. Anything that converts
//! pointer input (gesture cursor, hit testing, drop targets) must go through
//! [`Viewport::to_world`] rather than re-deriving the formula.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D position. Used for both world and screen space; the context decides which.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Inclusive zoom range enforced by every zoom mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: 0.5, max: 2.0 }
    }
}

impl ZoomBounds {
    /// Clamp `zoom` into range. NaN maps to `min`.
    ///
    /// Inverted bounds (`min > max`) do not panic; `max` wins.
    pub fn clamp(&self, zoom: f32) -> f32 {
        if zoom.is_nan() {
            return self.min;
        }
        zoom.max(self.min).min(self.max)
    }
}

/// Canvas view state: zoom factor and pan offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ORIGIN,
        }
    }
}

impl Viewport {
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self {
            zoom,
            pan: Point::new(pan_x, pan_y),
        }
    }

    /// Zoom used as a divisor. A degenerate zoom falls back to 1.0 so a
    /// malformed view state can never produce infinities.
    fn safe_zoom(&self) -> f32 {
        if self.zoom > 0.0 && self.zoom.is_finite() {
            self.zoom
        } else {
            1.0
        }
    }

    /// Convert a screen-space point to world space.
    pub fn to_world(&self, screen: Point) -> Point {
        let z = self.safe_zoom();
        Point::new((screen.x - self.pan.x) / z, (screen.y - self.pan.y) / z)
    }

    /// Convert a world-space point to screen space.
    pub fn to_screen(&self, world: Point) -> Point {
        let z = self.safe_zoom();
        Point::new(world.x * z + self.pan.x, world.y * z + self.pan.y)
    }

    /// Convert a screen-space length (e.g. a hit radius in pixels) to world units.
    pub fn screen_len_to_world(&self, len: f32) -> f32 {
        len / self.safe_zoom()
    }

    /// Zoom towards `pointer` (screen space), keeping the world point under it fixed.
    ///
    /// `new_zoom` is clamped to `bounds` first; the pan offset is then
    /// recomputed as `pointer - (pointer - pan) * (new_zoom / old_zoom)`.
    pub fn zoom_at(&self, pointer: Point, new_zoom: f32, bounds: &ZoomBounds) -> Viewport {
        let old_zoom = self.safe_zoom();
        let new_zoom = bounds.clamp(new_zoom);
        let ratio = new_zoom / old_zoom;
        Viewport {
            zoom: new_zoom,
            pan: Point::new(
                pointer.x - (pointer.x - self.pan.x) * ratio,
                pointer.y - (pointer.y - self.pan.y) * ratio,
            ),
        }
    }

    /// Set the zoom without moving the pan offset.
    pub fn with_zoom(&self, zoom: f32, bounds: &ZoomBounds) -> Viewport {
        Viewport {
            zoom: bounds.clamp(zoom),
            pan: self.pan,
        }
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&self, dx: f32, dy: f32) -> Viewport {
        Viewport {
            zoom: self.zoom,
            pan: Point::new(self.pan.x + dx, self.pan.y + dy),
        }
    }
}
