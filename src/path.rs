use crate::viewport::Point;

/// Below this screen distance (scaled by zoom) a straight segment is drawn instead of a curve.
const STRAIGHT_LINE_THRESHOLD: f32 = 10.0;

/// Generate an SVG path command for an edge between two screen points.
///
/// Creates a horizontal-biased cubic bezier curve. Control points extend
/// horizontally right of `start` and left of `end`.
///
/// # Arguments
/// * `start` - Output port in screen space
/// * `end` - Input port (or cursor) in screen space
/// * `zoom` - Current zoom level (scales the minimum control point offset)
/// * `min_offset` - Minimum control point offset in world units (default: 50.0)
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 C 60 20 90 80 140 80")
pub fn bezier_path(start: Point, end: Point, zoom: f32, min_offset: f32) -> String {
    let threshold = STRAIGHT_LINE_THRESHOLD * zoom;
    if start.distance_sq(end) < threshold * threshold {
        return format!("M {} {} L {} {}", start.x, start.y, end.x, end.y);
    }

    let offset = ((end.x - start.x).abs() * 0.5).max(min_offset * zoom);
    let c1 = Point::new(start.x + offset, start.y);
    let c2 = Point::new(end.x - offset, end.y);

    format!(
        "M {} {} C {} {} {} {} {} {}",
        start.x, start.y, c1.x, c1.y, c2.x, c2.y, end.x, end.y
    )
}
