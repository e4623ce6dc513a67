//! Geometry of connections between shapes.

use super::perimeter::point_on_perimeter;
use super::types::{Connection, Point, Shape};

/// Polyline steps used to measure a curved connection.
pub const CURVE_SAMPLES: usize = 20;

/// Looks a shape up by id.
pub fn find_shape<'a>(shapes: &'a [Shape], id: &str) -> Option<&'a Shape> {
	shapes.iter().find(|s| s.id == id)
}

/// Quadratic Bézier through `p0` and `p1` with `control`, at `t` in `[0, 1]`.
pub fn quadratic_point(p0: Point, control: Point, p1: Point, t: f64) -> Point {
	let mt = 1.0 - t;
	Point::new(
		mt * mt * p0.x + 2.0 * mt * t * control.x + t * t * p1.x,
		mt * mt * p0.y + 2.0 * mt * t * control.y + t * t * p1.y,
	)
}

/// Cubic ease-in-out, fixed at 0, ½ and 1.
pub fn ease_in_out_cubic(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Start point, end point and optional control point of a connection, or
/// `None` when either shape no longer exists.
pub fn connection_endpoints(
	connection: &Connection,
	shapes: &[Shape],
) -> Option<(Point, Point, Option<Point>)> {
	let from = find_shape(shapes, &connection.from_shape_id)?;
	let to = find_shape(shapes, &connection.to_shape_id)?;
	let start = point_on_perimeter(from, connection.from_anchor);
	let end = point_on_perimeter(to, connection.to_anchor);
	let control = connection
		.curve_offset
		.map(|offset| start.midpoint(end).offset(offset));
	Some((start, end, control))
}

/// Point at progress `t` along a connection. With `reversed` the walk starts at
/// the `to` end; the curve itself is the same either way.
pub fn point_on_connection(
	connection: &Connection,
	shapes: &[Shape],
	t: f64,
	reversed: bool,
) -> Option<Point> {
	let (start, end, control) = connection_endpoints(connection, shapes)?;
	let t = if reversed { 1.0 - t } else { t };
	Some(match control {
		Some(c) => quadratic_point(start, c, end, t),
		None => start.lerp(end, t),
	})
}

/// Exact length for straight connections, a sampled polyline length for
/// curved ones, and zero for dangling ones.
pub fn connection_length(connection: &Connection, shapes: &[Shape]) -> f64 {
	let Some((start, end, control)) = connection_endpoints(connection, shapes) else {
		return 0.0;
	};
	let Some(c) = control else {
		return start.distance(end);
	};
	let mut length = 0.0;
	let mut prev = start;
	for i in 1..=CURVE_SAMPLES {
		let p = quadratic_point(start, c, end, i as f64 / CURVE_SAMPLES as f64);
		length += prev.distance(p);
		prev = p;
	}
	length
}
