//! Anchor positions on shape outlines.
//!
//! An anchor is a fraction of the way around a shape's boundary. Every kind
//! walks its outline in a fixed direction so the same anchor always lands on
//! the same spot no matter where the shape sits.

use std::f64::consts::TAU;

use super::types::{Point, Shape, ShapeKind};

/// Number of snap positions around every shape.
pub const ANCHOR_STEPS: usize = 10;

/// Folds any anchor into `[0, 1)`.
pub fn wrap_anchor(anchor: f64) -> f64 {
	let a = anchor.rem_euclid(1.0);
	// rem_euclid can round up to exactly 1.0 for tiny negative inputs
	if a >= 1.0 { 0.0 } else { a }
}

/// Rounds a raw anchor to the closest snap position, wrapped into `[0, 1)`.
pub fn snap_anchor(anchor: f64) -> f64 {
	let steps = ANCHOR_STEPS as f64;
	let snapped = (wrap_anchor(anchor) * steps).round() as usize % ANCHOR_STEPS;
	snapped as f64 / steps
}

/// Box center for squares and triangles, `(x, y)` for circles.
pub fn shape_center(shape: &Shape) -> Point {
	match shape.kind {
		ShapeKind::Circle => Point::new(shape.x, shape.y),
		_ => Point::new(
			shape.x + shape.width() / 2.0,
			shape.y + shape.height() / 2.0,
		),
	}
}

/// Walks `edges` in order, weighted by length, and returns the point `fraction` of the
/// way along it.
fn along_edges(edges: &[(Point, Point)], fraction: f64) -> Option<Point> {
	let total: f64 = edges.iter().map(|(a, b)| a.distance(*b)).sum();
	if total <= 0.0 {
		return None;
	}
	let mut remaining = fraction * total;
	for &(a, b) in edges {
		let len = a.distance(b);
		if remaining <= len {
			let t = if len > 0.0 { remaining / len } else { 0.0 };
			return Some(a.lerp(b, t));
		}
		remaining -= len;
	}
	edges.last().map(|&(_, b)| b)
}

/// Point at fractional distance `anchor` around the shape's outline.
///
/// Circles start at the top and run clockwise. Squares start at the top-left
/// corner and run clockwise. Triangles go bottom-left to apex, then along the
/// base, then bottom-right to apex.
pub fn point_on_perimeter(shape: &Shape, anchor: f64) -> Point {
	let a = wrap_anchor(anchor);
	match shape.kind {
		ShapeKind::Circle => {
			let r = shape.radius();
			let angle = TAU * a;
			Point::new(shape.x + r * angle.sin(), shape.y - r * angle.cos())
		}
		ShapeKind::Square => {
			let (w, h) = (shape.width(), shape.height());
			let tl = Point::new(shape.x, shape.y);
			let tr = Point::new(shape.x + w, shape.y);
			let br = Point::new(shape.x + w, shape.y + h);
			let bl = Point::new(shape.x, shape.y + h);
			along_edges(&[(tl, tr), (tr, br), (br, bl), (bl, tl)], a)
				.unwrap_or_else(|| shape_center(shape))
		}
		ShapeKind::Triangle => {
			let (w, h) = (shape.width(), shape.height());
			let bl = Point::new(shape.x, shape.y + h);
			let apex = Point::new(shape.x + w / 2.0, shape.y);
			let br = Point::new(shape.x + w, shape.y + h);
			along_edges(&[(bl, apex), (bl, br), (br, apex)], a)
				.unwrap_or_else(|| shape_center(shape))
		}
	}
}

/// The snap position whose outline point is closest to `point`. Ties go to
/// the lowest anchor.
pub fn nearest_anchor(shape: &Shape, point: Point) -> f64 {
	let mut best = (0.0, f64::INFINITY);
	for step in 0..ANCHOR_STEPS {
		let candidate = step as f64 / ANCHOR_STEPS as f64;
		let d = point_on_perimeter(shape, candidate).distance(point);
		if d < best.1 {
			best = (candidate, d);
		}
	}
	best.0
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;

	fn assert_point(p: Point, x: f64, y: f64) {
		assert_abs_diff_eq!(p.x, x, epsilon = 1e-9);
		assert_abs_diff_eq!(p.y, y, epsilon = 1e-9);
	}

	fn shapes() -> Vec<Shape> {
		vec![
			Shape::new("c", ShapeKind::Circle, 50.0, 50.0).with_radius(30.0),
			Shape::new("s", ShapeKind::Square, 10.0, 20.0).with_size(80.0, 40.0),
			Shape::new("t", ShapeKind::Triangle, 0.0, 0.0).with_size(60.0, 80.0),
		]
	}

	#[test]
	fn circle_starts_at_top_and_runs_clockwise() {
		let c = Shape::new("c", ShapeKind::Circle, 0.0, 0.0);
		assert_point(point_on_perimeter(&c, 0.0), 0.0, -20.0);
		assert_point(point_on_perimeter(&c, 0.25), 20.0, 0.0);
		assert_point(point_on_perimeter(&c, 0.5), 0.0, 20.0);
		assert_point(point_on_perimeter(&c, 0.75), -20.0, 0.0);
	}

	#[test]
	fn square_edges_are_weighted_by_length() {
		// perimeter 240: top 80, right 40, bottom 80, left 40
		let s = Shape::new("s", ShapeKind::Square, 10.0, 20.0).with_size(80.0, 40.0);
		assert_point(point_on_perimeter(&s, 0.0), 10.0, 20.0);
		assert_point(point_on_perimeter(&s, 40.0 / 240.0), 50.0, 20.0);
		assert_point(point_on_perimeter(&s, 100.0 / 240.0), 90.0, 40.0);
		assert_point(point_on_perimeter(&s, 0.5), 90.0, 60.0);
		assert_point(point_on_perimeter(&s, 220.0 / 240.0), 10.0, 40.0);
	}

	#[test]
	fn triangle_walks_left_edge_then_base_then_right_edge() {
		let t = Shape::new("t", ShapeKind::Triangle, 0.0, 0.0).with_size(60.0, 80.0);
		let side = (30.0f64 * 30.0 + 80.0 * 80.0).sqrt();
		let total = 2.0 * side + 60.0;
		assert_point(point_on_perimeter(&t, 0.0), 0.0, 80.0);
		assert_point(point_on_perimeter(&t, 0.5 * side / total), 15.0, 40.0);
		assert_point(point_on_perimeter(&t, (side + 30.0) / total), 30.0, 80.0);
		assert_point(point_on_perimeter(&t, (1.5 * side + 60.0) / total), 45.0, 40.0);
	}

	#[test]
	fn anchors_outside_unit_range_wrap() {
		for shape in shapes() {
			let base = point_on_perimeter(&shape, 0.3);
			let p1 = point_on_perimeter(&shape, 1.3);
			let p2 = point_on_perimeter(&shape, -0.7);
			assert_point(p1, base.x, base.y);
			assert_point(p2, base.x, base.y);
		}
	}

	#[test]
	fn outline_closes_at_the_seam() {
		// the triangle walk ends at the apex, not where it started
		for shape in shapes() {
			if shape.kind == ShapeKind::Triangle {
				continue;
			}
			let start = point_on_perimeter(&shape, 0.0);
			let end = point_on_perimeter(&shape, 1.0 - 1e-9);
			assert!(start.distance(end) < 1e-5, "{:?} seam", shape.kind);
		}
	}

	#[test]
	fn center_uses_top_left_for_boxes() {
		let s = Shape::new("s", ShapeKind::Square, 10.0, 10.0);
		assert_point(shape_center(&s), 30.0, 30.0);
		let c = Shape::new("c", ShapeKind::Circle, 10.0, 10.0);
		assert_point(shape_center(&c), 10.0, 10.0);
	}

	#[test]
	fn nearest_anchor_recovers_snap_positions() {
		for shape in shapes() {
			for step in 0..ANCHOR_STEPS {
				let anchor = step as f64 / ANCHOR_STEPS as f64;
				let found = nearest_anchor(&shape, point_on_perimeter(&shape, anchor));
				assert_abs_diff_eq!(found, anchor, epsilon = 1e-12);
			}
		}
	}

	#[test]
	fn nearest_anchor_rounds_off_grid_points() {
		let c = Shape::new("c", ShapeKind::Circle, 0.0, 0.0);
		let p = point_on_perimeter(&c, 0.32);
		assert_abs_diff_eq!(nearest_anchor(&c, p), 0.3, epsilon = 1e-12);
		let p = point_on_perimeter(&c, 0.97);
		assert_abs_diff_eq!(nearest_anchor(&c, p), 0.0, epsilon = 1e-12);
	}

	#[test]
	fn nearest_anchor_prefers_lowest_on_ties() {
		// halfway between anchor 0 at (0, 0) and anchor 0.1 at (16, 0)
		let s = Shape::new("s", ShapeKind::Square, 0.0, 0.0);
		assert_eq!(nearest_anchor(&s, Point::new(8.0, 0.0)), 0.0);
	}

	#[test]
	fn snapping() {
		assert_abs_diff_eq!(snap_anchor(0.34), 0.3, epsilon = 1e-12);
		assert_abs_diff_eq!(snap_anchor(0.96), 0.0, epsilon = 1e-12);
		assert_abs_diff_eq!(snap_anchor(-0.12), 0.9, epsilon = 1e-12);
	}
}
