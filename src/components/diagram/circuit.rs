//! Stitches an unordered set of connections into one traversable circuit.
//!
//! The walk is greedy: from the far end of the current connection it takes
//! the first unused connection that touches the same shape, in list order.
//! When the incoming and outgoing anchors on that shape differ, a transition
//! segment carries the marker across the shape body. When nothing touches the
//! current shape the walk jumps to the first unused connection with no bridge.

use std::ops::Range;

use super::path::{
	connection_length, ease_in_out_cubic, find_shape, point_on_connection, quadratic_point,
};
use super::perimeter::{point_on_perimeter, shape_center};
use super::types::{Connection, Point, Shape};

/// What a stretch of the circuit runs along.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentKind {
	/// A diagram connection, walked from `to` back to `from` when `reversed`.
	Connection {
		/// Snapshot of the connection when the circuit was built.
		connection: Connection,
		/// Walked from the `to` end.
		reversed: bool,
	},
	/// Crossing `shape_id` from one anchor to another, drawn as a curve
	/// pulled toward the shape center.
	Transition {
		/// Shape being crossed.
		shape_id: String,
		/// Anchor the previous connection arrived at.
		from_anchor: f64,
		/// Anchor the next connection leaves from.
		to_anchor: f64,
	},
}

/// One piece of the circuit and the distances it spans.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitSegment {
	/// Connection or transition.
	pub kind: SegmentKind,
	/// Circuit distance where this segment begins.
	pub start_distance: f64,
	/// Circuit distance where the next segment begins.
	pub end_distance: f64,
}

impl CircuitSegment {
	/// Distance covered by this segment.
	pub fn length(&self) -> f64 {
		self.end_distance - self.start_distance
	}

	/// Id of the connection, `None` on transitions.
	pub fn connection_id(&self) -> Option<&str> {
		match &self.kind {
			SegmentKind::Connection { connection, .. } => Some(&connection.id),
			SegmentKind::Transition { .. } => None,
		}
	}

	/// The connection, `None` on transitions.
	pub fn connection(&self) -> Option<&Connection> {
		match &self.kind {
			SegmentKind::Connection { connection, .. } => Some(connection),
			SegmentKind::Transition { .. } => None,
		}
	}

	/// Whether this segment crosses a shape.
	pub fn is_transition(&self) -> bool {
		matches!(self.kind, SegmentKind::Transition { .. })
	}

	/// Point at local progress `t` in `[0, 1]`. Transitions ease in and out.
	pub fn point_at(&self, shapes: &[Shape], t: f64) -> Option<Point> {
		match &self.kind {
			SegmentKind::Connection {
				connection,
				reversed,
			} => point_on_connection(connection, shapes, t, *reversed),
			SegmentKind::Transition {
				shape_id,
				from_anchor,
				to_anchor,
			} => {
				let shape = find_shape(shapes, shape_id)?;
				Some(quadratic_point(
					point_on_perimeter(shape, *from_anchor),
					shape_center(shape),
					point_on_perimeter(shape, *to_anchor),
					ease_in_out_cubic(t),
				))
			}
		}
	}
}

/// Ordered segments covering `[0, total_length)` without gaps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circuit {
	segments: Vec<CircuitSegment>,
}

impl Circuit {
	/// All segments in walking order.
	pub fn segments(&self) -> &[CircuitSegment] {
		&self.segments
	}

	/// Whether there is nothing to walk.
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// End distance of the last segment, zero when empty.
	pub fn total_length(&self) -> f64 {
		self.segments.last().map_or(0.0, |s| s.end_distance)
	}

	/// The segment covering `distance`, falling back to the last one at the
	/// end of the circuit.
	pub fn segment_at(&self, distance: f64) -> Option<&CircuitSegment> {
		self.segments
			.iter()
			.find(|s| distance >= s.start_distance && distance < s.end_distance)
			.or_else(|| self.segments.last())
	}

	/// Resolves a circuit distance to a point and the segment it lies on.
	pub fn resolve(&self, distance: f64, shapes: &[Shape]) -> Option<(Point, &CircuitSegment)> {
		let segment = self.segment_at(distance)?;
		let length = segment.length();
		let t = if length > 0.0 {
			((distance - segment.start_distance) / length).clamp(0.0, 1.0)
		} else {
			0.0
		};
		segment.point_at(shapes, t).map(|p| (p, segment))
	}

	fn push(&mut self, kind: SegmentKind, length: f64) {
		let start = self.total_length();
		self.segments.push(CircuitSegment {
			kind,
			start_distance: start,
			end_distance: start + length,
		});
	}

	fn push_connection(&mut self, connection: &Connection, reversed: bool, shapes: &[Shape]) {
		let length = connection_length(connection, shapes);
		self.push(
			SegmentKind::Connection {
				connection: connection.clone(),
				reversed,
			},
			length,
		);
	}

	fn push_transition(
		&mut self,
		shape_id: &str,
		from_anchor: f64,
		to_anchor: f64,
		shapes: &[Shape],
	) {
		// chord between the two anchor points, not the outline arc
		let length = find_shape(shapes, shape_id).map_or(0.0, |shape| {
			let exit = point_on_perimeter(shape, from_anchor);
			exit.distance(point_on_perimeter(shape, to_anchor))
		});
		self.push(
			SegmentKind::Transition {
				shape_id: shape_id.to_string(),
				from_anchor,
				to_anchor,
			},
			length,
		);
	}
}

/// Chains connections into one walk. Starting from the first connection, the
/// next one is the first unused connection touching the current shape, walked
/// reversed when needed; a transition crosses the shape when the anchors
/// differ. With no neighbour left, the walk jumps to the first unused one.
pub fn build_circuit(connections: &[Connection], shapes: &[Shape]) -> Circuit {
	let mut circuit = Circuit::default();
	let Some(first) = connections.first() else {
		return circuit;
	};
	circuit.push_connection(first, false, shapes);
	if connections.len() == 1 {
		return circuit;
	}

	let mut used = vec![false; connections.len()];
	used[0] = true;
	let mut current_shape = first.to_shape_id.as_str();
	let mut exit_anchor = first.to_anchor;

	while used.iter().any(|u| !u) {
		let next = connections
			.iter()
			.enumerate()
			.find(|(i, c)| !used[*i] && c.touches(current_shape));

		let index = match next {
			Some((i, c)) => {
				let reversed = c.from_shape_id != current_shape;
				let (entry_anchor, far_shape, far_anchor) = if reversed {
					(c.to_anchor, c.from_shape_id.as_str(), c.from_anchor)
				} else {
					(c.from_anchor, c.to_shape_id.as_str(), c.to_anchor)
				};
				if entry_anchor != exit_anchor {
					circuit.push_transition(current_shape, exit_anchor, entry_anchor, shapes);
				}
				circuit.push_connection(c, reversed, shapes);
				current_shape = far_shape;
				exit_anchor = far_anchor;
				i
			}
			None => {
				let Some(i) = used.iter().position(|u| !u) else {
					break;
				};
				let c = &connections[i];
				circuit.push_connection(c, false, shapes);
				current_shape = c.to_shape_id.as_str();
				exit_anchor = c.to_anchor;
				i
			}
		};
		used[index] = true;
	}
	circuit
}

/// The circuit distances covered by a snake whose head sits at `head`.
#[derive(Clone, Debug, PartialEq)]
pub enum SnakeWindow {
	/// Tail and head on the same lap.
	Single(Range<f64>),
	/// The tail wrapped past the start: `tail..total` then `0..head`.
	Wrapped(Range<f64>, Range<f64>),
}

impl SnakeWindow {
	/// Window of `length` ending at `head` on a circuit of `total`.
	pub fn new(head: f64, length: f64, total: f64) -> Self {
		let head = head.clamp(0.0, total);
		let tail = (head - length).rem_euclid(total);
		if head >= tail {
			SnakeWindow::Single(tail..head)
		} else {
			SnakeWindow::Wrapped(tail..total, 0.0..head)
		}
	}

	/// `count` circuit distances from tail to head, split across both ranges
	/// in proportion to their lengths when wrapped.
	pub fn samples(&self, count: usize) -> Vec<f64> {
		match self {
			SnakeWindow::Single(range) => spread(range, count),
			SnakeWindow::Wrapped(first, second) => {
				let (a, b) = (first.end - first.start, second.end - second.start);
				let span = a + b;
				if count < 2 || span <= 0.0 {
					return spread(first, count);
				}
				let n = ((count as f64 * a / span).round() as usize).clamp(1, count - 1);
				let mut out = spread(first, n);
				out.extend(spread(second, count - n));
				out
			}
		}
	}
}

fn spread(range: &Range<f64>, count: usize) -> Vec<f64> {
	match count {
		0 => Vec::new(),
		1 => vec![range.start],
		_ => (0..count)
			.map(|i| range.start + (range.end - range.start) * i as f64 / (count - 1) as f64)
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;
	use crate::components::diagram::types::ShapeKind;

	fn shapes() -> Vec<Shape> {
		vec![
			Shape::new("a", ShapeKind::Circle, 0.0, 0.0),
			Shape::new("b", ShapeKind::Square, 100.0, 0.0),
			Shape::new("c", ShapeKind::Triangle, 200.0, 100.0),
			Shape::new("d", ShapeKind::Circle, 0.0, 200.0),
		]
	}

	fn assert_partition(circuit: &Circuit) {
		let segments = circuit.segments();
		assert_eq!(segments[0].start_distance, 0.0);
		for pair in segments.windows(2) {
			assert_eq!(pair[0].end_distance, pair[1].start_distance);
		}
		let sum: f64 = segments.iter().map(CircuitSegment::length).sum();
		assert_abs_diff_eq!(circuit.total_length(), sum, epsilon = 1e-9);
	}

	#[test]
	fn empty_input_builds_nothing() {
		let circuit = build_circuit(&[], &shapes());
		assert!(circuit.is_empty());
		assert_eq!(circuit.total_length(), 0.0);
		assert!(circuit.resolve(0.0, &shapes()).is_none());
	}

	#[test]
	fn single_connection_spans_its_length() {
		let shapes = shapes();
		let conn = Connection::new("ab", ("a", 0.25), ("b", 0.9));
		let circuit = build_circuit(std::slice::from_ref(&conn), &shapes);
		assert_eq!(circuit.segments().len(), 1);
		let seg = &circuit.segments()[0];
		assert_eq!(
			seg.kind,
			SegmentKind::Connection {
				connection: conn.clone(),
				reversed: false
			}
		);
		assert_eq!(seg.start_distance, 0.0);
		let expected = connection_length(&conn, &shapes);
		assert_abs_diff_eq!(seg.end_distance, expected, epsilon = 1e-12);
	}

	#[test]
	fn differing_anchors_insert_one_transition() {
		let shapes = shapes();
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.2)),
			Connection::new("bc", ("b", 0.6), ("c", 0.1)),
		];
		let circuit = build_circuit(&conns, &shapes);
		let segments = circuit.segments();
		assert_eq!(segments.len(), 3);
		assert_eq!(segments.iter().filter(|s| s.is_transition()).count(), 1);
		match &segments[1].kind {
			SegmentKind::Transition {
				shape_id,
				from_anchor,
				to_anchor,
			} => {
				assert_eq!(shape_id, "b");
				assert_eq!(*from_anchor, 0.2);
				assert_eq!(*to_anchor, 0.6);
			}
			other => panic!("expected transition, got {other:?}"),
		}
		assert!(segments[1].length() > 0.0);
		assert_partition(&circuit);
	}

	#[test]
	fn matching_anchors_need_no_transition() {
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.5)),
			Connection::new("bc", ("b", 0.5), ("c", 0.1)),
		];
		let circuit = build_circuit(&conns, &shapes());
		assert_eq!(circuit.segments().len(), 2);
		assert!(!circuit.segments().iter().any(CircuitSegment::is_transition));
	}

	#[test]
	fn connection_matched_on_its_target_is_reversed() {
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.3)),
			Connection::new("cb", ("c", 0.1), ("b", 0.3)),
		];
		let circuit = build_circuit(&conns, &shapes());
		assert_eq!(circuit.segments().len(), 2);
		match &circuit.segments()[1].kind {
			SegmentKind::Connection { connection, reversed } => {
				assert_eq!(connection.id, "cb");
				assert!(*reversed);
			}
			other => panic!("expected connection, got {other:?}"),
		}
	}

	#[test]
	fn closed_loop_walks_every_connection_once() {
		let shapes = shapes();
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.9)),
			Connection::new("ca", ("c", 0.0), ("a", 0.5)),
			Connection::new("bc", ("b", 0.4), ("c", 0.0)),
		];
		let circuit = build_circuit(&conns, &shapes);
		let order: Vec<_> = circuit
			.segments()
			.iter()
			.filter_map(CircuitSegment::connection_id)
			.collect();
		assert_eq!(order, ["ab", "bc", "ca"]);
		// b: 0.9 -> 0.4 and a: none since the loop ends there
		let transitions = circuit.segments().iter().filter(|s| s.is_transition());
		assert_eq!(transitions.count(), 1);
		assert_partition(&circuit);
	}

	#[test]
	fn disconnected_pair_jumps_without_a_bridge() {
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.9)),
			Connection::new("cd", ("c", 0.3), ("d", 0.7)),
		];
		let circuit = build_circuit(&conns, &shapes());
		assert_eq!(circuit.segments().len(), 2);
		assert!(!circuit.segments().iter().any(CircuitSegment::is_transition));
		match &circuit.segments()[1].kind {
			SegmentKind::Connection { reversed, .. } => assert!(!reversed),
			other => panic!("expected connection, got {other:?}"),
		}
		assert_partition(&circuit);
	}

	#[test]
	fn near_equal_anchors_still_count_as_different() {
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.1)),
			Connection::new("bc", ("b", 0.099999), ("c", 0.1)),
		];
		let circuit = build_circuit(&conns, &shapes());
		assert_eq!(circuit.segments().len(), 3);
		assert!(circuit.segments()[1].length() < 1e-3);
	}

	#[test]
	fn dangling_connections_contribute_zero_length() {
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.5)),
			Connection::new("bx", ("b", 0.5), ("gone", 0.0)),
		];
		let circuit = build_circuit(&conns, &shapes());
		assert_eq!(circuit.segments().len(), 2);
		assert_eq!(circuit.segments()[1].length(), 0.0);
		assert_partition(&circuit);
	}

	#[test]
	fn rebuilding_is_idempotent() {
		let shapes = shapes();
		let conns = vec![
			Connection::new("ab", ("a", 0.25), ("b", 0.2)),
			Connection::new("bc", ("b", 0.6), ("c", 0.1)).curved(Point::new(10.0, -25.0)),
			Connection::new("dc", ("d", 0.3), ("c", 0.7)),
		];
		assert_eq!(build_circuit(&conns, &shapes), build_circuit(&conns, &shapes));
	}

	#[test]
	fn resolve_falls_back_to_the_last_segment_at_the_end() {
		let shapes = shapes();
		let conns = vec![Connection::new("ab", ("a", 0.25), ("b", 0.75))];
		let circuit = build_circuit(&conns, &shapes);
		let (end, seg) = circuit.resolve(circuit.total_length(), &shapes).unwrap();
		assert_eq!(seg.connection_id(), Some("ab"));
		let expected = point_on_perimeter(&shapes[1], 0.75);
		assert_abs_diff_eq!(end.x, expected.x, epsilon = 1e-9);
		assert_abs_diff_eq!(end.y, expected.y, epsilon = 1e-9);
	}

	#[test]
	fn transition_passes_between_its_anchors() {
		let shapes = shapes();
		let seg = CircuitSegment {
			kind: SegmentKind::Transition {
				shape_id: "a".into(),
				from_anchor: 0.0,
				to_anchor: 0.5,
			},
			start_distance: 0.0,
			end_distance: 40.0,
		};
		let start = seg.point_at(&shapes, 0.0).unwrap();
		assert_abs_diff_eq!(start.y, -20.0, epsilon = 1e-9);
		let end = seg.point_at(&shapes, 1.0).unwrap();
		assert_abs_diff_eq!(end.y, 20.0, epsilon = 1e-9);
		// eased: a quarter of the time covers less than a quarter of the way
		let early = seg.point_at(&shapes, 0.25).unwrap();
		assert!(early.y < -10.0);
	}

	#[test]
	fn snake_window_without_wraparound() {
		let window = SnakeWindow::new(290.0, 60.0, 300.0);
		assert_eq!(window, SnakeWindow::Single(230.0..290.0));
		let samples = window.samples(30);
		assert_eq!(samples.len(), 30);
		assert_eq!(samples[0], 230.0);
		assert_eq!(samples[29], 290.0);
	}

	#[test]
	fn snake_window_wraps_past_the_start() {
		let window = SnakeWindow::new(10.0, 60.0, 300.0);
		assert_eq!(window, SnakeWindow::Wrapped(250.0..300.0, 0.0..10.0));
		let samples = window.samples(30);
		assert_eq!(samples.len(), 30);
		// 50 of the 60 covered units come before the wrap
		assert_eq!(samples.iter().filter(|d| **d >= 250.0).count(), 25);
		assert_eq!(samples[0], 250.0);
		assert_eq!(*samples.last().unwrap(), 10.0);
	}
}
