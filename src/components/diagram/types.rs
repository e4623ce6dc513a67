//! Plain data exchanged between the diagram engine and the UI around it.

/// Width and height of a square or triangle placed without a size.
pub const DEFAULT_SIZE: f64 = 40.0;
/// Radius of a circle placed without a size.
pub const DEFAULT_RADIUS: f64 = 20.0;

/// A canvas position in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal pixel coordinate.
	pub x: f64,
	/// Vertical pixel coordinate, growing downward.
	pub y: f64,
}

impl Point {
	/// Builds a point from its coordinates.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (other.x - self.x, other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Linear interpolation toward `other`; `t = 0` is `self`.
	pub fn lerp(self, other: Point, t: f64) -> Point {
		Point::new(
			self.x + (other.x - self.x) * t,
			self.y + (other.y - self.y) * t,
		)
	}

	/// Halfway point between `self` and `other`.
	pub fn midpoint(self, other: Point) -> Point {
		self.lerp(other, 0.5)
	}

	/// `self` translated by `by`.
	pub fn offset(self, by: Point) -> Point {
		Point::new(self.x + by.x, self.y + by.y)
	}
}

/// The outlines a shape can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
	/// Axis-aligned box, `width` by `height`.
	Square,
	/// Isosceles triangle with its apex at the top-center of the box.
	Triangle,
	/// Circle of `radius` around `(x, y)`.
	Circle,
}

/// A placed shape. `(x, y)` is the top-left corner for squares and triangles
/// and the center for circles.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
	/// Stable identity, referenced by connections.
	pub id: String,
	/// Left edge, or center for circles.
	pub x: f64,
	/// Top edge, or center for circles.
	pub y: f64,
	/// Which outline this shape has.
	pub kind: ShapeKind,
	/// Box width; [`DEFAULT_SIZE`] when unset.
	pub width: Option<f64>,
	/// Box height; [`DEFAULT_SIZE`] when unset.
	pub height: Option<f64>,
	/// Circle radius; [`DEFAULT_RADIUS`] when unset.
	pub radius: Option<f64>,
}

impl Shape {
	/// A shape of default size.
	pub fn new(id: impl Into<String>, kind: ShapeKind, x: f64, y: f64) -> Self {
		Self {
			id: id.into(),
			x,
			y,
			kind,
			width: None,
			height: None,
			radius: None,
		}
	}

	/// Sets an explicit box size.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = Some(width);
		self.height = Some(height);
		self
	}

	/// Sets an explicit circle radius.
	pub fn with_radius(mut self, radius: f64) -> Self {
		self.radius = Some(radius);
		self
	}

	/// Box width with the default applied.
	pub fn width(&self) -> f64 {
		self.width.unwrap_or(DEFAULT_SIZE)
	}

	/// Box height with the default applied.
	pub fn height(&self) -> f64 {
		self.height.unwrap_or(DEFAULT_SIZE)
	}

	/// Circle radius with the default applied.
	pub fn radius(&self) -> f64 {
		self.radius.unwrap_or(DEFAULT_RADIUS)
	}
}

/// A line between two shapes, anchored at normalized perimeter positions.
///
/// Shapes are referenced by id only; a connection may outlive its shapes for a
/// frame and every consumer has to resolve them by lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	/// Stable identity.
	pub id: String,
	/// Shape the line starts on.
	pub from_shape_id: String,
	/// Shape the line ends on.
	pub to_shape_id: String,
	/// Anchor on the start shape, in `[0, 1)`.
	pub from_anchor: f64,
	/// Anchor on the end shape, in `[0, 1)`.
	pub to_anchor: f64,
	/// Added to the segment midpoint to place the quadratic control point.
	/// `None` draws a straight line.
	pub curve_offset: Option<Point>,
	/// Stroke color, also used by the snake while it runs along this line.
	pub color: Option<String>,
}

impl Connection {
	/// A straight, uncolored connection between `(shape_id, anchor)` pairs.
	pub fn new(id: impl Into<String>, from: (&str, f64), to: (&str, f64)) -> Self {
		Self {
			id: id.into(),
			from_shape_id: from.0.to_string(),
			to_shape_id: to.0.to_string(),
			from_anchor: from.1,
			to_anchor: to.1,
			curve_offset: None,
			color: None,
		}
	}

	/// Bends the line through midpoint + `offset`.
	pub fn curved(mut self, offset: Point) -> Self {
		self.curve_offset = Some(offset);
		self
	}

	/// Sets the stroke color.
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}

	/// Whether either end sits on `shape_id`.
	pub fn touches(&self, shape_id: &str) -> bool {
		self.from_shape_id == shape_id || self.to_shape_id == shape_id
	}
}

/// How the marker is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationMode {
	/// A single point.
	#[default]
	Dot,
	/// A trailing polyline of fixed fractional length.
	Snake,
}

/// Snapshot of the animation settings, re-read by the animator every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
	/// Playback runs while set.
	pub enabled: bool,
	/// Multiplier on marker speed; must be positive.
	pub speed: f64,
	/// Dot or snake.
	pub mode: AnimationMode,
	/// Dot diameter and snake stroke width in pixels.
	pub dot_size: f64,
	/// Dot fill, and the snake color when its connection has none.
	pub dot_color: String,
	/// Fraction of the total circuit covered by the snake, in `(0, 1)`.
	pub snake_length: f64,
	/// Constellation spin in degrees per second.
	pub rotation_speed: f64,
}

impl Default for AnimationConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			speed: 1.0,
			mode: AnimationMode::Dot,
			dot_size: 6.0,
			dot_color: "#38bdf8".into(),
			snake_length: 0.2,
			rotation_speed: 0.0,
		}
	}
}

impl AnimationConfig {
	/// `speed`, or `1.0` when it is not a positive finite number.
	pub fn effective_speed(&self) -> f64 {
		if self.speed.is_finite() && self.speed > 0.0 {
			self.speed
		} else {
			1.0
		}
	}
}

/// The marker position for one frame in dot mode. `connection_id` is `None`
/// while the dot is crossing a shape body.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDot {
	/// Connection the dot is on.
	pub connection_id: Option<String>,
	/// Horizontal position.
	pub x: f64,
	/// Vertical position.
	pub y: f64,
	/// Fraction of the current lap, in `[0, 1)`.
	pub progress: f64,
}

/// The visible trail for one frame in snake mode, tail first.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeSegment {
	/// Sampled positions from tail to head.
	pub points: Vec<Point>,
	/// Color to stroke the trail with.
	pub stroke_color: String,
}

/// What the canvas should draw on top of the diagram this frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RenderPayload {
	/// Nothing to draw.
	#[default]
	Empty,
	/// A single marker.
	Dot(AnimationDot),
	/// A trailing polyline.
	Snake(SnakeSegment),
}

impl RenderPayload {
	/// Whether nothing is drawn.
	pub fn is_empty(&self) -> bool {
		matches!(self, RenderPayload::Empty)
	}
}
