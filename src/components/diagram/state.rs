//! The editable diagram: shapes, connections and animation settings.

use log::{debug, warn};

use super::error::{DiagramError, Result};
use super::perimeter::{nearest_anchor, snap_anchor, wrap_anchor};
use super::types::{AnimationConfig, Connection, Point, Shape, ShapeKind};

/// Everything on the canvas: shapes, the connections between them and the
/// animation settings. Connections are owned by the shape collection in the
/// sense that removing a shape removes every connection touching it.
#[derive(Clone, Debug, Default)]
pub struct DiagramState {
	shapes: Vec<Shape>,
	connections: Vec<Connection>,
	config: AnimationConfig,
	next_id: u64,
}

impl DiagramState {
	/// Empty diagram with the given settings.
	pub fn new(config: AnimationConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Shapes in insertion order.
	pub fn shapes(&self) -> &[Shape] {
		&self.shapes
	}

	/// Connections in insertion order.
	pub fn connections(&self) -> &[Connection] {
		&self.connections
	}

	/// Current animation settings.
	pub fn config(&self) -> &AnimationConfig {
		&self.config
	}

	/// Looks a shape up by id.
	pub fn shape(&self, id: &str) -> Option<&Shape> {
		self.shapes.iter().find(|s| s.id == id)
	}

	fn shape_mut(&mut self, id: &str) -> Result<&mut Shape> {
		self.shapes
			.iter_mut()
			.find(|s| s.id == id)
			.ok_or_else(|| DiagramError::UnknownShape(id.to_string()))
	}

	fn fresh_id(&mut self, prefix: &str) -> String {
		self.next_id += 1;
		format!("{prefix}-{}", self.next_id)
	}

	/// Places a shape with default size and returns its id.
	pub fn add_shape(&mut self, kind: ShapeKind, x: f64, y: f64) -> String {
		let id = self.fresh_id("shape");
		debug!("adding {kind:?} {id} at ({x}, {y})");
		self.shapes.push(Shape::new(id.clone(), kind, x, y));
		id
	}

	/// Removes a shape and every connection referencing it. Returns how many
	/// connections went with it.
	pub fn remove_shape(&mut self, id: &str) -> Result<usize> {
		let index = self
			.shapes
			.iter()
			.position(|s| s.id == id)
			.ok_or_else(|| DiagramError::UnknownShape(id.to_string()))?;
		self.shapes.remove(index);
		let before = self.connections.len();
		self.connections.retain(|c| !c.touches(id));
		let removed = before - self.connections.len();
		debug!("removed shape {id} and {removed} connection(s)");
		Ok(removed)
	}

	/// Moves a shape; its connections follow because they hold anchors, not points.
	pub fn move_shape(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
		let shape = self.shape_mut(id)?;
		shape.x = x;
		shape.y = y;
		Ok(())
	}

	/// Sets width and height for boxes, or the radius (half the width) for
	/// circles.
	pub fn resize_shape(&mut self, id: &str, width: f64, height: f64) -> Result<()> {
		let shape = self.shape_mut(id)?;
		match shape.kind {
			ShapeKind::Circle => shape.radius = Some(width / 2.0),
			ShapeKind::Square | ShapeKind::Triangle => {
				shape.width = Some(width);
				shape.height = Some(height);
			}
		}
		Ok(())
	}

	/// Connects two existing shapes. Anchors are wrapped into `[0, 1)`.
	pub fn add_connection(
		&mut self,
		from: (&str, f64),
		to: (&str, f64),
		curve_offset: Option<Point>,
	) -> Result<String> {
		for shape_id in [from.0, to.0] {
			if self.shape(shape_id).is_none() {
				warn!("refusing connection to missing shape {shape_id}");
				return Err(DiagramError::UnknownShape(shape_id.to_string()));
			}
		}
		let id = self.fresh_id("conn");
		let mut connection = Connection::new(
			id.clone(),
			(from.0, wrap_anchor(from.1)),
			(to.0, wrap_anchor(to.1)),
		);
		connection.curve_offset = curve_offset;
		debug!("connecting {} -> {} as {id}", from.0, to.0);
		self.connections.push(connection);
		Ok(id)
	}

	/// Connects two shapes at the snap positions closest to two canvas points,
	/// as a finished two-click drawing gesture does.
	pub fn connect_at(&mut self, from: (&str, Point), to: (&str, Point)) -> Result<String> {
		let from_anchor = self
			.shape(from.0)
			.map(|s| nearest_anchor(s, from.1))
			.ok_or_else(|| DiagramError::UnknownShape(from.0.to_string()))?;
		let to_anchor = self
			.shape(to.0)
			.map(|s| nearest_anchor(s, to.1))
			.ok_or_else(|| DiagramError::UnknownShape(to.0.to_string()))?;
		self.add_connection((from.0, from_anchor), (to.0, to_anchor), None)
	}

	/// Removes a connection and hands it back.
	pub fn remove_connection(&mut self, id: &str) -> Result<Connection> {
		let index = self
			.connections
			.iter()
			.position(|c| c.id == id)
			.ok_or_else(|| DiagramError::UnknownConnection(id.to_string()))?;
		debug!("removed connection {id}");
		Ok(self.connections.remove(index))
	}

	fn connection_mut(&mut self, id: &str) -> Result<&mut Connection> {
		self.connections
			.iter_mut()
			.find(|c| c.id == id)
			.ok_or_else(|| DiagramError::UnknownConnection(id.to_string()))
	}

	/// Bends a connection, or straightens it with `None`.
	pub fn set_curve_offset(&mut self, id: &str, offset: Option<Point>) -> Result<()> {
		self.connection_mut(id)?.curve_offset = offset;
		Ok(())
	}

	/// Sets or clears a connection's stroke color.
	pub fn set_connection_color(&mut self, id: &str, color: Option<String>) -> Result<()> {
		self.connection_mut(id)?.color = color;
		Ok(())
	}

	/// Moves one end of a connection to the snap position nearest `anchor`.
	pub fn snap_endpoint(&mut self, id: &str, at_source: bool, anchor: f64) -> Result<()> {
		let connection = self.connection_mut(id)?;
		let snapped = snap_anchor(anchor);
		if at_source {
			connection.from_anchor = snapped;
		} else {
			connection.to_anchor = snapped;
		}
		Ok(())
	}

	/// Replaces the animation settings.
	pub fn set_config(&mut self, config: AnimationConfig) {
		self.config = config;
	}

	/// Mutable access to the animation settings.
	pub fn config_mut(&mut self) -> &mut AnimationConfig {
		&mut self.config
	}
}
