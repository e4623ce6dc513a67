//! Frame-driven playback of a marker around the circuit.
//!
//! The animator never owns the diagram. It is handed accessors that it calls
//! on every tick, so shapes dragged between frames are picked up immediately.
//! Frames are requested through a [`FrameScheduler`]; in the browser that is
//! `requestAnimationFrame`, in tests a [`ManualScheduler`] stepped by hand.

use log::debug;

use super::circuit::{Circuit, SnakeWindow, build_circuit};
use super::types::{
	AnimationConfig, AnimationDot, AnimationMode, Connection, RenderPayload, Shape, SnakeSegment,
};

/// Time for one lap of a circuit `REFERENCE_LENGTH` pixels long at speed 1.
pub const BASE_DURATION_MS: f64 = 2000.0;
/// Circuit length, in pixels, that takes exactly [`BASE_DURATION_MS`].
pub const REFERENCE_LENGTH: f64 = 200.0;
/// Points sampled along the snake each frame.
pub const SNAKE_SAMPLES: usize = 30;

/// Handle of a scheduled frame.
pub type FrameId = i32;

/// Source of display refresh ticks.
pub trait FrameScheduler {
	/// Asks for one more tick. `None` if no frame could be scheduled.
	fn request_frame(&mut self) -> Option<FrameId>;
	/// Drops a request made with [`FrameScheduler::request_frame`].
	fn cancel_frame(&mut self, id: FrameId);
}

/// Scheduler that only records requests; the caller fires frames itself.
#[derive(Debug, Default)]
pub struct ManualScheduler {
	next_id: FrameId,
	pending: Option<FrameId>,
	/// Every id passed to `cancel_frame`, in order.
	pub cancelled: Vec<FrameId>,
}

impl ManualScheduler {
	/// Whether a frame has been requested and not yet fired.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Consumes the pending request, as a display refresh would.
	pub fn fire(&mut self) -> bool {
		self.pending.take().is_some()
	}
}

impl FrameScheduler for ManualScheduler {
	fn request_frame(&mut self) -> Option<FrameId> {
		self.next_id += 1;
		self.pending = Some(self.next_id);
		self.pending
	}

	fn cancel_frame(&mut self, id: FrameId) {
		if self.pending == Some(id) {
			self.pending = None;
		}
		self.cancelled.push(id);
	}
}

/// Live views of the diagram, re-invoked on every tick.
pub struct DiagramSource {
	shapes: Box<dyn Fn() -> Vec<Shape>>,
	connections: Box<dyn Fn() -> Vec<Connection>>,
	config: Box<dyn Fn() -> AnimationConfig>,
}

impl DiagramSource {
	/// Wraps three accessors, each called once per tick.
	pub fn new(
		shapes: impl Fn() -> Vec<Shape> + 'static,
		connections: impl Fn() -> Vec<Connection> + 'static,
		config: impl Fn() -> AnimationConfig + 'static,
	) -> Self {
		Self {
			shapes: Box::new(shapes),
			connections: Box::new(connections),
			config: Box::new(config),
		}
	}
}

/// Continuous rotation of the whole constellation, in degrees.
#[derive(Clone, Debug, Default)]
pub struct Spin {
	angle: f64,
	last: Option<f64>,
}

impl Spin {
	/// Moves the angle on by the time since the last call and returns it.
	pub fn advance(&mut self, now: f64, degrees_per_second: f64) -> f64 {
		if let Some(last) = self.last {
			let dt = (now - last).max(0.0) / 1000.0;
			self.angle = (self.angle + dt * degrees_per_second).rem_euclid(360.0);
		}
		self.last = Some(now);
		self.angle
	}

	/// Current angle in `[0, 360)`.
	pub fn angle(&self) -> f64 {
		self.angle
	}

	/// Back to zero, forgetting the last timestamp.
	pub fn reset(&mut self) {
		*self = Self::default();
	}
}

/// Lap duration, scaled so the marker moves at the same apparent speed on
/// circuits of any length.
pub fn cycle_duration(total_length: f64, speed: f64) -> f64 {
	BASE_DURATION_MS * (total_length / REFERENCE_LENGTH) / speed
}

/// What to draw `elapsed` milliseconds into playback of `circuit`.
pub fn payload_at(
	circuit: &Circuit,
	shapes: &[Shape],
	config: &AnimationConfig,
	elapsed: f64,
) -> RenderPayload {
	let total = circuit.total_length();
	if circuit.is_empty() || total <= 0.0 {
		return RenderPayload::Empty;
	}
	let duration = cycle_duration(total, config.effective_speed());
	let progress = elapsed.rem_euclid(duration) / duration;
	let distance = progress * total;

	match config.mode {
		AnimationMode::Dot => match circuit.resolve(distance, shapes) {
			Some((point, segment)) => RenderPayload::Dot(AnimationDot {
				connection_id: segment.connection_id().map(str::to_string),
				x: point.x,
				y: point.y,
				progress,
			}),
			None => RenderPayload::Empty,
		},
		AnimationMode::Snake => {
			let length = config.snake_length.clamp(0.0, 1.0) * total;
			let window = SnakeWindow::new(distance, length, total);
			let mut points = Vec::with_capacity(SNAKE_SAMPLES);
			let mut owner = None;
			for d in window.samples(SNAKE_SAMPLES) {
				if let Some((point, segment)) = circuit.resolve(d, shapes) {
					points.push(point);
					owner = segment.connection().or(owner);
				}
			}
			if points.len() < 2 {
				return RenderPayload::Empty;
			}
			let stroke_color = owner
				.and_then(|c| c.color.clone())
				.unwrap_or_else(|| config.dot_color.clone());
			RenderPayload::Snake(SnakeSegment {
				points,
				stroke_color,
			})
		}
	}
}

/// Drives a marker around the diagram circuit, one tick per display refresh.
///
/// The circuit is rebuilt from the [`DiagramSource`] on every tick, so edits
/// made during playback show up on the next frame.
pub struct CircuitAnimator<S: FrameScheduler> {
	source: DiagramSource,
	scheduler: S,
	frame: Option<FrameId>,
	playing: bool,
	start_time: Option<f64>,
	payload: RenderPayload,
	spin: Spin,
	observed_enabled: bool,
}

impl<S: FrameScheduler> CircuitAnimator<S> {
	/// A stopped animator.
	pub fn new(source: DiagramSource, scheduler: S) -> Self {
		Self {
			source,
			scheduler,
			frame: None,
			playing: false,
			start_time: None,
			payload: RenderPayload::Empty,
			spin: Spin::default(),
			observed_enabled: false,
		}
	}

	/// Whether playback is running.
	pub fn is_playing(&self) -> bool {
		self.playing
	}

	/// What the last tick produced.
	pub fn payload(&self) -> &RenderPayload {
		&self.payload
	}

	/// Constellation spin in degrees.
	pub fn rotation(&self) -> f64 {
		self.spin.angle()
	}

	/// The frame scheduler.
	pub fn scheduler(&self) -> &S {
		&self.scheduler
	}

	/// Mutable access to the frame scheduler.
	pub fn scheduler_mut(&mut self) -> &mut S {
		&mut self.scheduler
	}

	/// Begins playback from progress zero. No-op while playing.
	pub fn start(&mut self) {
		if self.playing {
			return;
		}
		debug!("circuit animation started");
		self.playing = true;
		self.start_time = None;
		self.payload = RenderPayload::Empty;
		self.frame = self.scheduler.request_frame();
	}

	/// Cancels the pending frame and clears the payload.
	pub fn stop(&mut self) {
		if let Some(id) = self.frame.take() {
			self.scheduler.cancel_frame(id);
		}
		if self.playing {
			debug!("circuit animation stopped");
		}
		self.playing = false;
		self.start_time = None;
		self.payload = RenderPayload::Empty;
		self.spin.reset();
	}

	/// Stops when playing, starts otherwise.
	pub fn toggle(&mut self) {
		if self.playing {
			self.stop();
		} else {
			self.start();
		}
	}

	/// Starts or stops playback when the externally observed `enabled` flag
	/// changes. Repeated values are ignored.
	pub fn observe_enabled(&mut self, enabled: bool) {
		if enabled == self.observed_enabled {
			return;
		}
		self.observed_enabled = enabled;
		debug!("animation enabled flag changed to {enabled}");
		if enabled && !self.playing {
			self.start();
		} else if !enabled && self.playing {
			self.stop();
		}
	}

	/// One display refresh at timestamp `now` (milliseconds).
	pub fn tick(&mut self, now: f64) {
		self.frame = None;
		if !self.playing {
			return;
		}
		let start = *self.start_time.get_or_insert(now);
		let config = (self.source.config)();
		self.spin.advance(now, config.rotation_speed);

		let connections = (self.source.connections)();
		self.payload = if connections.is_empty() {
			RenderPayload::Empty
		} else {
			let shapes = (self.source.shapes)();
			let circuit = build_circuit(&connections, &shapes);
			payload_at(&circuit, &shapes, &config, now - start)
		};
		self.frame = self.scheduler.request_frame();
	}
}

impl<S: FrameScheduler> Drop for CircuitAnimator<S> {
	fn drop(&mut self) {
		if let Some(id) = self.frame.take() {
			self.scheduler.cancel_frame(id);
		}
	}
}
