//! Shapes, anchored connections and the circuit animation that runs along them.

pub mod animator;
pub mod circuit;
mod component;
pub mod error;
pub mod path;
pub mod perimeter;
mod render;
mod scheduler;
pub mod state;
pub mod types;

pub use animator::{CircuitAnimator, DiagramSource, FrameScheduler, ManualScheduler};
pub use circuit::{Circuit, CircuitSegment, SegmentKind, build_circuit};
pub use component::DiagramCanvas;
pub use error::DiagramError;
pub use perimeter::{nearest_anchor, point_on_perimeter, shape_center};
pub use scheduler::RafScheduler;
pub use state::DiagramState;
pub use types::{
	AnimationConfig, AnimationDot, AnimationMode, Connection, Point, RenderPayload, Shape,
	ShapeKind, SnakeSegment,
};
