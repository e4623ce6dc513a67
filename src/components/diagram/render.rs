use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::path::connection_endpoints;
use super::state::DiagramState;
use super::types::{AnimationConfig, RenderPayload, Shape, ShapeKind};

const BACKGROUND: &str = "#1a1a2e";
const SHAPE_FILL: &str = "rgba(100, 180, 255, 0.15)";
const SHAPE_STROKE: &str = "rgba(100, 180, 255, 0.9)";
const LINE_STROKE: &str = "rgba(100, 180, 255, 0.6)";

pub struct Viewport {
	pub width: f64,
	pub height: f64,
	/// Constellation spin in degrees, applied around the canvas center.
	pub rotation: f64,
}

pub fn render(
	state: &DiagramState,
	payload: &RenderPayload,
	view: &Viewport,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, view.width, view.height);
	ctx.save();
	if view.rotation != 0.0 {
		let (cx, cy) = (view.width / 2.0, view.height / 2.0);
		let _ = ctx.translate(cx, cy);
		let _ = ctx.rotate(view.rotation.to_radians());
		let _ = ctx.translate(-cx, -cy);
	}
	draw_connections(state, ctx);
	for shape in state.shapes() {
		draw_shape(shape, ctx);
	}
	draw_payload(payload, state.config(), ctx);
	ctx.restore();
}

fn draw_connections(state: &DiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(2.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(8.0),
		&JsValue::from_f64(4.0),
	));
	for connection in state.connections() {
		// dangling connections are skipped until the cascade catches up
		let Some((start, end, control)) = connection_endpoints(connection, state.shapes()) else {
			continue;
		};
		ctx.set_stroke_style_str(connection.color.as_deref().unwrap_or(LINE_STROKE));
		ctx.begin_path();
		ctx.move_to(start.x, start.y);
		match control {
			Some(c) => ctx.quadratic_curve_to(c.x, c.y, end.x, end.y),
			None => ctx.line_to(end.x, end.y),
		}
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_shape(shape: &Shape, ctx: &CanvasRenderingContext2d) {
	ctx.begin_path();
	match shape.kind {
		ShapeKind::Circle => {
			let _ = ctx.arc(shape.x, shape.y, shape.radius(), 0.0, 2.0 * PI);
		}
		ShapeKind::Square => ctx.rect(shape.x, shape.y, shape.width(), shape.height()),
		ShapeKind::Triangle => {
			let (w, h) = (shape.width(), shape.height());
			ctx.move_to(shape.x, shape.y + h);
			ctx.line_to(shape.x + w / 2.0, shape.y);
			ctx.line_to(shape.x + w, shape.y + h);
			ctx.close_path();
		}
	}
	ctx.set_fill_style_str(SHAPE_FILL);
	ctx.fill();
	ctx.set_stroke_style_str(SHAPE_STROKE);
	ctx.set_line_width(1.5);
	ctx.stroke();
}

fn draw_payload(
	payload: &RenderPayload,
	config: &AnimationConfig,
	ctx: &CanvasRenderingContext2d,
) {
	match payload {
		RenderPayload::Empty => {}
		RenderPayload::Dot(dot) => {
			ctx.begin_path();
			let _ = ctx.arc(dot.x, dot.y, config.dot_size / 2.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&config.dot_color);
			ctx.fill();
		}
		RenderPayload::Snake(snake) => {
			let Some((first, rest)) = snake.points.split_first() else {
				return;
			};
			ctx.begin_path();
			ctx.move_to(first.x, first.y);
			for p in rest {
				ctx.line_to(p.x, p.y);
			}
			ctx.set_stroke_style_str(&snake.stroke_color);
			ctx.set_line_width(config.dot_size);
			ctx.set_line_cap("round");
			ctx.set_line_join("round");
			ctx.stroke();
		}
	}
}
