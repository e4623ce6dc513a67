use leptos::ev::MouseEvent;
use leptos::prelude::*;
use log::warn;

use crate::components::diagram::{
	AnimationConfig, AnimationMode, DiagramCanvas, DiagramError, DiagramState, Point, ShapeKind,
};

/// A small constellation: a closed loop through three shapes, one curved
/// edge, and a detached pair that makes the marker jump.
fn sample_diagram() -> Result<DiagramState, DiagramError> {
	let mut state = DiagramState::new(AnimationConfig {
		enabled: true,
		rotation_speed: 4.0,
		..AnimationConfig::default()
	});
	let a = state.add_shape(ShapeKind::Circle, 240.0, 200.0);
	let b = state.add_shape(ShapeKind::Square, 420.0, 120.0);
	let c = state.add_shape(ShapeKind::Triangle, 400.0, 320.0);
	let d = state.add_shape(ShapeKind::Circle, 640.0, 220.0);
	let e = state.add_shape(ShapeKind::Square, 760.0, 360.0);
	let (a, b, c) = (a.as_str(), b.as_str(), c.as_str());
	let (d, e) = (d.as_str(), e.as_str());

	state.add_connection((a, 0.2), (b, 0.9), None)?;
	let bend = Some(Point::new(60.0, 0.0));
	state.add_connection((b, 0.5), (c, 0.2), bend)?;
	let closing = state.add_connection((c, 0.0), (a, 0.5), None)?;
	let pink = Some("#f472b6".to_string());
	state.set_connection_color(&closing, pink)?;
	let bend = Some(Point::new(-30.0, 30.0));
	state.add_connection((d, 0.4), (e, 0.0), bend)?;
	Ok(state)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let diagram = sample_diagram().unwrap_or_else(|err| {
		warn!("sample diagram incomplete: {err}");
		DiagramState::default()
	});
	let state = RwSignal::new(diagram);

	let toggle = move |_: MouseEvent| {
		state.update(|s| {
			let config = s.config_mut();
			config.enabled = !config.enabled;
		})
	};
	let switch_mode = move |_: MouseEvent| {
		state.update(|s| {
			let config = s.config_mut();
			config.mode = match config.mode {
				AnimationMode::Dot => AnimationMode::Snake,
				AnimationMode::Snake => AnimationMode::Dot,
			};
		})
	};
	let faster = move |_: MouseEvent| state.update(|s| s.config_mut().speed *= 1.5);
	let slower = move |_: MouseEvent| state.update(|s| s.config_mut().speed /= 1.5);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-diagram">
				<DiagramCanvas state=state fullscreen=true />
				<div class="diagram-overlay">
					<h1>"Circuit Canvas"</h1>
					<p class="subtitle">
						{move || {
							state
								.with(|s| {
									let c = s.config();
									format!(
										"{} · {:?} mode · speed {:.2}",
										if c.enabled { "playing" } else { "stopped" },
										c.mode,
										c.speed,
									)
								})
						}}
					</p>
					<button on:click=toggle>"Play / Stop"</button>
					<button on:click=switch_mode>"Dot / Snake"</button>
					<button on:click=slower>"Slower"</button>
					<button on:click=faster>"Faster"</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
