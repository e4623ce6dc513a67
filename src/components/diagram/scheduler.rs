//! Browser frame scheduling.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;

use super::animator::{FrameId, FrameScheduler};

/// Schedules ticks with `window.requestAnimationFrame`. The callback is
/// installed after construction because it usually needs the animator that
/// owns this scheduler.
#[derive(Clone, Default)]
pub struct RafScheduler {
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl RafScheduler {
	/// A scheduler with no callback yet; requests fail until one is set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs the per-frame callback, shared by every clone.
	pub fn set_callback(&self, callback: Closure<dyn FnMut(f64)>) {
		*self.callback.borrow_mut() = Some(callback);
	}
}

impl FrameScheduler for RafScheduler {
	fn request_frame(&mut self) -> Option<FrameId> {
		let window = web_sys::window()?;
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => Some(id),
			Err(err) => {
				warn!("requestAnimationFrame failed: {err:?}");
				None
			}
		}
	}

	fn cancel_frame(&mut self, id: FrameId) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(id);
		}
	}
}
