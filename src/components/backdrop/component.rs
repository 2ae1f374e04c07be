use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::canvas::CanvasSurface;
use super::controller::{Backdrop, BackdropStatus};
use crate::network::{BackdropError, BackdropResult, Rgb, Viewport, presets};

const VIGNETTE_STYLE: &str = "position: absolute; inset: 0; pointer-events: none; \
	background: radial-gradient(ellipse at center, rgba(0, 0, 0, 0) 55%, rgba(2, 6, 23, 0.85) 100%);";

/// Browser handles that must be released on unmount.
#[derive(Default)]
struct LoopHandles {
	frame_id: Option<i32>,
	animate: Option<Closure<dyn FnMut(f64)>>,
	resize: Option<Closure<dyn FnMut()>>,
	visibility: Option<Closure<dyn FnMut()>>,
}

#[derive(Clone, Copy)]
struct Sizing {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
}

impl Sizing {
	fn measure(&self, window: &Window, canvas: &HtmlCanvasElement) -> Viewport {
		if self.fullscreen {
			let dim = |v: Result<JsValue, JsValue>, fallback| {
				v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
			};
			return Viewport::new(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0));
		}
		Viewport::new(
			self.width.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			self.height.unwrap_or_else(|| {
				canvas
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}
}

fn js_error(what: &'static str) -> impl Fn(JsValue) -> BackdropError {
	move |err| BackdropError::surface(format!("{what}: {err:?}"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> BackdropResult<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.map_err(js_error("get_context"))?
		.ok_or_else(|| BackdropError::surface("2d context unavailable"))?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| BackdropError::surface("context is not a 2d rendering context"))
}

fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width(viewport.width.max(0.0) as u32);
	canvas.set_height(viewport.height.max(0.0) as u32);
}

fn prefers_reduced_motion(window: &Window) -> bool {
	window
		.match_media("(prefers-reduced-motion: reduce)")
		.ok()
		.flatten()
		.is_some_and(|query| query.matches())
}

/// Request the next animation frame unless one is already pending.
fn schedule(handles: &RefCell<LoopHandles>) {
	let mut h = handles.borrow_mut();
	if h.frame_id.is_some() {
		return;
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	h.frame_id = h
		.animate
		.as_ref()
		.and_then(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
}

fn start(
	canvas: HtmlCanvasElement,
	backdrop: Rc<RefCell<Backdrop>>,
	handles: Rc<RefCell<LoopHandles>>,
	status: RwSignal<BackdropStatus>,
	sizing: Sizing,
) -> BackdropResult<()> {
	let window = web_sys::window().ok_or_else(|| BackdropError::surface("no window"))?;
	let ctx = context_2d(&canvas)?;
	let reduced = prefers_reduced_motion(&window);

	let viewport = sizing.measure(&window, &canvas);
	size_canvas(&canvas, viewport);
	{
		let mut b = backdrop.borrow_mut();
		// A failed build leaves the fallback up; a later resize may recover it.
		let _ = b.mount(viewport);
		if let Some(scene) = b.scene() {
			debug!(
				"backdrop live: {} nodes, {} edges, reduced motion {reduced}",
				scene.nodes().len(),
				scene.edges().len()
			);
		}
		status.set(b.status());
	}

	let (backdrop_anim, handles_anim, ctx_anim) = (backdrop.clone(), handles.clone(), ctx.clone());
	handles.borrow_mut().animate = Some(Closure::new(move |now: f64| {
		handles_anim.borrow_mut().frame_id = None;
		let live = backdrop_anim
			.borrow_mut()
			.frame(now, &mut CanvasSurface::new(&ctx_anim));
		if live {
			schedule(&handles_anim);
		}
	}));

	let (backdrop_rs, handles_rs, ctx_rs) = (backdrop.clone(), handles.clone(), ctx.clone());
	let resize: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(win) = web_sys::window() else {
			return;
		};
		let viewport = sizing.measure(&win, &canvas);
		size_canvas(&canvas, viewport);
		let live = {
			let mut b = backdrop_rs.borrow_mut();
			let _ = b.resize(viewport);
			status.set(b.status());
			if reduced {
				b.still(&mut CanvasSurface::new(&ctx_rs));
			}
			b.status() == BackdropStatus::Live
		};
		if live && !reduced {
			schedule(&handles_rs);
		}
	});
	window
		.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
		.map_err(js_error("resize listener"))?;
	handles.borrow_mut().resize = Some(resize);

	if let Some(document) = window.document() {
		let (backdrop_vis, doc) = (backdrop.clone(), document.clone());
		let visibility: Closure<dyn FnMut()> = Closure::new(move || {
			let mut b = backdrop_vis.borrow_mut();
			if doc.hidden() {
				b.pause();
			} else {
				b.resume();
			}
		});
		document
			.add_event_listener_with_callback("visibilitychange", visibility.as_ref().unchecked_ref())
			.map_err(js_error("visibility listener"))?;
		handles.borrow_mut().visibility = Some(visibility);
	}

	if reduced {
		// Reduced motion gets one static frame per build and no loop.
		backdrop.borrow_mut().still(&mut CanvasSurface::new(&ctx));
	} else {
		schedule(&handles);
	}
	Ok(())
}

/// Cancel the pending frame, remove listeners and release the scene.
fn stop(backdrop: Option<&RefCell<Backdrop>>, handles: &RefCell<LoopHandles>) {
	if let Some(b) = backdrop {
		b.borrow_mut().unmount();
	}
	let mut h = handles.borrow_mut();
	if let Some(window) = web_sys::window() {
		if let Some(id) = h.frame_id.take() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = h.resize.as_ref() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if let (Some(cb), Some(document)) = (h.visibility.as_ref(), window.document()) {
			let _ = document
				.remove_event_listener_with_callback("visibilitychange", cb.as_ref().unchecked_ref());
		}
	}
	*h = LoopHandles::default();
	debug!("network backdrop listeners released");
}

/// Animated network background with a static gradient placeholder.
///
/// The placeholder stays visible until the first scene is built, and for
/// good if the preset is unknown or the canvas cannot be used.
#[component]
pub fn NetworkBackdrop(
	#[prop(into)] preset: String,
	#[prop(optional)] seed: Option<u64>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] class: String,
) -> impl IntoView {
	let resolved = presets::lookup(&preset);
	if let Err(err) = &resolved {
		warn!("{err}; showing the static backdrop");
	}
	let look = resolved.as_ref().copied().unwrap_or_else(|_| presets::default_preset());
	let (glow, background): (Rgb, Rgb) = (look.glow, look.background);

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let status = RwSignal::new(if resolved.is_ok() {
		BackdropStatus::Pending
	} else {
		BackdropStatus::Fallback
	});
	let sizing = Sizing {
		fullscreen,
		width,
		height,
	};
	let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
	let backdrop: Option<Rc<RefCell<Backdrop>>> = resolved
		.ok()
		.map(|p| Rc::new(RefCell::new(Backdrop::new(p, seed))));
	let handles: Rc<RefCell<LoopHandles>> = Rc::new(RefCell::new(LoopHandles::default()));

	let (backdrop_init, handles_init) = (backdrop.clone(), handles.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(backdrop) = backdrop_init.clone() else {
			return;
		};
		if handles_init.borrow().animate.is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		if let Err(err) = start(canvas, backdrop, handles_init.clone(), status, sizing) {
			warn!("network backdrop unavailable: {err}");
			status.set(BackdropStatus::Fallback);
		}
	});

	let teardown = SendWrapper::new((backdrop, handles));
	on_cleanup(move || {
		let (backdrop, handles) = teardown.take();
		stop(backdrop.as_deref(), &handles);
	});

	let placeholder = format!(
		"position: absolute; inset: 0; pointer-events: none; transition: opacity 0.6s ease; \
		 background: radial-gradient(ellipse at 50% 40%, {} 0%, {} 70%);",
		glow.to_css(0.22),
		background.to_css(1.0)
	);
	let glow_style = format!(
		"position: absolute; inset: 0; pointer-events: none; mix-blend-mode: screen; \
		 background: radial-gradient(circle at 50% 45%, {} 0%, rgba(0, 0, 0, 0) 60%);",
		glow.to_css(0.12)
	);

	view! {
		<div
			class=format!("network-backdrop {class}")
			style="position: relative; overflow: hidden; width: 100%; height: 100%;"
		>
			<canvas
				node_ref=canvas_ref
				class="network-backdrop__canvas"
				style="display: block; position: absolute; inset: 0;"
			/>
			<div
				class="network-backdrop__placeholder"
				style=move || {
					let opacity = if status.get() == BackdropStatus::Live { 0 } else { 1 };
					format!("{placeholder} opacity: {opacity};")
				}
			/>
			<div class="network-backdrop__glow" style=glow_style />
			<div class="network-backdrop__vignette" style=VIGNETTE_STYLE />
		</div>
	}
}
