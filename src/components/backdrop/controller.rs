use log::{debug, warn};

use crate::network::{
	BackdropResult, FrameClock, Preset, Scene, Surface, Viewport, render,
};

/// What the backdrop currently shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackdropStatus {
	/// Not built yet; the static placeholder is visible.
	Pending,
	/// Animating.
	Live,
	/// Building failed; the static gradient stays visible.
	Fallback,
	/// Torn down. Nothing runs any more.
	Unmounted,
}

enum Phase {
	Pending,
	Live(Scene),
	Fallback,
	Unmounted,
}

/// Lifecycle of one mounted backdrop, independent of the browser.
///
/// The component drives it from its resize listener and frame callback.
/// After [`Backdrop::unmount`] every call is a no-op, so a callback that
/// fires late cannot touch released state.
pub struct Backdrop {
	preset: &'static Preset,
	seed: u64,
	viewport: Viewport,
	clock: FrameClock,
	phase: Phase,
}

impl Backdrop {
	pub fn new(preset: &'static Preset, seed: u64) -> Self {
		Self {
			preset,
			seed,
			viewport: Viewport::new(0.0, 0.0),
			clock: FrameClock::default(),
			phase: Phase::Pending,
		}
	}

	pub fn status(&self) -> BackdropStatus {
		match self.phase {
			Phase::Pending => BackdropStatus::Pending,
			Phase::Live(_) => BackdropStatus::Live,
			Phase::Fallback => BackdropStatus::Fallback,
			Phase::Unmounted => BackdropStatus::Unmounted,
		}
	}

	pub fn scene(&self) -> Option<&Scene> {
		match &self.phase {
			Phase::Live(scene) => Some(scene),
			_ => None,
		}
	}

	/// Build the first scene for `viewport`.
	pub fn mount(&mut self, viewport: Viewport) -> BackdropResult<()> {
		self.rebuild(viewport)
	}

	/// Regenerate for a new viewport. The old scene is released first.
	pub fn resize(&mut self, viewport: Viewport) -> BackdropResult<()> {
		debug!("resize to {}x{}", viewport.width, viewport.height);
		self.rebuild(viewport)
	}

	fn rebuild(&mut self, viewport: Viewport) -> BackdropResult<()> {
		if matches!(self.phase, Phase::Unmounted) {
			return Ok(());
		}
		self.phase = Phase::Pending;
		self.viewport = viewport;
		match Scene::build(self.preset, viewport, self.seed) {
			Ok(scene) => {
				self.phase = Phase::Live(scene);
				Ok(())
			}
			Err(err) => {
				warn!("backdrop '{}' fell back to static: {err}", self.preset.name);
				self.phase = Phase::Fallback;
				Err(err)
			}
		}
	}

	/// Advance to host timestamp `now_ms` and draw. Returns `false` when not
	/// live, which tells the caller to stop scheduling frames.
	pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> bool {
		let Phase::Live(scene) = &mut self.phase else {
			return false;
		};
		let t = self.clock.tick(now_ms);
		scene.advance(t);
		render(scene, self.viewport, surface);
		true
	}

	/// Draw the rest frame without advancing time, for reduced motion.
	pub fn still<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
		let Phase::Live(scene) = &mut self.phase else {
			return false;
		};
		scene.advance(0.0);
		render(scene, self.viewport, surface);
		true
	}

	pub fn pause(&mut self) {
		self.clock.pause();
	}

	pub fn resume(&mut self) {
		self.clock.resume();
	}

	/// Release the scene. Later calls do nothing.
	pub fn unmount(&mut self) {
		if !matches!(self.phase, Phase::Unmounted) {
			debug!("backdrop '{}' unmounted", self.preset.name);
		}
		self.phase = Phase::Unmounted;
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec2;

	use super::*;
	use crate::network::presets::{self, PRESETS};
	use crate::network::{BackdropError, Rgb, Transform};

	#[derive(Default)]
	struct Counter {
		clears: usize,
		draws: usize,
	}

	impl Surface for Counter {
		fn clear(&mut self, _viewport: Viewport, _background: Rgb) {
			self.clears += 1;
		}

		fn line(&mut self, _from: DVec2, _to: DVec2, _color: Rgb, _opacity: f64, _width: f64) {
			self.draws += 1;
		}

		fn point(&mut self, _at: DVec2, _radius: f64, _color: Rgb, _opacity: f64) {
			self.draws += 1;
		}
	}

	fn sphere() -> Backdrop {
		Backdrop::new(presets::lookup("plexus-sphere").unwrap(), 7)
	}

	#[test]
	fn pending_until_mounted() {
		let mut b = sphere();
		let mut s = Counter::default();
		assert_eq!(b.status(), BackdropStatus::Pending);
		assert!(!b.frame(0.0, &mut s));
		assert_eq!(s.clears, 0);
		b.mount(Viewport::new(1280.0, 720.0)).unwrap();
		assert_eq!(b.status(), BackdropStatus::Live);
		assert!(b.frame(16.0, &mut s));
		assert_eq!(s.clears, 1);
	}

	#[test]
	fn no_frames_after_unmount() {
		let mut b = sphere();
		b.mount(Viewport::new(1280.0, 720.0)).unwrap();
		let mut s = Counter::default();
		assert!(b.frame(0.0, &mut s));
		b.unmount();
		let before = (s.clears, s.draws);
		assert!(!b.frame(16.0, &mut s));
		assert!(!b.still(&mut s));
		assert_eq!((s.clears, s.draws), before);
		// A late resize must not resurrect the scene.
		b.resize(Viewport::new(640.0, 480.0)).unwrap();
		assert_eq!(b.status(), BackdropStatus::Unmounted);
		assert!(b.scene().is_none());
	}

	#[test]
	fn resize_regenerates_for_new_area() {
		let mut b = sphere();
		b.mount(Viewport::new(400.0, 300.0)).unwrap();
		let small = b.scene().unwrap().nodes().len();
		b.resize(Viewport::new(1920.0, 1080.0)).unwrap();
		let large = b.scene().unwrap().nodes().len();
		assert!(large > small);
		b.resize(Viewport::new(400.0, 300.0)).unwrap();
		assert_eq!(b.scene().unwrap().nodes().len(), small);
	}

	#[test]
	fn failed_build_falls_back() {
		let mut broken = PRESETS[0].clone();
		broken.camera.distance = -1.0;
		let preset: &'static Preset = Box::leak(Box::new(broken));
		let mut b = Backdrop::new(preset, 1);
		assert!(matches!(
			b.mount(Viewport::new(800.0, 600.0)),
			Err(BackdropError::Validation(_))
		));
		assert_eq!(b.status(), BackdropStatus::Fallback);
		assert!(!b.frame(0.0, &mut Counter::default()));
	}

	#[test]
	fn still_frame_is_the_rest_state() {
		let mut b = sphere();
		b.mount(Viewport::new(800.0, 600.0)).unwrap();
		b.frame(0.0, &mut Counter::default());
		b.frame(500.0, &mut Counter::default());
		assert!(b.still(&mut Counter::default()));
		let scene = b.scene().unwrap();
		assert_eq!(scene.elapsed(), 0.0);
		assert_eq!(scene.transform, Transform::default());
	}
}
