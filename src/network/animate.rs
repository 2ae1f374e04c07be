//! Per-frame animation. Everything here is total: bad input skips work
//! instead of failing, because it runs inside the host's frame callback.

use std::f64::consts::TAU;

use glam::DVec3;

use super::error::{BackdropResult, ensure_finite};
use super::types::{Edge, Node};

/// Animation coefficients of one visual variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
	/// Rotation speed about each axis, in radians per second.
	pub rotation_speed: DVec3,
	/// Angular frequency of the opacity pulse.
	pub pulse_frequency: f64,
	/// Amplitude of the opacity pulse.
	pub pulse_amplitude: f64,
	/// Angular frequency of the position jitter.
	pub jitter_frequency: f64,
	/// Amplitude of the position jitter, in world units.
	pub jitter_amplitude: f64,
	/// Angular frequency of the breathing scale.
	pub breathe_frequency: f64,
	/// Amplitude of the breathing scale.
	pub breathe_amplitude: f64,
	/// Angular speed of the flow along edges.
	pub flow_speed: f64,
	/// Edge opacity before flow modulation, as a fraction of strength.
	pub edge_base: f64,
	/// Flow modulation depth of edge opacity.
	pub edge_flow: f64,
}

impl Motion {
	/// No movement at all; the frame equals the rest state.
	pub const STILL: Motion = Motion {
		rotation_speed: DVec3::ZERO,
		pulse_frequency: 0.0,
		pulse_amplitude: 0.0,
		jitter_frequency: 0.0,
		jitter_amplitude: 0.0,
		breathe_frequency: 0.0,
		breathe_amplitude: 0.0,
		flow_speed: 0.0,
		edge_base: 1.0,
		edge_flow: 0.0,
	};

	/// Reject non-finite coefficients.
	pub fn validate(&self) -> BackdropResult<()> {
		ensure_finite("rotation speed x", self.rotation_speed.x)?;
		ensure_finite("rotation speed y", self.rotation_speed.y)?;
		ensure_finite("rotation speed z", self.rotation_speed.z)?;
		for (name, v) in [
			("pulse frequency", self.pulse_frequency),
			("pulse amplitude", self.pulse_amplitude),
			("jitter frequency", self.jitter_frequency),
			("jitter amplitude", self.jitter_amplitude),
			("breathe frequency", self.breathe_frequency),
			("breathe amplitude", self.breathe_amplitude),
			("flow speed", self.flow_speed),
			("edge base", self.edge_base),
			("edge flow", self.edge_flow),
		] {
			ensure_finite(name, v)?;
		}
		Ok(())
	}
}

/// Scene-level transform for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Rotation angle about each axis, in radians. Unbounded.
	pub rotation: DVec3,
	/// Breathing scale factor.
	pub scale: f64,
}

impl Default for Transform {
	fn default() -> Self {
		Self {
			rotation: DVec3::ZERO,
			scale: 1.0,
		}
	}
}

/// Global rotation and breathing at time `t`.
pub fn transform_at(motion: &Motion, t: f64) -> Transform {
	Transform {
		rotation: motion.rotation_speed * t,
		scale: 1.0 + motion.breathe_amplitude * (motion.breathe_frequency * t).sin(),
	}
}

/// Opacity pulse and jitter for every node, derived from the rest state.
pub fn animate_nodes(nodes: &mut [Node], motion: &Motion, t: f64) {
	let w = motion.jitter_frequency * t;
	for node in nodes {
		let pulse = (motion.pulse_frequency * t + node.phase).sin();
		let opacity = node.base_opacity + motion.pulse_amplitude * pulse;
		let jitter = DVec3::new(
			(w + node.phase).sin(),
			(1.3 * w + node.phase).sin(),
			(0.7 * w + node.phase).sin(),
		) * motion.jitter_amplitude;
		let position = node.rest() + jitter;

		if opacity.is_finite() && position.is_finite() {
			node.opacity = opacity.clamp(0.0, 1.0);
			node.position = position;
		}
	}
}

/// Flow pulse position and opacity for every edge.
pub fn animate_edges(edges: &mut [Edge], motion: &Motion, t: f64) {
	let st = motion.flow_speed * t;
	let envelope = (0.5 * st).cos();
	for edge in edges {
		let wave = (st + edge.delay).sin() * envelope;
		let opacity = edge.strength * (motion.edge_base + motion.edge_flow * wave);
		// rem_euclid can round up to exactly 1.0 for tiny negative inputs.
		let flow = match ((st + edge.delay) / TAU).rem_euclid(1.0) {
			f if f >= 1.0 => 0.0,
			f => f,
		};

		if opacity.is_finite() && flow.is_finite() {
			edge.opacity = opacity.clamp(0.0, 1.0);
			edge.flow = flow;
		}
	}
}

/// Animate one frame. Returns `None`, touching nothing, when `t` is not finite.
pub fn step(nodes: &mut [Node], edges: &mut [Edge], motion: &Motion, t: f64) -> Option<Transform> {
	if !t.is_finite() {
		return None;
	}
	let transform = transform_at(motion, t);
	if !(transform.rotation.is_finite() && transform.scale.is_finite()) {
		return None;
	}
	animate_nodes(nodes, motion, t);
	animate_edges(edges, motion, t);
	Some(transform)
}

/// Turns host frame timestamps into elapsed animation seconds.
///
/// Steps are clamped so a long gap (hidden tab, debugger) advances the
/// animation by at most `max_step`. Paused time does not count.
#[derive(Clone, Debug)]
pub struct FrameClock {
	last_ms: Option<f64>,
	elapsed: f64,
	paused: bool,
	max_step: f64,
}

impl Default for FrameClock {
	fn default() -> Self {
		Self::new(0.1)
	}
}

impl FrameClock {
	/// A clock at zero that advances at most `max_step` seconds per tick.
	pub fn new(max_step: f64) -> Self {
		Self {
			last_ms: None,
			elapsed: 0.0,
			paused: false,
			max_step: if max_step.is_finite() { max_step.max(0.0) } else { 0.1 },
		}
	}

	/// Feed a timestamp in milliseconds and get the elapsed seconds.
	pub fn tick(&mut self, now_ms: f64) -> f64 {
		if !now_ms.is_finite() {
			return self.elapsed;
		}
		if let (Some(last), false) = (self.last_ms, self.paused) {
			self.elapsed += ((now_ms - last) / 1000.0).clamp(0.0, self.max_step);
		}
		self.last_ms = Some(now_ms);
		self.elapsed
	}

	/// Freeze elapsed time.
	pub fn pause(&mut self) {
		self.paused = true;
	}

	/// Unfreeze; the next tick only re-anchors the timestamp.
	pub fn resume(&mut self) {
		self.paused = false;
		self.last_ms = None;
	}

	/// Whether the clock is paused.
	pub fn is_paused(&self) -> bool {
		self.paused
	}

	/// Elapsed seconds so far.
	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::PI;

	use approx::assert_relative_eq;

	use super::*;
	use crate::network::types::Rgb;

	fn motion() -> Motion {
		Motion {
			rotation_speed: DVec3::new(0.0, 0.3, 0.05),
			pulse_frequency: 2.0,
			pulse_amplitude: 0.3,
			jitter_frequency: 1.1,
			jitter_amplitude: 0.2,
			breathe_frequency: 0.8,
			breathe_amplitude: 0.05,
			flow_speed: 1.5,
			edge_base: 0.6,
			edge_flow: 0.4,
		}
	}

	fn nodes(n: usize, base: f64, phase: f64) -> Vec<Node> {
		(0..n)
			.map(|i| Node::new(DVec3::splat(i as f64), Rgb::WHITE, base, 1.0, phase * i as f64))
			.collect()
	}

	#[test]
	fn zero_time_leaves_rest_state() {
		let mut ns = nodes(5, 0.5, 0.0);
		let mut es = vec![Edge::new(0, 1, 0.8, 0.0).unwrap()];
		let tf = step(&mut ns, &mut es, &motion(), 0.0).unwrap();
		for n in &ns {
			assert_eq!(n.opacity, 0.5);
			assert_eq!(n.position, n.rest());
		}
		assert_eq!(tf, Transform::default());
	}

	#[test]
	fn pulse_peaks_at_quarter_period() {
		let m = motion();
		let mut ns = nodes(1, 0.5, 0.0);
		animate_nodes(&mut ns, &m, PI / (2.0 * m.pulse_frequency));
		assert_relative_eq!(ns[0].opacity, 0.5 + m.pulse_amplitude, epsilon = 1e-12);
	}

	#[test]
	fn opacity_stays_in_range() {
		let mut m = motion();
		m.pulse_amplitude = 3.0;
		m.edge_flow = 5.0;
		let mut ns = nodes(20, 0.9, 0.37);
		let mut es: Vec<Edge> = (1..20).filter_map(|j| Edge::new(0, j, 1.0, j as f64)).collect();
		for k in 0..200 {
			let t = k as f64 * 0.173;
			assert!(step(&mut ns, &mut es, &m, t).is_some());
			assert!(ns.iter().all(|n| (0.0..=1.0).contains(&n.opacity)));
			assert!(es.iter().all(|e| (0.0..=1.0).contains(&e.opacity)));
			assert!(es.iter().all(|e| (0.0..1.0).contains(&e.flow)));
		}
	}

	#[test]
	fn jitter_never_drifts_from_rest() {
		let m = motion();
		let mut ns = nodes(3, 0.5, 1.0);
		for k in 0..10_000 {
			animate_nodes(&mut ns, &m, k as f64 * 0.016);
		}
		let t = 12.34;
		animate_nodes(&mut ns, &m, t);
		let mut fresh = nodes(3, 0.5, 1.0);
		animate_nodes(&mut fresh, &m, t);
		assert_eq!(ns, fresh);
		for n in &ns {
			assert!(n.position.distance(n.rest()) <= m.jitter_amplitude * 3f64.sqrt() + 1e-12);
		}
	}

	#[test]
	fn non_finite_time_keeps_previous_frame() {
		let m = motion();
		let mut ns = nodes(4, 0.5, 0.5);
		let mut es = vec![Edge::new(1, 2, 0.5, 1.0).unwrap()];
		step(&mut ns, &mut es, &m, 1.7).unwrap();
		let (before_n, before_e) = (ns.clone(), es.clone());
		for t in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
			assert!(step(&mut ns, &mut es, &m, t).is_none());
		}
		assert_eq!(ns, before_n);
		assert_eq!(es, before_e);
	}

	#[test]
	fn rotation_grows_linearly() {
		let m = motion();
		let tf = transform_at(&m, 100.0);
		assert_relative_eq!(tf.rotation.y, 30.0, epsilon = 1e-12);
		assert!((1.0 - m.breathe_amplitude..=1.0 + m.breathe_amplitude).contains(&tf.scale));
	}

	#[test]
	fn still_motion_validates() {
		assert!(Motion::STILL.validate().is_ok());
		let mut m = motion();
		m.flow_speed = f64::NAN;
		assert!(m.validate().is_err());
	}

	#[test]
	fn clock_clamps_and_pauses() {
		let mut clock = FrameClock::new(0.1);
		assert_eq!(clock.tick(1000.0), 0.0);
		assert_relative_eq!(clock.tick(1016.0), 0.016, epsilon = 1e-12);
		// A five-second gap only advances by the clamp.
		assert_relative_eq!(clock.tick(6016.0), 0.116, epsilon = 1e-12);
		// Backwards and non-finite timestamps never rewind.
		assert_relative_eq!(clock.tick(5000.0), 0.116, epsilon = 1e-12);
		assert_relative_eq!(clock.tick(f64::NAN), 0.116, epsilon = 1e-12);

		clock.pause();
		clock.tick(5500.0);
		assert_relative_eq!(clock.elapsed(), 0.116, epsilon = 1e-12);
		clock.resume();
		clock.tick(9000.0);
		assert_relative_eq!(clock.tick(9050.0), 0.166, epsilon = 1e-12);
	}
}
