//! A built, animatable network and its lifecycle within one viewport.

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::animate::{self, Motion, Transform};
use super::connect;
use super::error::{BackdropError, BackdropResult};
use super::field;
use super::presets::{Camera, Fog, Preset};
use super::types::{Edge, Node, Rgb, Viewport};

/// Everything one mounted backdrop draws: nodes, edges and the global
/// transform. Node and edge counts are fixed once built.
#[derive(Clone, Debug)]
pub struct Scene {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
	motion: Motion,
	/// Global rotation and breathing of the current frame.
	pub transform: Transform,
	/// Perspective camera.
	pub camera: Camera,
	/// Depth fog, if any.
	pub fog: Option<Fog>,
	/// Edge colour.
	pub edge_color: Rgb,
	/// Clear colour.
	pub background: Rgb,
	elapsed: f64,
}

impl Scene {
	/// Run generate → seed → connect for `preset` at `viewport`.
	///
	/// The same preset, viewport and seed always give the same scene.
	pub fn build(preset: &Preset, viewport: Viewport, seed: u64) -> BackdropResult<Self> {
		preset.validate()?;
		let count = preset.count.resolve(viewport)?;
		let mut rng = SmallRng::seed_from_u64(seed);

		let field = field::generate(count, &preset.shape, &mut rng)?;
		let nodes = field::seed_nodes(&field, &preset.style, &mut rng);
		let edges = connect::build(&field.points, &field.loops, &preset.connect, &mut rng);
		info!(
			"built '{}' scene: {} nodes, {} edges ({}x{})",
			preset.name,
			nodes.len(),
			edges.len(),
			viewport.width,
			viewport.height
		);

		Ok(Self {
			nodes,
			edges,
			motion: preset.motion.clone(),
			transform: Transform::default(),
			camera: preset.camera,
			fog: preset.fog,
			edge_color: preset.edge_color,
			background: preset.background,
			elapsed: 0.0,
		})
	}

	/// Assemble a scene from hand-made parts, checking edge endpoints.
	pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, motion: Motion) -> BackdropResult<Self> {
		motion.validate()?;
		let scene = Self {
			nodes,
			edges,
			motion,
			transform: Transform::default(),
			camera: Camera::default(),
			fog: None,
			edge_color: Rgb::WHITE,
			background: Rgb::new(0.0, 0.0, 0.0),
			elapsed: 0.0,
		};
		if scene.check() {
			Ok(scene)
		} else {
			Err(BackdropError::validation("edge endpoint outside the node list"))
		}
	}

	/// Every edge endpoint indexes the node list.
	pub fn check(&self) -> bool {
		let n = self.nodes.len();
		self.edges.iter().all(|e| {
			let (a, b) = e.endpoints();
			a < b && b < n
		})
	}

	/// Animate to elapsed time `t`. Returns `false` and keeps the previous
	/// frame when `t` is not finite.
	pub fn advance(&mut self, t: f64) -> bool {
		match animate::step(&mut self.nodes, &mut self.edges, &self.motion, t) {
			Some(transform) => {
				self.transform = transform;
				self.elapsed = t;
				true
			}
			None => {
				warn!("skipped frame with non-finite time {t}");
				false
			}
		}
	}

	/// Nodes in generation order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in construction order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Animation coefficients.
	pub fn motion(&self) -> &Motion {
		&self.motion
	}

	/// Time of the last animated frame.
	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}
}
