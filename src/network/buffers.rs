//! Flat geometry export for scene-graph hosts.

use super::scene::Scene;

/// Flat `f32` geometry for a retained-mode scene-graph host.
///
/// Nodes use three floats per position, three per colour and one each for
/// size and opacity. Segments use two vertices per edge: six floats of
/// position and eight of RGBA colour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryBuffers {
	/// Node display positions.
	pub positions: Vec<f32>,
	/// Node colours.
	pub colors: Vec<f32>,
	/// Node sizes.
	pub sizes: Vec<f32>,
	/// Node opacities.
	pub opacities: Vec<f32>,
	/// Edge endpoint positions.
	pub segments: Vec<f32>,
	/// Edge endpoint colours with opacity in alpha.
	pub segment_colors: Vec<f32>,
}

impl GeometryBuffers {
	/// Rewrite every buffer from `scene`, reusing existing capacity.
	pub fn write(&mut self, scene: &Scene) {
		let nodes = scene.nodes();
		let edges = scene.edges();
		self.positions.clear();
		self.colors.clear();
		self.sizes.clear();
		self.opacities.clear();
		self.segments.clear();
		self.segment_colors.clear();

		for node in nodes {
			let p = node.position;
			self.positions.extend([p.x as f32, p.y as f32, p.z as f32]);
			let c = node.color;
			self.colors.extend([c.r as f32, c.g as f32, c.b as f32]);
			self.sizes.push(node.size as f32);
			self.opacities.push(node.opacity as f32);
		}

		let color = scene.edge_color;
		for edge in edges {
			let (a, b) = edge.endpoints();
			for idx in [a, b] {
				let p = nodes[idx].position;
				self.segments.extend([p.x as f32, p.y as f32, p.z as f32]);
				self.segment_colors.extend([
					color.r as f32,
					color.g as f32,
					color.b as f32,
					edge.opacity as f32,
				]);
			}
		}
	}

	/// Drop every allocation.
	pub fn release(&mut self) {
		*self = Self::default();
	}

	/// Total allocated capacity in floats.
	pub fn capacity(&self) -> usize {
		self.positions.capacity()
			+ self.colors.capacity()
			+ self.sizes.capacity()
			+ self.opacities.capacity()
			+ self.segments.capacity()
			+ self.segment_colors.capacity()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::presets;
	use crate::network::types::Viewport;

	#[test]
	fn layout_matches_scene() {
		let preset = presets::lookup("data-cube").unwrap();
		let mut scene = Scene::build(preset, Viewport::new(800.0, 600.0), 5).unwrap();
		scene.advance(1.0);
		let mut buffers = GeometryBuffers::default();
		buffers.write(&scene);

		let (n, e) = (scene.nodes().len(), scene.edges().len());
		assert_eq!(buffers.positions.len(), n * 3);
		assert_eq!(buffers.colors.len(), n * 3);
		assert_eq!(buffers.sizes.len(), n);
		assert_eq!(buffers.opacities.len(), n);
		assert_eq!(buffers.segments.len(), e * 6);
		assert_eq!(buffers.segment_colors.len(), e * 8);
		assert_eq!(buffers.positions[0], scene.nodes()[0].position.x as f32);
	}

	#[test]
	fn rewrite_does_not_grow_and_release_frees() {
		let preset = presets::lookup("signal-ring").unwrap();
		let mut scene = Scene::build(preset, Viewport::new(800.0, 600.0), 5).unwrap();
		let mut buffers = GeometryBuffers::default();
		buffers.write(&scene);
		let capacity = buffers.capacity();
		for k in 1..50 {
			scene.advance(k as f64 * 0.016);
			buffers.write(&scene);
		}
		assert_eq!(buffers.capacity(), capacity);
		buffers.release();
		assert_eq!(buffers.capacity(), 0);
	}
}
