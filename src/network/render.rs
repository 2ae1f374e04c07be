//! Projection of a [`Scene`] onto a 2D drawing surface.

use glam::{DQuat, DVec2, EulerRot};

use super::scene::Scene;
use super::types::{Rgb, Viewport};

/// Minimum depth in front of the camera; anything closer is culled.
const NEAR_CLIP: f64 = 0.1;
/// Alpha below which nothing is drawn.
const MIN_ALPHA: f64 = 0.003;

/// Immediate-mode drawing surface the renderer draws through.
pub trait Surface {
	/// Fill the whole viewport with `background`.
	fn clear(&mut self, viewport: Viewport, background: Rgb);
	/// Stroke a line segment.
	fn line(&mut self, from: DVec2, to: DVec2, color: Rgb, opacity: f64, width: f64);
	/// Fill a disc of `radius` pixels.
	fn point(&mut self, at: DVec2, radius: f64, color: Rgb, opacity: f64);
}

/// A node after rotation, breathing and perspective.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Pixel position.
	pub screen: DVec2,
	/// Distance in front of the camera.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub pixel_scale: f64,
	/// How much the node faces the camera, in `[0, 1]`.
	pub facing: f64,
}

/// Project every node; `None` for nodes behind the near clip.
pub fn project(scene: &Scene, viewport: Viewport) -> Vec<Option<Projected>> {
	let r = scene.transform.rotation;
	let rotation = DQuat::from_euler(EulerRot::XYZ, r.x, r.y, r.z);
	let focal = viewport.half_extent() / (scene.camera.fov / 2.0).tan();
	let centre = DVec2::new(viewport.width / 2.0, viewport.height / 2.0);

	scene
		.nodes()
		.iter()
		.map(|node| {
			let p = rotation * node.position * scene.transform.scale;
			let depth = scene.camera.distance - p.z;
			if depth.is_nan() || depth <= NEAR_CLIP || !p.is_finite() {
				return None;
			}
			let pixel_scale = focal / depth;
			Some(Projected {
				screen: centre + DVec2::new(p.x, -p.y) * pixel_scale,
				depth,
				pixel_scale,
				facing: p.normalize_or_zero().z * 0.5 + 0.5,
			})
		})
		.collect()
}

fn fog_at(scene: &Scene, depth: f64) -> f64 {
	scene.fog.map_or(1.0, |fog| fog.visibility(depth))
}

/// Draw one frame: background, edges with their flow pulses, then nodes
/// from back to front.
pub fn render<S: Surface + ?Sized>(scene: &Scene, viewport: Viewport, surface: &mut S) {
	surface.clear(viewport, scene.background);
	let projected = project(scene, viewport);
	let nodes = scene.nodes();
	let pulses = scene.motion().flow_speed != 0.0;

	for edge in scene.edges() {
		let (a, b) = edge.endpoints();
		let (Some(pa), Some(pb)) = (projected[a], projected[b]) else {
			continue;
		};
		let fog = fog_at(scene, pa.depth).min(fog_at(scene, pb.depth));
		let alpha = edge.opacity * fog;
		if alpha < MIN_ALPHA {
			continue;
		}
		let color = nodes[a].color.lerp(nodes[b].color, 0.5).lerp(scene.edge_color, 0.6);
		surface.line(pa.screen, pb.screen, color, alpha, 0.6 + 0.8 * edge.strength);
		if pulses {
			let at = pa.screen.lerp(pb.screen, edge.flow);
			surface.point(at, 1.4, scene.edge_color, (alpha * 1.5).min(1.0));
		}
	}

	let mut order: Vec<usize> = (0..nodes.len()).filter(|&i| projected[i].is_some()).collect();
	let depth = |i: usize| projected[i].map_or(0.0, |p| p.depth);
	order.sort_by(|&i, &j| depth(j).total_cmp(&depth(i)));
	for i in order {
		let Some(p) = projected[i] else {
			continue;
		};
		let node = &nodes[i];
		let alpha = node.opacity * fog_at(scene, p.depth);
		if alpha < MIN_ALPHA {
			continue;
		}
		let lit = node.color.scale(0.7 + 0.5 * p.facing);
		surface.point(p.screen, (node.size * p.pixel_scale).max(0.5), lit, alpha);
	}
}
