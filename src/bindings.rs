//! `wasm-bindgen` export for hosts that draw with a retained-mode 3D scene
//! graph instead of the 2D canvas. The host owns the render loop: it calls
//! [`NetworkField::frame`] with elapsed seconds, then uploads the typed
//! arrays and applies the global rotation and scale to its group.

use js_sys::Float32Array;
use log::debug;
use wasm_bindgen::prelude::*;

use crate::network::{GeometryBuffers, Preset, Scene, Viewport, presets};

/// One generated network driven from JavaScript.
#[wasm_bindgen]
pub struct NetworkField {
	preset: &'static Preset,
	seed: u64,
	scene: Scene,
	buffers: GeometryBuffers,
}

#[wasm_bindgen]
impl NetworkField {
	/// Build `preset` for a `width` x `height` pixel viewport.
	#[wasm_bindgen(constructor)]
	pub fn new(preset: &str, width: f64, height: f64, seed: u32) -> Result<NetworkField, JsError> {
		let preset = presets::lookup(preset)?;
		let seed = u64::from(seed);
		let scene = Scene::build(preset, Viewport::new(width, height), seed)?;
		let mut buffers = GeometryBuffers::default();
		buffers.write(&scene);
		Ok(Self {
			preset,
			seed,
			scene,
			buffers,
		})
	}

	/// Regenerate for a new viewport. The previous geometry is released
	/// before the new scene is built; on error the old scene stays.
	pub fn resize(&mut self, width: f64, height: f64) -> Result<(), JsError> {
		self.buffers.release();
		let rebuilt = Scene::build(self.preset, Viewport::new(width, height), self.seed);
		let scene = match rebuilt {
			Ok(scene) => scene,
			Err(err) => {
				self.buffers.write(&self.scene);
				return Err(err.into());
			}
		};
		self.scene = scene;
		self.buffers.write(&self.scene);
		debug!(
			"network field '{}' resized: {} nodes",
			self.preset.name,
			self.scene.nodes().len()
		);
		Ok(())
	}

	/// Animate to `t` seconds and refresh the buffers. Returns `false` when
	/// `t` was rejected and the previous frame kept.
	pub fn frame(&mut self, t: f64) -> bool {
		if !self.scene.advance(t) {
			return false;
		}
		self.buffers.write(&self.scene);
		true
	}

	/// Number of nodes in the current scene.
	#[wasm_bindgen(getter, js_name = nodeCount)]
	pub fn node_count(&self) -> usize {
		self.scene.nodes().len()
	}

	/// Number of edges in the current scene.
	#[wasm_bindgen(getter, js_name = edgeCount)]
	pub fn edge_count(&self) -> usize {
		self.scene.edges().len()
	}

	/// Node positions, three floats per node.
	#[wasm_bindgen(getter)]
	pub fn positions(&self) -> Float32Array {
		Float32Array::from(&self.buffers.positions[..])
	}

	/// Node RGB colours.
	#[wasm_bindgen(getter)]
	pub fn colors(&self) -> Float32Array {
		Float32Array::from(&self.buffers.colors[..])
	}

	/// Node sizes in world units.
	#[wasm_bindgen(getter)]
	pub fn sizes(&self) -> Float32Array {
		Float32Array::from(&self.buffers.sizes[..])
	}

	/// Node opacities.
	#[wasm_bindgen(getter)]
	pub fn opacities(&self) -> Float32Array {
		Float32Array::from(&self.buffers.opacities[..])
	}

	/// Line segment vertices, two per edge.
	#[wasm_bindgen(getter)]
	pub fn segments(&self) -> Float32Array {
		Float32Array::from(&self.buffers.segments[..])
	}

	/// RGBA per segment vertex, opacity in alpha.
	#[wasm_bindgen(getter, js_name = segmentColors)]
	pub fn segment_colors(&self) -> Float32Array {
		Float32Array::from(&self.buffers.segment_colors[..])
	}

	/// Global Euler rotation of the current frame, applied in XYZ order.
	#[wasm_bindgen(getter, js_name = rotationX)]
	pub fn rotation_x(&self) -> f64 {
		self.scene.transform.rotation.x
	}

	/// See [`NetworkField::rotation_x`].
	#[wasm_bindgen(getter, js_name = rotationY)]
	pub fn rotation_y(&self) -> f64 {
		self.scene.transform.rotation.y
	}

	/// See [`NetworkField::rotation_x`].
	#[wasm_bindgen(getter, js_name = rotationZ)]
	pub fn rotation_z(&self) -> f64 {
		self.scene.transform.rotation.z
	}

	/// Breathing scale of the current frame.
	#[wasm_bindgen(getter)]
	pub fn scale(&self) -> f64 {
		self.scene.transform.scale
	}

	/// Camera distance from the origin along +Z.
	#[wasm_bindgen(getter, js_name = cameraDistance)]
	pub fn camera_distance(&self) -> f64 {
		self.scene.camera.distance
	}
}

/// Names of every built-in preset, in table order.
#[wasm_bindgen(js_name = presetNames)]
pub fn preset_names() -> Vec<String> {
	presets::PRESETS.iter().map(|p| p.name.to_string()).collect()
}
