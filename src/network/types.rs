//! Plain value types shared across the pipeline.

use glam::DVec3;

/// An RGB colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
	/// Red channel.
	pub r: f64,
	/// Green channel.
	pub g: f64,
	/// Blue channel.
	pub b: f64,
}

impl Rgb {
	/// Pure white.
	pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

	/// Build a colour from channel values in `[0, 1]`.
	pub const fn new(r: f64, g: f64, b: f64) -> Self {
		Self { r, g, b }
	}

	/// Build a colour from a `0xRRGGBB` literal.
	pub const fn from_hex(hex: u32) -> Self {
		Self {
			r: ((hex >> 16) & 0xff) as f64 / 255.0,
			g: ((hex >> 8) & 0xff) as f64 / 255.0,
			b: (hex & 0xff) as f64 / 255.0,
		}
	}

	/// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
	pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
		let t = t.clamp(0.0, 1.0);
		Rgb {
			r: self.r + (other.r - self.r) * t,
			g: self.g + (other.g - self.g) * t,
			b: self.b + (other.b - self.b) * t,
		}
	}

	/// Scale every channel by `k`, saturating at 1.
	pub fn scale(self, k: f64) -> Rgb {
		Rgb {
			r: (self.r * k).clamp(0.0, 1.0),
			g: (self.g * k).clamp(0.0, 1.0),
			b: (self.b * k).clamp(0.0, 1.0),
		}
	}

	/// CSS `rgba()` string for canvas styles.
	pub fn to_css(self, alpha: f64) -> String {
		format!(
			"rgba({}, {}, {}, {:.3})",
			(self.r * 255.0).round() as u8,
			(self.g * 255.0).round() as u8,
			(self.b * 255.0).round() as u8,
			alpha.clamp(0.0, 1.0)
		)
	}
}

/// A point of the generated network.
///
/// `rest` is fixed when the node is generated. Every other visual field is
/// display state that the animator derives from the rest state each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	rest: DVec3,
	/// Animated display position.
	pub position: DVec3,
	/// Node colour.
	pub color: Rgb,
	/// Opacity the pulse oscillates around.
	pub base_opacity: f64,
	/// Animated opacity in `[0, 1]`.
	pub opacity: f64,
	/// Point radius in world units.
	pub size: f64,
	/// Phase offset that desynchronises this node's animation.
	pub phase: f64,
}

impl Node {
	/// Create a node resting at `rest`.
	pub fn new(rest: DVec3, color: Rgb, base_opacity: f64, size: f64, phase: f64) -> Self {
		let base_opacity = base_opacity.clamp(0.0, 1.0);
		Self {
			rest,
			position: rest,
			color,
			base_opacity,
			opacity: base_opacity,
			size,
			phase,
		}
	}

	/// The generator-assigned position.
	pub fn rest(&self) -> DVec3 {
		self.rest
	}
}

/// A connection between two nodes.
///
/// Endpoints are stored as an ordered pair `(a, b)` with `a < b`, so `(i, j)`
/// and `(j, i)` are the same edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	a: usize,
	b: usize,
	/// `1 - distance / threshold`, clamped to `[0, 1]`.
	pub strength: f64,
	/// Phase of the flow animation, in radians.
	pub delay: f64,
	/// Animated opacity in `[0, 1]`.
	pub opacity: f64,
	/// Position of the travelling pulse along the edge, in `[0, 1)`.
	pub flow: f64,
}

impl Edge {
	/// Create an edge between `i` and `j`. Returns `None` for a self-edge.
	pub fn new(i: usize, j: usize, strength: f64, delay: f64) -> Option<Self> {
		if i == j {
			return None;
		}
		let strength = if strength.is_finite() {
			strength.clamp(0.0, 1.0)
		} else {
			0.0
		};
		Some(Self {
			a: i.min(j),
			b: i.max(j),
			strength,
			delay,
			opacity: strength,
			flow: 0.0,
		})
	}

	/// The canonical `(low, high)` index pair.
	pub fn endpoints(&self) -> (usize, usize) {
		(self.a, self.b)
	}
}

/// Pixel size of the surface a scene is drawn on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// Create a viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Area in megapixels; zero for degenerate or non-finite sizes.
	pub fn megapixels(&self) -> f64 {
		let area = self.width * self.height / 1.0e6;
		if area.is_finite() && area > 0.0 { area } else { 0.0 }
	}

	/// Half of the shorter side, used as the projection scale.
	pub fn half_extent(&self) -> f64 {
		self.width.min(self.height).max(0.0) / 2.0
	}
}
