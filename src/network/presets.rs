//! Named visual variants. Each preset is one row of parameters for the
//! shared generate → connect → animate pipeline.

use std::f64::consts::PI;
use std::sync::LazyLock;

use glam::DVec3;

use super::animate::Motion;
use super::connect::{ConnectParams, Rule};
use super::error::{BackdropError, BackdropResult, ensure_positive};
use super::field::{CountPolicy, NodeStyle, Shape};
use super::types::Rgb;

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	/// Distance from the origin.
	pub distance: f64,
	/// Vertical field of view in radians.
	pub fov: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			distance: 10.0,
			fov: PI / 3.0,
		}
	}
}

/// Linear depth fog between `near` and `far` camera distances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
	/// Depth where fading starts.
	pub near: f64,
	/// Depth where nodes are fully faded.
	pub far: f64,
}

impl Fog {
	/// Visibility factor in `[0, 1]` at `depth`.
	pub fn visibility(&self, depth: f64) -> f64 {
		if self.far <= self.near {
			return if depth < self.far { 1.0 } else { 0.0 };
		}
		(1.0 - (depth - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
	}
}

/// One visual variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
	/// Lookup key.
	pub name: &'static str,
	/// Point pattern.
	pub shape: Shape,
	/// Node count policy.
	pub count: CountPolicy,
	/// Connection parameters.
	pub connect: ConnectParams,
	/// Node colour, opacity and size ranges.
	pub style: NodeStyle,
	/// Animation coefficients.
	pub motion: Motion,
	/// Edge colour.
	pub edge_color: Rgb,
	/// Camera.
	pub camera: Camera,
	/// Depth fog.
	pub fog: Option<Fog>,
	/// Canvas clear colour.
	pub background: Rgb,
	/// Tint of the CSS glow overlay.
	pub glow: Rgb,
}

impl Preset {
	/// Validate every parameter group.
	pub fn validate(&self) -> BackdropResult<()> {
		self.shape.validate()?;
		self.style.validate()?;
		self.motion.validate()?;
		ensure_positive("camera distance", self.camera.distance)?;
		if !(self.camera.fov > 0.0 && self.camera.fov < PI) {
			return Err(BackdropError::validation(format!(
				"camera fov must lie in (0, π), got {}",
				self.camera.fov
			)));
		}
		if let Some(fog) = self.fog {
			if !(fog.near.is_finite() && fog.far.is_finite()) {
				return Err(BackdropError::validation("fog bounds must be finite"));
			}
		}
		Ok(())
	}
}

const INK: Rgb = Rgb::from_hex(0x060b18);
const CYAN: Rgb = Rgb::from_hex(0x38bdf8);
const VIOLET: Rgb = Rgb::from_hex(0x8b5cf6);
const TEAL: Rgb = Rgb::from_hex(0x2dd4bf);
const AMBER: Rgb = Rgb::from_hex(0xfbbf24);
const ROSE: Rgb = Rgb::from_hex(0xf472b6);
const ICE: Rgb = Rgb::from_hex(0xe0f2fe);

fn gentle(rotation_speed: DVec3) -> Motion {
	Motion {
		rotation_speed,
		pulse_frequency: 1.6,
		pulse_amplitude: 0.25,
		jitter_frequency: 0.9,
		jitter_amplitude: 0.04,
		breathe_frequency: 0.5,
		breathe_amplitude: 0.03,
		flow_speed: 1.2,
		edge_base: 0.55,
		edge_flow: 0.35,
	}
}

/// The preset table. The first entry is the default.
pub static PRESETS: LazyLock<Vec<Preset>> = LazyLock::new(|| {
	vec![
		Preset {
			name: "plexus-sphere",
			shape: Shape::Sphere { radius: 3.0 },
			count: CountPolicy::Density {
				per_megapixel: 120.0,
				min: 60,
				max: 220,
			},
			connect: ConnectParams {
				max_distance: 1.1,
				max_degree: Some(6),
				rules: Vec::new(),
			},
			style: NodeStyle {
				palette: [VIOLET, CYAN],
				opacity: (0.55, 0.85),
				size: (0.035, 0.07),
				desync: true,
			},
			motion: gentle(DVec3::new(0.05, 0.12, 0.0)),
			edge_color: CYAN,
			camera: Camera {
				distance: 8.0,
				fov: 55f64.to_radians(),
			},
			fog: Some(Fog {
				near: 5.5,
				far: 11.0,
			}),
			background: INK,
			glow: CYAN,
		},
		Preset {
			name: "orbital-rings",
			shape: Shape::Rings {
				rings: 4,
				radius: 3.0,
			},
			count: CountPolicy::Fixed(128),
			connect: ConnectParams {
				max_distance: 0.9,
				max_degree: Some(4),
				rules: vec![Rule::RingAdjacency, Rule::Opposite { probability: 0.3 }],
			},
			style: NodeStyle {
				palette: [TEAL, ICE],
				opacity: (0.6, 0.9),
				size: (0.03, 0.06),
				desync: true,
			},
			motion: Motion {
				jitter_amplitude: 0.0,
				..gentle(DVec3::new(0.15, 0.2, 0.04))
			},
			edge_color: TEAL,
			camera: Camera {
				distance: 9.0,
				fov: 50f64.to_radians(),
			},
			fog: Some(Fog {
				near: 6.5,
				far: 12.0,
			}),
			background: INK,
			glow: TEAL,
		},
		Preset {
			name: "data-cube",
			shape: Shape::Cube { half_extent: 2.0 },
			count: CountPolicy::Fixed(96),
			connect: ConnectParams {
				max_distance: 0.75,
				max_degree: Some(3),
				rules: vec![Rule::GoldenOffset { probability: 0.15 }],
			},
			style: NodeStyle {
				palette: [CYAN, ICE],
				opacity: (0.5, 0.8),
				size: (0.03, 0.05),
				desync: false,
			},
			motion: Motion {
				pulse_frequency: 2.4,
				..gentle(DVec3::new(0.22, 0.3, 0.0))
			},
			edge_color: CYAN,
			camera: Camera {
				distance: 9.5,
				fov: 45f64.to_radians(),
			},
			fog: None,
			background: INK,
			glow: CYAN,
		},
		Preset {
			name: "neural-cluster",
			shape: Shape::ChaoticCluster {
				radius: 3.2,
				clusters: 5,
				bias: 0.65,
			},
			count: CountPolicy::Density {
				per_megapixel: 90.0,
				min: 50,
				max: 180,
			},
			connect: ConnectParams {
				max_distance: 1.0,
				max_degree: Some(5),
				rules: vec![Rule::NearestK { k: 2 }],
			},
			style: NodeStyle {
				palette: [ROSE, VIOLET],
				opacity: (0.45, 0.9),
				size: (0.03, 0.08),
				desync: true,
			},
			motion: Motion {
				jitter_amplitude: 0.08,
				flow_speed: 2.0,
				..gentle(DVec3::new(0.0, 0.08, 0.02))
			},
			edge_color: VIOLET,
			camera: Camera {
				distance: 9.0,
				fov: 55f64.to_radians(),
			},
			fog: Some(Fog {
				near: 6.0,
				far: 13.0,
			}),
			background: INK,
			glow: VIOLET,
		},
		Preset {
			name: "halo-layers",
			shape: Shape::CircularLayers {
				layers: 4,
				radius: 4.0,
			},
			count: CountPolicy::Fixed(120),
			connect: ConnectParams {
				max_distance: 0.8,
				max_degree: None,
				rules: vec![
					Rule::RingAdjacency,
					Rule::Offset {
						divisor: 3,
						probability: 0.7,
					},
				],
			},
			style: NodeStyle {
				palette: [AMBER, ROSE],
				opacity: (0.5, 0.8),
				size: (0.03, 0.06),
				desync: true,
			},
			motion: Motion {
				rotation_speed: DVec3::new(0.0, 0.0, 0.06),
				breathe_amplitude: 0.05,
				..gentle(DVec3::ZERO)
			},
			edge_color: AMBER,
			camera: Camera {
				distance: 10.0,
				fov: 50f64.to_radians(),
			},
			fog: None,
			background: INK,
			glow: AMBER,
		},
		Preset {
			name: "signal-ring",
			shape: Shape::CircularLayers {
				layers: 1,
				radius: 5.0,
			},
			count: CountPolicy::Fixed(24),
			connect: ConnectParams {
				max_distance: 2.3,
				max_degree: None,
				rules: vec![Rule::Offset {
					divisor: 3,
					probability: 0.7,
				}],
			},
			style: NodeStyle {
				palette: [CYAN, CYAN],
				opacity: (0.7, 0.7),
				size: (0.09, 0.09),
				desync: false,
			},
			motion: Motion {
				jitter_amplitude: 0.0,
				..gentle(DVec3::new(0.0, 0.0, 0.1))
			},
			edge_color: CYAN,
			camera: Camera {
				distance: 13.0,
				fov: 50f64.to_radians(),
			},
			fog: None,
			background: INK,
			glow: CYAN,
		},
		Preset {
			name: "constellation",
			shape: Shape::ChaoticCluster {
				radius: 4.5,
				clusters: 1,
				bias: 0.0,
			},
			count: CountPolicy::Density {
				per_megapixel: 60.0,
				min: 30,
				max: 140,
			},
			connect: ConnectParams {
				max_distance: 1.4,
				max_degree: Some(3),
				rules: Vec::new(),
			},
			style: NodeStyle {
				palette: [ICE, CYAN],
				opacity: (0.3, 0.9),
				size: (0.02, 0.05),
				desync: true,
			},
			motion: Motion {
				pulse_frequency: 0.9,
				pulse_amplitude: 0.35,
				..gentle(DVec3::new(0.0, 0.03, 0.0))
			},
			edge_color: ICE,
			camera: Camera {
				distance: 11.0,
				fov: 60f64.to_radians(),
			},
			fog: Some(Fog {
				near: 7.0,
				far: 16.0,
			}),
			background: INK,
			glow: ICE,
		},
	]
});

/// Find a preset by name.
pub fn find(name: &str) -> Option<&'static Preset> {
	PRESETS.iter().find(|p| p.name == name)
}

/// Find a preset by name or fail with [`BackdropError::UnknownPreset`].
pub fn lookup(name: &str) -> BackdropResult<&'static Preset> {
	find(name).ok_or_else(|| BackdropError::UnknownPreset(name.to_string()))
}

/// The first preset in the table.
pub fn default_preset() -> &'static Preset {
	&PRESETS[0]
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	#[test]
	fn presets_are_valid_and_unique() {
		let mut names = HashSet::new();
		for p in PRESETS.iter() {
			p.validate().unwrap();
			assert!(names.insert(p.name), "duplicate preset {}", p.name);
		}
	}

	#[test]
	fn lookup_reports_unknown_names() {
		assert_eq!(lookup("data-cube").unwrap().name, "data-cube");
		assert_eq!(
			lookup("vaporwave"),
			Err(BackdropError::UnknownPreset("vaporwave".into()))
		);
		assert_eq!(default_preset().name, "plexus-sphere");
	}

	#[test]
	fn fog_fades_linearly() {
		let fog = Fog {
			near: 2.0,
			far: 6.0,
		};
		assert_eq!(fog.visibility(1.0), 1.0);
		assert_eq!(fog.visibility(4.0), 0.5);
		assert_eq!(fog.visibility(9.0), 0.0);
	}

	#[test]
	fn bad_camera_is_rejected() {
		let mut p = default_preset().clone();
		p.camera.fov = 0.0;
		assert!(p.validate().is_err());
		p.camera = Camera {
			distance: f64::NAN,
			fov: 1.0,
		};
		assert!(p.validate().is_err());
	}
}
