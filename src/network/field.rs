//! Node-field generation: point sets in a handful of spatial patterns.
//!
//! All generators are O(N) except the chaotic cluster, whose rejection
//! sampling is O(N) in expectation. Randomness only enters through the
//! caller's [`Rng`], so a seeded generator gives reproducible fields.

use std::f64::consts::{PI, TAU};
use std::ops::Range;

use glam::{DQuat, DVec3};
use rand::Rng;

use super::error::{BackdropError, BackdropResult, ensure_positive};
use super::types::{Node, Rgb, Viewport};

/// `π·(3 − √5)`, the angle between successive points of a golden spiral.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Spatial pattern of a node field.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
	/// Near-uniform sphere surface via the Fibonacci spiral.
	Sphere {
		/// Sphere radius.
		radius: f64,
	},
	/// Concentric great circles, each tilted differently.
	Rings {
		/// Number of rings.
		rings: usize,
		/// Ring radius.
		radius: f64,
	},
	/// Points spaced evenly along the twelve edges of a cube.
	Cube {
		/// Half of the cube's side length.
		half_extent: f64,
	},
	/// Random ball with nodes biased towards a few cluster centres.
	ChaoticCluster {
		/// Ball radius.
		radius: f64,
		/// Number of cluster centres.
		clusters: usize,
		/// Probability in `[0, 1]` that a node joins a cluster.
		bias: f64,
	},
	/// Planar concentric circles with outer layers holding more nodes.
	CircularLayers {
		/// Number of layers; one layer is a single ring.
		layers: usize,
		/// Radius of the outermost layer.
		radius: f64,
	},
}

impl Shape {
	/// Reject non-finite or non-positive extents and ring, layer or cluster
	/// counts outside `1..=MAX_PARTS`.
	pub fn validate(&self) -> BackdropResult<()> {
		match *self {
			Shape::Sphere { radius } => ensure_positive("sphere radius", radius),
			Shape::Rings { rings, radius } => {
				ensure_count("ring count", rings)?;
				ensure_positive("ring radius", radius)
			}
			Shape::Cube { half_extent } => ensure_positive("cube half extent", half_extent),
			Shape::ChaoticCluster {
				radius,
				clusters,
				bias,
			} => {
				ensure_count("cluster count", clusters)?;
				ensure_positive("cluster radius", radius)?;
				if bias.is_finite() && (0.0..=1.0).contains(&bias) {
					Ok(())
				} else {
					Err(BackdropError::validation(format!(
						"cluster bias must lie in [0, 1], got {bias}"
					)))
				}
			}
			Shape::CircularLayers { layers, radius } => {
				ensure_count("layer count", layers)?;
				ensure_positive("layer radius", radius)
			}
		}
	}

	/// Where a lone node goes. The sphere keeps it on its surface.
	fn anchor(&self) -> DVec3 {
		match *self {
			Shape::Sphere { radius } => DVec3::new(0.0, radius, 0.0),
			_ => DVec3::ZERO,
		}
	}
}

/// Upper bound on rings, layers and cluster centres.
pub const MAX_PARTS: usize = 1024;

fn ensure_count(name: &str, n: usize) -> BackdropResult<()> {
	if (1..=MAX_PARTS).contains(&n) {
		Ok(())
	} else {
		Err(BackdropError::validation(format!(
			"{name} must lie in 1..={MAX_PARTS}, got {n}"
		)))
	}
}

/// Generated points plus the closed loops ring-like shapes produce.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeField {
	/// Rest positions, one per node.
	pub points: Vec<DVec3>,
	/// Index ranges of `points` that form closed rings, in ring order.
	pub loops: Vec<Range<usize>>,
}

/// Convert a computed node count into `usize`, rejecting negative and
/// non-finite values. Fractions are truncated.
pub fn checked_count(n: f64) -> BackdropResult<usize> {
	if !n.is_finite() {
		return Err(BackdropError::validation(format!(
			"node count must be finite, got {n}"
		)));
	}
	if n < 0.0 {
		return Err(BackdropError::validation(format!(
			"node count must not be negative, got {n}"
		)));
	}
	Ok(n.floor() as usize)
}

/// How many nodes a scene gets for a given viewport.
#[derive(Clone, Debug, PartialEq)]
pub enum CountPolicy {
	/// Always the same number of nodes.
	Fixed(usize),
	/// Scale with viewport area, clamped to `[min, max]`.
	Density {
		/// Nodes per megapixel of viewport.
		per_megapixel: f64,
		/// Lower bound.
		min: usize,
		/// Upper bound.
		max: usize,
	},
}

impl CountPolicy {
	/// Resolve the node count for `viewport`.
	pub fn resolve(&self, viewport: Viewport) -> BackdropResult<usize> {
		match *self {
			CountPolicy::Fixed(n) => Ok(n),
			CountPolicy::Density {
				per_megapixel,
				min,
				max,
			} => {
				let n = checked_count(per_megapixel * viewport.megapixels())?;
				Ok(n.clamp(min, max.max(min)))
			}
		}
	}
}

/// Generate `count` points in `shape`.
///
/// `count == 0` gives an empty field and `count == 1` a single node at the
/// shape's anchor. Only the chaotic cluster consumes randomness.
pub fn generate<R: Rng + ?Sized>(
	count: usize,
	shape: &Shape,
	rng: &mut R,
) -> BackdropResult<NodeField> {
	shape.validate()?;
	match count {
		0 => return Ok(NodeField::default()),
		1 => {
			return Ok(NodeField {
				points: vec![shape.anchor()],
				loops: Vec::new(),
			});
		}
		_ => {}
	}

	let field = match *shape {
		Shape::Sphere { radius } => NodeField {
			points: fibonacci_sphere(count, radius),
			loops: Vec::new(),
		},
		Shape::Rings { rings, radius } => tilted_rings(count, rings, radius),
		Shape::Cube { half_extent } => NodeField {
			points: wire_cube(count, half_extent),
			loops: Vec::new(),
		},
		Shape::ChaoticCluster {
			radius,
			clusters,
			bias,
		} => NodeField {
			points: chaotic_cluster(count, radius, clusters, bias, rng),
			loops: Vec::new(),
		},
		Shape::CircularLayers { layers, radius } => circular_layers(count, layers, radius),
	};
	debug_assert_eq!(field.points.len(), count);
	Ok(field)
}

/// Fibonacci-spiral points on a sphere of `radius`.
pub fn fibonacci_sphere(count: usize, radius: f64) -> Vec<DVec3> {
	if count == 1 {
		return vec![DVec3::new(0.0, radius, 0.0)];
	}
	let last = count.saturating_sub(1) as f64;
	(0..count)
		.map(|i| {
			let y = 1.0 - (i as f64 / last) * 2.0;
			let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
			let theta = i as f64 * GOLDEN_ANGLE;
			DVec3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y) * radius
		})
		.collect()
}

/// Split `count` into `parts` contiguous ranges; earlier parts take the remainder.
fn split_even(count: usize, parts: usize) -> Vec<Range<usize>> {
	if parts == 0 {
		return Vec::new();
	}
	let (base, extra) = (count / parts, count % parts);
	let mut start = 0;
	(0..parts)
		.map(|k| {
			let len = base + usize::from(k < extra);
			let range = start..start + len;
			start += len;
			range
		})
		.collect()
}

/// Split `count` into `parts` ranges sized in proportion to `k + 1`;
/// outer parts take the remainder.
fn split_weighted(count: usize, parts: usize) -> Vec<Range<usize>> {
	if parts == 0 {
		return Vec::new();
	}
	// Widened so `count * weight` cannot overflow.
	let total_weight = (parts as u128) * (parts as u128 + 1) / 2;
	let mut sizes: Vec<usize> = (0..parts)
		.map(|k| (count as u128 * (k as u128 + 1) / total_weight) as usize)
		.collect();
	let remainder = count.saturating_sub(sizes.iter().sum::<usize>());
	for k in 0..remainder {
		sizes[parts - 1 - k % parts] += 1;
	}
	let mut start = 0;
	sizes
		.into_iter()
		.map(|len| {
			let range = start..start + len;
			start += len;
			range
		})
		.collect()
}

fn ring_point(angle: f64, radius: f64) -> DVec3 {
	DVec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
}

fn tilted_rings(count: usize, rings: usize, radius: f64) -> NodeField {
	let chunks = split_even(count, rings);
	let mut points = Vec::with_capacity(count);
	for (k, range) in chunks.iter().enumerate() {
		let tilt = DQuat::from_rotation_y(k as f64 * GOLDEN_ANGLE)
			* DQuat::from_rotation_x(PI * k as f64 / rings as f64);
		let n = range.len();
		points.extend((0..n).map(|j| tilt * ring_point(TAU * j as f64 / n as f64, radius)));
	}
	NodeField {
		points,
		loops: chunks.into_iter().filter(|r| !r.is_empty()).collect(),
	}
}

fn circular_layers(count: usize, layers: usize, radius: f64) -> NodeField {
	let chunks = split_weighted(count, layers);
	let mut points = Vec::with_capacity(count);
	for (l, range) in chunks.iter().enumerate() {
		let layer_radius = radius * (l + 1) as f64 / layers as f64;
		let offset = l as f64 * GOLDEN_ANGLE;
		let n = range.len();
		points.extend((0..n).map(|j| {
			let angle = offset + TAU * j as f64 / n as f64;
			DVec3::new(angle.cos() * layer_radius, angle.sin() * layer_radius, 0.0)
		}));
	}
	NodeField {
		points,
		loops: chunks.into_iter().filter(|r| !r.is_empty()).collect(),
	}
}

fn wire_cube(count: usize, half_extent: f64) -> Vec<DVec3> {
	let corner = |bits: usize| {
		DVec3::new(
			if bits & 1 != 0 { half_extent } else { -half_extent },
			if bits & 2 != 0 { half_extent } else { -half_extent },
			if bits & 4 != 0 { half_extent } else { -half_extent },
		)
	};
	let edges: Vec<(DVec3, DVec3)> = (0..8usize)
		.flat_map(|bits| {
			[1usize, 2, 4]
				.into_iter()
				.filter(move |axis| bits & axis == 0)
				.map(move |axis| (corner(bits), corner(bits | axis)))
		})
		.collect();
	debug_assert_eq!(edges.len(), 12);

	let side = 2.0 * half_extent;
	let perimeter = side * edges.len() as f64;
	(0..count)
		.map(|i| {
			// Half-step offset keeps points off the shared corners.
			let s = (i as f64 + 0.5) * perimeter / count as f64;
			let idx = ((s / side) as usize).min(edges.len() - 1);
			let t = ((s - idx as f64 * side) / side).clamp(0.0, 1.0);
			let (from, to) = edges[idx];
			from.lerp(to, t)
		})
		.collect()
}

/// Uniform point in the ball of `radius` by rejection sampling.
fn in_ball<R: Rng + ?Sized>(rng: &mut R, radius: f64) -> DVec3 {
	loop {
		let p = DVec3::new(
			rng.gen_range(-1.0..1.0),
			rng.gen_range(-1.0..1.0),
			rng.gen_range(-1.0..1.0),
		);
		if p.length_squared() <= 1.0 {
			return p * radius;
		}
	}
}

fn chaotic_cluster<R: Rng + ?Sized>(
	count: usize,
	radius: f64,
	clusters: usize,
	bias: f64,
	rng: &mut R,
) -> Vec<DVec3> {
	let centres: Vec<DVec3> = (0..clusters).map(|_| in_ball(rng, radius * 0.7)).collect();
	let spread = radius / 4.0;
	(0..count)
		.map(|_| {
			if rng.r#gen::<f64>() < bias {
				let centre = centres[rng.gen_range(0..clusters)];
				let mut tri = || rng.r#gen::<f64>() - rng.r#gen::<f64>();
				centre + DVec3::new(tri(), tri(), tri()) * spread
			} else {
				in_ball(rng, radius)
			}
		})
		.collect()
}

/// Visual ranges applied when turning points into nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Colours at the bottom and top of the field.
	pub palette: [Rgb; 2],
	/// Range the base opacity is drawn from.
	pub opacity: (f64, f64),
	/// Range the node size is drawn from.
	pub size: (f64, f64),
	/// Draw a random phase per node instead of animating in lockstep.
	pub desync: bool,
}

impl NodeStyle {
	/// Reject ranges that are non-finite, inverted or (for opacity) outside `[0, 1]`.
	pub fn validate(&self) -> BackdropResult<()> {
		let (o0, o1) = self.opacity;
		let (s0, s1) = self.size;
		let ok = [o0, o1, s0, s1].iter().all(|v| v.is_finite())
			&& (0.0..=1.0).contains(&o0)
			&& (0.0..=1.0).contains(&o1)
			&& o0 <= o1
			&& 0.0 <= s0
			&& s0 <= s1;
		if ok {
			Ok(())
		} else {
			Err(BackdropError::validation(format!(
				"invalid node style ranges: opacity {:?}, size {:?}",
				self.opacity, self.size
			)))
		}
	}
}

fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
	lo + (hi - lo) * rng.r#gen::<f64>()
}

/// Turn a field into nodes: height gradient colour, sampled opacity and size,
/// optional random phase.
pub fn seed_nodes<R: Rng + ?Sized>(field: &NodeField, style: &NodeStyle, rng: &mut R) -> Vec<Node> {
	let (min_y, max_y) = field
		.points
		.iter()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
			(lo.min(p.y), hi.max(p.y))
		});
	let span = max_y - min_y;

	field
		.points
		.iter()
		.map(|&p| {
			let t = if span > 1e-9 { (p.y - min_y) / span } else { 0.5 };
			let color = style.palette[0].lerp(style.palette[1], t);
			let opacity = sample(rng, style.opacity);
			let size = sample(rng, style.size);
			let phase = if style.desync { rng.r#gen::<f64>() * TAU } else { 0.0 };
			Node::new(p, color, opacity, size, phase)
		})
		.collect()
}
