//! Connectivity: turns a fixed node set into an edge list.
//!
//! Structural rules run first, then distance edges in ascending distance
//! order. Both share one degree budget and one dedupe set.

use std::collections::HashSet;
use std::f64::consts::TAU;
use std::ops::Range;

use glam::DVec3;
use rand::Rng;

use super::types::Edge;

const PHI: f64 = 1.618_033_988_749_895;
/// Lowest strength a structural edge gets. Structural targets usually lie
/// beyond the distance threshold, where `1 - d/D` would be zero.
pub const STRUCTURAL_STRENGTH: f64 = 0.35;

/// A connection rule that picks targets from node indices rather than distance.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
	/// Each node to its successor within its ring.
	RingAdjacency,
	/// Each node to the node half the set away.
	Opposite {
		/// Chance each candidate is kept.
		probability: f64,
	},
	/// Each node to the node `round(M / φ)` away.
	GoldenOffset {
		/// Chance each candidate is kept.
		probability: f64,
	},
	/// Each node to the node `floor(M / divisor)` away.
	Offset {
		/// Fraction of the set to skip.
		divisor: usize,
		/// Chance each candidate is kept.
		probability: f64,
	},
	/// Each node to its `k` nearest neighbours.
	NearestK {
		/// Neighbours per node.
		k: usize,
	},
}

/// Parameters of [`build`].
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectParams {
	/// Distance threshold `D`. Also normalises edge strength.
	pub max_distance: f64,
	/// Cap on edges per node.
	pub max_degree: Option<usize>,
	/// Structural rules, applied in order before distance edges.
	pub rules: Vec<Rule>,
}

impl ConnectParams {
	/// Pure distance-threshold connectivity.
	pub fn within(max_distance: f64) -> Self {
		Self {
			max_distance,
			max_degree: None,
			rules: Vec::new(),
		}
	}
}

struct EdgeSet {
	seen: HashSet<(usize, usize)>,
	degree: Vec<usize>,
	cap: usize,
	edges: Vec<Edge>,
}

impl EdgeSet {
	fn new(nodes: usize, cap: Option<usize>) -> Self {
		Self {
			seen: HashSet::new(),
			degree: vec![0; nodes],
			cap: cap.unwrap_or(usize::MAX),
			edges: Vec::new(),
		}
	}

	fn try_add<R: Rng + ?Sized>(&mut self, i: usize, j: usize, strength: f64, rng: &mut R) -> bool {
		if i == j || i >= self.degree.len() || j >= self.degree.len() {
			return false;
		}
		if self.degree[i] >= self.cap || self.degree[j] >= self.cap {
			return false;
		}
		if !self.seen.insert((i.min(j), i.max(j))) {
			return false;
		}
		let Some(edge) = Edge::new(i, j, strength, rng.r#gen::<f64>() * TAU) else {
			return false;
		};
		self.degree[i] += 1;
		self.degree[j] += 1;
		self.edges.push(edge);
		true
	}
}

/// Build the edge list for `points`.
///
/// Returns an empty list when the threshold is non-positive or non-finite, or
/// when the degree cap is zero. Structural candidates each consume one random
/// draw whether or not they are kept, so the structural set does not depend on
/// the threshold, and the distance pass only appends candidates as it grows:
/// the edge count never decreases with a larger threshold.
pub fn build<R: Rng + ?Sized>(
	points: &[DVec3],
	loops: &[Range<usize>],
	params: &ConnectParams,
	rng: &mut R,
) -> Vec<Edge> {
	let d = params.max_distance;
	if !(d.is_finite() && d > 0.0) || params.max_degree == Some(0) || points.len() < 2 {
		return Vec::new();
	}
	let strength =
		|i: usize, j: usize| (1.0 - points[i].distance(points[j]) / d).max(STRUCTURAL_STRENGTH);
	let mut set = EdgeSet::new(points.len(), params.max_degree);

	for rule in &params.rules {
		for (i, j) in structural_candidates(rule, points, loops, rng) {
			set.try_add(i, j, strength(i, j), rng);
		}
	}

	let n = points.len();
	let mut candidates: Vec<(f64, usize, usize)> = (0..n)
		.flat_map(|i| (i + 1..n).map(move |j| (points[i].distance(points[j]), i, j)))
		.filter(|&(dist, _, _)| dist <= d)
		.collect();
	candidates.sort_by(|x, y| {
		x.0.total_cmp(&y.0)
			.then(x.1.cmp(&y.1))
			.then(x.2.cmp(&y.2))
	});
	for (dist, i, j) in candidates {
		set.try_add(i, j, 1.0 - dist / d, rng);
	}

	set.edges
}

fn keep<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
	rng.r#gen::<f64>() < probability
}

fn offset_pairs<R: Rng + ?Sized>(
	n: usize,
	offset: usize,
	probability: f64,
	rng: &mut R,
) -> Vec<(usize, usize)> {
	(0..n)
		.filter_map(|i| {
			let kept = keep(rng, probability);
			let j = (i + offset) % n;
			(kept && i != j).then_some((i, j))
		})
		.collect()
}

fn structural_candidates<R: Rng + ?Sized>(
	rule: &Rule,
	points: &[DVec3],
	loops: &[Range<usize>],
	rng: &mut R,
) -> Vec<(usize, usize)> {
	let n = points.len();
	match *rule {
		Rule::RingAdjacency => {
			let whole = [0..n];
			let loops = if loops.is_empty() { &whole[..] } else { loops };
			loops
				.iter()
				.filter(|r| r.len() >= 2 && r.end <= n)
				.flat_map(|r| {
					let (start, end) = (r.start, r.end);
					(start..end).map(move |i| (i, if i + 1 == end { start } else { i + 1 }))
				})
				.collect()
		}
		Rule::Opposite { probability } => offset_pairs(n, n / 2, probability, rng),
		Rule::GoldenOffset { probability } => {
			offset_pairs(n, (n as f64 / PHI).round() as usize, probability, rng)
		}
		Rule::Offset {
			divisor,
			probability,
		} => {
			if divisor == 0 {
				return Vec::new();
			}
			offset_pairs(n, n / divisor, probability, rng)
		}
		Rule::NearestK { k } => (0..n)
			.flat_map(|i| {
				let mut others: Vec<(f64, usize)> = (0..n)
					.filter(|&j| j != i)
					.map(|j| (points[i].distance(points[j]), j))
					.collect();
				others.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
				others.into_iter().take(k).map(move |(_, j)| (i, j))
			})
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;
	use crate::network::field::{Shape, generate};

	fn cloud(n: usize, seed: u64) -> Vec<DVec3> {
		let mut rng = SmallRng::seed_from_u64(seed);
		(0..n)
			.map(|_| {
				DVec3::new(
					rng.gen_range(-5.0..5.0),
					rng.gen_range(-5.0..5.0),
					rng.gen_range(-5.0..5.0),
				)
			})
			.collect()
	}

	fn assert_simple(edges: &[Edge], n: usize) {
		let mut seen = HashSet::new();
		for e in edges {
			let (a, b) = e.endpoints();
			assert!(a < b, "self-edge or non-canonical pair {a},{b}");
			assert!(b < n);
			assert!(seen.insert((a, b)), "duplicate edge {a},{b}");
			assert!((0.0..=1.0).contains(&e.strength));
		}
	}

	fn all_rules() -> Vec<Rule> {
		vec![
			Rule::RingAdjacency,
			Rule::Opposite { probability: 0.5 },
			Rule::GoldenOffset { probability: 0.7 },
			Rule::Offset {
				divisor: 3,
				probability: 0.7,
			},
			Rule::NearestK { k: 2 },
		]
	}

	#[test]
	fn no_self_or_duplicate_edges() {
		for seed in 0..8 {
			let points = cloud(60, seed);
			let params = ConnectParams {
				max_distance: 4.0,
				max_degree: None,
				rules: all_rules(),
			};
			let edges = build(&points, &[], &params, &mut SmallRng::seed_from_u64(seed));
			assert_simple(&edges, points.len());
		}
	}

	#[test]
	fn edge_count_is_monotonic_in_threshold() {
		let points = cloud(80, 3);
		for max_degree in [None, Some(1), Some(3)] {
			let mut last = 0;
			for step in 1..=20 {
				let params = ConnectParams {
					max_distance: step as f64 * 0.5,
					max_degree,
					rules: vec![Rule::Opposite { probability: 0.5 }],
				};
				let count = build(&points, &[], &params, &mut SmallRng::seed_from_u64(9)).len();
				assert!(count >= last, "count fell from {last} to {count} at step {step}");
				last = count;
			}
		}
	}

	#[test]
	fn degree_cap_is_respected() {
		let points = cloud(50, 1);
		let params = ConnectParams {
			max_distance: 100.0,
			max_degree: Some(4),
			rules: vec![Rule::NearestK { k: 6 }],
		};
		let edges = build(&points, &[], &params, &mut SmallRng::seed_from_u64(0));
		let mut degree = vec![0; points.len()];
		for e in &edges {
			let (a, b) = e.endpoints();
			degree[a] += 1;
			degree[b] += 1;
		}
		assert!(degree.iter().all(|&d| d <= 4));
	}

	#[test]
	fn degenerate_parameters_give_no_edges() {
		let points = cloud(10, 0);
		let mut rng = SmallRng::seed_from_u64(0);
		for d in [0.0, -1.0, f64::NAN] {
			assert!(build(&points, &[], &ConnectParams::within(d), &mut rng).is_empty());
		}
		let capped = ConnectParams {
			max_distance: 10.0,
			max_degree: Some(0),
			rules: vec![Rule::RingAdjacency],
		};
		assert!(build(&points, &[], &capped, &mut rng).is_empty());
		assert!(build(&points[..1], &[], &ConnectParams::within(10.0), &mut rng).is_empty());
	}

	#[test]
	fn strength_falls_with_distance() {
		let points = [DVec3::ZERO, DVec3::X, DVec3::X * 3.0];
		let edges = build(
			&points,
			&[],
			&ConnectParams::within(4.0),
			&mut SmallRng::seed_from_u64(0),
		);
		let strength = |a, b| {
			edges
				.iter()
				.find(|e| e.endpoints() == (a, b))
				.map(|e| e.strength)
				.unwrap()
		};
		assert_eq!(strength(0, 1), 0.75);
		assert_eq!(strength(0, 2), 0.25);
		assert_eq!(strength(1, 2), 0.5);
	}

	#[test]
	fn ring_adjacency_closes_each_loop() {
		let mut rng = SmallRng::seed_from_u64(0);
		let shape = Shape::Rings {
			rings: 3,
			radius: 4.0,
		};
		let field = generate(30, &shape, &mut rng).unwrap();
		let params = ConnectParams {
			max_distance: 1e-9,
			max_degree: None,
			rules: vec![Rule::RingAdjacency],
		};
		let edges = build(&field.points, &field.loops, &params, &mut rng);
		assert_eq!(edges.len(), 30);
		assert!(edges.iter().any(|e| e.endpoints() == (0, 9)));
		assert!(edges.iter().any(|e| e.endpoints() == (10, 19)));
	}

	#[test]
	fn offset_rule_targets_a_third_of_the_way_round() {
		let points = cloud(12, 2);
		let params = ConnectParams {
			max_distance: 1e-6,
			max_degree: None,
			rules: vec![Rule::Offset {
				divisor: 3,
				probability: 1.0,
			}],
		};
		let edges = build(&points, &[], &params, &mut SmallRng::seed_from_u64(0));
		assert_eq!(edges.len(), 12);
		assert!(edges.iter().all(|e| {
			let (a, b) = e.endpoints();
			b - a == 4 || b - a == 8
		}));
	}

	#[test]
	fn structural_edges_beyond_the_threshold_stay_visible() {
		let points = cloud(24, 5);
		let params = ConnectParams {
			max_distance: 0.5,
			max_degree: Some(4),
			rules: all_rules(),
		};
		let edges = build(&points, &[], &params, &mut SmallRng::seed_from_u64(3));
		let far: Vec<&Edge> = edges
			.iter()
			.filter(|e| {
				let (a, b) = e.endpoints();
				points[a].distance(points[b]) > params.max_distance
			})
			.collect();
		assert!(!far.is_empty());
		assert!(far.iter().all(|e| e.strength == STRUCTURAL_STRENGTH));
	}

	#[test]
	fn zero_probability_keeps_nothing() {
		let points = cloud(20, 4);
		let params = ConnectParams {
			max_distance: 1e-6,
			max_degree: None,
			rules: vec![
				Rule::Opposite { probability: 0.0 },
				Rule::GoldenOffset { probability: 0.0 },
			],
		};
		assert!(build(&points, &[], &params, &mut SmallRng::seed_from_u64(0)).is_empty());
	}

	#[test]
	fn seeded_builds_are_identical() {
		let points = cloud(40, 7);
		let params = ConnectParams {
			max_distance: 3.0,
			max_degree: Some(5),
			rules: all_rules(),
		};
		let a = build(&points, &[], &params, &mut SmallRng::seed_from_u64(21));
		let b = build(&points, &[], &params, &mut SmallRng::seed_from_u64(21));
		assert_eq!(a, b);
	}
}
