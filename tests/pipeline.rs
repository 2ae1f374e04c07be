use std::collections::HashSet;
use std::f64::consts::PI;

use approx::assert_relative_eq;
use glam::DVec3;
use nexus_site::network::animate::{self, Motion};
use nexus_site::network::field::{self, NodeStyle};
use nexus_site::network::{
	ConnectParams, CountPolicy, Edge, GeometryBuffers, Node, Rgb, Scene, Shape, Viewport,
	connect, presets,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn rng(seed: u64) -> SmallRng {
	SmallRng::seed_from_u64(seed)
}

fn shapes() -> Vec<Shape> {
	vec![
		Shape::Sphere { radius: 2.0 },
		Shape::Rings {
			rings: 3,
			radius: 2.5,
		},
		Shape::Cube { half_extent: 1.5 },
		Shape::ChaoticCluster {
			radius: 3.0,
			clusters: 4,
			bias: 0.5,
		},
		Shape::CircularLayers {
			layers: 3,
			radius: 4.0,
		},
	]
}

#[test]
fn every_shape_yields_the_requested_count() {
	for shape in shapes() {
		for n in [0, 1, 2, 7, 64, 257] {
			let f = field::generate(n, &shape, &mut rng(5)).unwrap();
			assert_eq!(f.points.len(), n, "{shape:?} with {n}");
		}
	}
}

#[test]
fn sphere_points_lie_on_the_radius() {
	let f = field::generate(500, &Shape::Sphere { radius: 3.0 }, &mut rng(0)).unwrap();
	for p in &f.points {
		assert_relative_eq!(p.length(), 3.0, epsilon = 1e-9);
	}
}

#[test]
fn single_sphere_node_sits_on_the_pole() {
	let f = field::generate(1, &Shape::Sphere { radius: 2.0 }, &mut rng(0)).unwrap();
	assert_eq!(f.points, vec![DVec3::new(0.0, 2.0, 0.0)]);
}

#[test]
fn negative_density_count_is_rejected() {
	let policy = CountPolicy::Density {
		per_megapixel: -10.0,
		min: 0,
		max: 100,
	};
	assert!(policy.resolve(Viewport::new(800.0, 600.0)).is_err());
	assert!(field::checked_count(f64::NAN).is_err());
	assert_eq!(field::checked_count(12.9).unwrap(), 12);
}

#[test]
fn twenty_four_node_ring_connects_only_neighbours() {
	let shape = Shape::CircularLayers {
		layers: 1,
		radius: 5.0,
	};
	let f = field::generate(24, &shape, &mut rng(1)).unwrap();
	let edges = connect::build(&f.points, &f.loops, &ConnectParams::within(2.3), &mut rng(1));
	assert_eq!(edges.len(), 24);
	for e in &edges {
		let (a, b) = e.endpoints();
		assert!(b - a == 1 || (a, b) == (0, 23), "unexpected edge {a}-{b}");
	}
}

#[test]
fn edges_are_unique_and_grow_with_the_threshold() {
	let f = field::generate(150, &shapes()[3], &mut rng(9)).unwrap();
	let mut last = 0;
	for d in [0.2, 0.5, 0.8, 1.2, 2.0] {
		let edges = connect::build(&f.points, &f.loops, &ConnectParams::within(d), &mut rng(2));
		let mut seen = HashSet::new();
		for e in &edges {
			let (a, b) = e.endpoints();
			assert!(a < b);
			assert!(seen.insert((a, b)));
		}
		assert!(edges.len() >= last, "fewer edges at {d}");
		last = edges.len();
	}
}

#[test]
fn pulse_peaks_at_a_quarter_period() {
	let motion = Motion {
		pulse_frequency: 2.0,
		pulse_amplitude: 0.3,
		..Motion::STILL
	};
	let mut nodes = vec![Node::new(DVec3::X, Rgb::WHITE, 0.5, 0.1, 0.0)];
	animate::animate_nodes(&mut nodes, &motion, PI / 4.0);
	assert_relative_eq!(nodes[0].opacity, 0.8, epsilon = 1e-12);
}

#[test]
fn time_zero_with_zero_phases_is_the_rest_state() {
	// data-cube keeps every node in phase.
	let preset = presets::lookup("data-cube").unwrap();
	let mut scene = Scene::build(preset, Viewport::new(1280.0, 720.0), 4).unwrap();
	scene.advance(17.5);
	scene.advance(0.0);
	for node in scene.nodes() {
		assert_eq!(node.position, node.rest());
		assert_eq!(node.opacity, node.base_opacity);
	}
	assert_relative_eq!(scene.transform.scale, 1.0);
	assert_eq!(scene.transform.rotation, DVec3::ZERO);
}

#[test]
fn animation_stays_in_range_for_every_preset() {
	let vp = Viewport::new(1600.0, 900.0);
	for preset in presets::PRESETS.iter() {
		let mut scene = Scene::build(preset, vp, 12).unwrap();
		for t in [0.0, 0.016, 1.0, 33.3, 1.0e4, -2.0] {
			assert!(scene.advance(t));
			assert!(scene.nodes().iter().all(|n| (0.0..=1.0).contains(&n.opacity)));
			assert!(
				scene
					.edges()
					.iter()
					.all(|e| (0.0..=1.0).contains(&e.opacity) && (0.0..1.0).contains(&e.flow))
			);
		}
	}
}

#[test]
fn same_seed_same_scene() {
	for preset in presets::PRESETS.iter() {
		let vp = Viewport::new(1024.0, 768.0);
		let a = Scene::build(preset, vp, 77).unwrap();
		let b = Scene::build(preset, vp, 77).unwrap();
		assert_eq!(a.nodes(), b.nodes(), "{}", preset.name);
		assert_eq!(a.edges(), b.edges(), "{}", preset.name);
	}
}

#[test]
fn hand_built_scene_feeds_the_buffers() {
	let style = NodeStyle {
		palette: [Rgb::WHITE, Rgb::WHITE],
		opacity: (1.0, 1.0),
		size: (0.1, 0.1),
		desync: false,
	};
	let f = field::generate(3, &Shape::Sphere { radius: 1.0 }, &mut rng(0)).unwrap();
	let nodes = field::seed_nodes(&f, &style, &mut rng(0));
	let edges = vec![Edge::new(0, 1, 1.0, 0.0).unwrap(), Edge::new(2, 1, 0.5, 0.0).unwrap()];
	let scene = Scene::from_parts(nodes, edges, Motion::STILL).unwrap();

	let mut buffers = GeometryBuffers::default();
	buffers.write(&scene);
	assert_eq!(buffers.positions.len(), 9);
	assert_eq!(buffers.sizes.len(), 3);
	assert_eq!(buffers.segments.len(), 2 * 2 * 3);
	assert_eq!(buffers.segment_colors.len(), 2 * 2 * 4);
	buffers.release();
	assert_eq!(buffers.capacity(), 0);
}
