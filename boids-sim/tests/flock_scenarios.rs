use boids_sim::math::normalize;
use boids_sim::neighbors::find_neighbours;
use boids_sim::{
    rules, scene, Boid, Flock, FlockConfig, FlockError, NeighborSearch, Obstacle, Steering,
};
use glam::Vec3;

fn seeded(population: usize) -> FlockConfig {
    FlockConfig {
        population,
        rng_seed: Some(0xF10C),
        ..FlockConfig::default()
    }
}

fn lone_boid(config: &FlockConfig, position: Vec3, heading: Vec3) -> Flock {
    let mut flock = Flock::new(config, Vec::new()).expect("empty flock");
    flock.push(Boid::new(position, heading));
    flock
}

#[test]
fn lone_boid_flies_a_straight_line() {
    let config = FlockConfig {
        speed: 1.0,
        ..seeded(0)
    };
    let start = Vec3::new(0.0, 25.0, 0.0);
    let mut flock = lone_boid(&config, start, Vec3::X);
    for _ in 0..10 {
        flock.step(1.0, &config);
    }
    let boid = flock.boids()[0];
    assert_eq!(boid.position(), start + Vec3::X * 10.0);
    assert_eq!(boid.direction(), Vec3::X);

    let heading = normalize(Vec3::new(2.0, -1.0, 2.0));
    let mut flock = lone_boid(&config, start, heading);
    for _ in 0..10 {
        flock.step(1.0, &config);
    }
    assert!((flock.boids()[0].position() - (start + heading * 10.0)).length() < 1.0e-4);
}

#[test]
fn boid_leaving_the_interior_turns_back() {
    let config = seeded(0);
    let mut flock = lone_boid(&config, Vec3::new(95.0, 25.0, 0.0), Vec3::X);
    for _ in 0..600 {
        flock.step(1.0 / 60.0, &config);
    }
    let position = flock.boids()[0].position();
    assert!(position.x < config.bounds.max.x + 5.0, "escaped to {position}");
}

#[test]
fn population_resizes_between_ticks() {
    let config = seeded(100);
    let mut flock = Flock::new(&config, scene::reef()).expect("reef flock");
    for _ in 0..5 {
        flock.step(1.0 / 60.0, &config);
    }
    let survivors = flock.boids()[..40].to_vec();

    flock.resize(40, &config).expect("shrink");
    assert_eq!(flock.boids(), &survivors[..]);

    flock.resize(500, &config).expect("grow");
    assert_eq!(flock.len(), 500);
    assert_eq!(&flock.boids()[..40], &survivors[..]);
    let obstacles = flock.obstacles();
    assert!(flock.boids()[40..]
        .iter()
        .all(|b| obstacles.iter().all(|o| !o.is_colliding(b.position()))));
}

#[test]
fn impossible_spawn_volume_is_an_error() {
    let config = FlockConfig {
        spawn_attempts: 32,
        ..seeded(1)
    };
    let wall = Obstacle::cuboid(Vec3::new(0.0, 25.0, 0.0), Vec3::new(100.0, 25.0, 100.0));
    match Flock::new(&config, vec![wall]) {
        Err(FlockError::SpawnExhausted { attempts }) => assert_eq!(attempts, 32),
        other => panic!("expected spawn failure, got {:?}", other.map(|f| f.len())),
    }
}

#[test]
fn grid_search_reproduces_brute_force_ticks() {
    let brute = seeded(600);
    let grid = FlockConfig {
        neighbor_search: NeighborSearch::Grid,
        ..brute.clone()
    };
    let mut a = Flock::new(&brute, scene::reef()).expect("brute flock");
    let mut b = Flock::new(&grid, scene::reef()).expect("grid flock");
    a.set_steering(Steering::Direction(Vec3::Z));
    b.set_steering(Steering::Direction(Vec3::Z));
    for _ in 0..30 {
        a.step(1.0 / 60.0, &brute);
        b.step(1.0 / 60.0, &grid);
    }
    assert_eq!(a.boids(), b.boids());
}

#[test]
fn every_heading_stays_unit_length() {
    let config = seeded(300);
    let mut flock = Flock::new(&config, scene::reef()).expect("reef flock");
    flock.set_steering(Steering::SeekPoint(Vec3::new(0.0, 25.0, 0.0)));
    for _ in 0..120 {
        flock.step(1.0 / 30.0, &config);
    }
    for boid in flock.boids() {
        assert!(boid.position().is_finite());
        assert!((boid.direction().length() - 1.0).abs() < 1.0e-3);
    }
}

#[test]
fn paused_flock_ignores_ticks() {
    let config = seeded(50);
    let mut flock = Flock::new(&config, Vec::new()).expect("flock");
    flock.set_paused(true);
    let before = flock.boids().to_vec();
    for _ in 0..10 {
        flock.step(1.0 / 60.0, &config);
    }
    assert_eq!(flock.boids(), &before[..]);
    flock.set_paused(false);
    flock.step(1.0 / 60.0, &config);
    assert_ne!(flock.boids(), &before[..]);
}

fn snapshot_target(boid: &Boid, snapshot: &[Boid], flock: &Flock, config: &FlockConfig) -> Vec3 {
    let neighbours = find_neighbours(boid, snapshot, config.vision_range, config.vision_angle_deg);
    let cohesion = rules::cohesion(boid, &neighbours, config.cohesion_strength);
    let alignment = rules::alignment(&neighbours, config.alignment_strength);
    let separation = rules::separation(
        boid,
        &neighbours,
        config.separation_strength,
        config.vision_range,
    );
    let avoid = rules::avoid_edges(
        boid,
        &config.bounds,
        config.edge_strength,
        config.normalize_edge_push,
    ) + rules::avoid_obstacles(boid, flock.obstacles(), config.obstacle_strength);
    let bias = flock.steering().bias_for(boid.position());
    normalize(boid.direction() + cohesion + alignment + separation + bias) + avoid
}

// Runs with and without the `parallel` feature; both must match a one-by-one
// recomputation from the state at the start of the tick.
#[test]
fn tick_matches_sequential_recomputation_from_snapshot() {
    let config = seeded(200);
    let mut flock = Flock::new(&config, scene::reef()).expect("reef flock");
    flock.set_steering(Steering::SeekPoint(Vec3::new(10.0, 20.0, -5.0)));
    let (movement, transition) = config.motion(1.0 / 60.0);

    for _ in 0..10 {
        let snapshot = flock.boids().to_vec();
        let expected: Vec<Boid> = snapshot
            .iter()
            .map(|boid| {
                let mut next = *boid;
                next.set_target_direction(snapshot_target(boid, &snapshot, &flock, &config));
                next.update_direction(movement, transition);
                next
            })
            .collect();

        flock.step(1.0 / 60.0, &config);
        assert_eq!(flock.boids(), &expected[..]);
    }
}
