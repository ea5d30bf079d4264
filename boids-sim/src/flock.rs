use glam::{Mat4, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::boid::Boid;
use crate::config::{FlockConfig, NeighborSearch};
use crate::error::FlockError;
use crate::math::normalize;
use crate::neighbor_grid::NeighborGrid;
use crate::neighbors::{find_neighbours, find_neighbours_in_grid};
use crate::obstacle::{any_colliding, Obstacle};
use crate::rules;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Steering {
    #[default]
    None,
    Direction(Vec3),
    SeekPoint(Vec3),
}

impl Steering {
    pub fn bias_for(&self, position: Vec3) -> Vec3 {
        match *self {
            Self::None => Vec3::ZERO,
            Self::Direction(direction) => direction,
            Self::SeekPoint(point) => normalize(point - position),
        }
    }
}

pub struct Flock {
    boids: Vec<Boid>,
    obstacles: Vec<Obstacle>,
    steering: Steering,
    paused: bool,
    tick: u64,
    rng: SmallRng,
    grid: NeighborGrid,
    targets: Vec<Vec3>,
}

impl Flock {
    pub fn new(config: &FlockConfig, obstacles: Vec<Obstacle>) -> Result<Self, FlockError> {
        config.bounds.validate()?;
        let seed = config.rng_seed.unwrap_or_else(entropy_seed);
        let mut flock = Self {
            boids: Vec::with_capacity(config.population),
            obstacles,
            steering: Steering::None,
            paused: false,
            tick: 0,
            rng: SmallRng::seed_from_u64(seed),
            grid: NeighborGrid::new(),
            targets: Vec::new(),
        };
        flock.resize(config.population, config)?;
        debug!(
            seed,
            boids = flock.boids.len(),
            obstacles = flock.obstacles.len(),
            "flock created"
        );
        Ok(flock)
    }

    pub fn resize(&mut self, count: usize, config: &FlockConfig) -> Result<(), FlockError> {
        let previous = self.boids.len();
        if count <= previous {
            self.boids.truncate(count);
        } else {
            self.boids.reserve(count - previous);
            for _ in previous..count {
                let boid = Boid::spawn(
                    &mut self.rng,
                    &config.bounds,
                    &self.obstacles,
                    config.spawn_attempts,
                )
                .inspect_err(|err| warn!(%err, spawned = self.boids.len(), "spawn failed"))?;
                self.boids.push(boid);
            }
        }

        if previous != count {
            debug!(previous, count, "population resized");
        }
        Ok(())
    }

    pub fn push(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
    }

    pub fn respawn_colliding(&mut self, config: &FlockConfig) -> Result<usize, FlockError> {
        let mut moved = 0;
        for i in 0..self.boids.len() {
            if !any_colliding(&self.obstacles, self.boids[i].position()) {
                continue;
            }
            self.boids[i] = Boid::spawn(
                &mut self.rng,
                &config.bounds,
                &self.obstacles,
                config.spawn_attempts,
            )?;
            moved += 1;
        }
        if moved > 0 {
            debug!(moved, "respawned boids inside obstacles");
        }
        Ok(moved)
    }

    pub fn steering(&self) -> Steering {
        self.steering
    }

    pub fn set_steering(&mut self, steering: Steering) {
        self.steering = steering;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn transforms(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.boids.iter().map(Boid::transform)
    }

    /// Advances every boid by one frame of `dt` seconds. Does nothing while
    /// paused.
    ///
    /// All target headings are computed from the positions and headings at
    /// the start of the tick before any boid moves.
    pub fn step(&mut self, dt: f32, config: &FlockConfig) {
        if self.paused {
            return;
        }

        if config.neighbor_search == NeighborSearch::Grid {
            self.grid
                .rebuild(&self.boids, &config.bounds, config.vision_range);
        }

        let targets = self.compute_targets(config);
        self.targets = targets;

        let (movement, transition) = config.motion(dt);
        for (boid, target) in self.boids.iter_mut().zip(&self.targets) {
            boid.set_target_direction(*target);
            boid.update_direction(movement, transition);
        }
        self.tick = self.tick.wrapping_add(1);
    }

    #[cfg(not(feature = "parallel"))]
    fn compute_targets(&mut self, config: &FlockConfig) -> Vec<Vec3> {
        let mut targets = std::mem::take(&mut self.targets);
        targets.clear();
        targets.extend(self.boids.iter().map(|boid| self.target_for(boid, config)));
        targets
    }

    #[cfg(feature = "parallel")]
    fn compute_targets(&mut self, config: &FlockConfig) -> Vec<Vec3> {
        self.boids
            .par_iter()
            .map(|boid| self.target_for(boid, config))
            .collect()
    }

    fn target_for(&self, boid: &Boid, config: &FlockConfig) -> Vec3 {
        let neighbours = match config.neighbor_search {
            NeighborSearch::BruteForce => find_neighbours(
                boid,
                &self.boids,
                config.vision_range,
                config.vision_angle_deg,
            ),
            NeighborSearch::Grid => find_neighbours_in_grid(
                boid,
                &self.boids,
                &self.grid,
                config.vision_range,
                config.vision_angle_deg,
            ),
        };

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
        ) + rules::avoid_obstacles(boid, &self.obstacles, config.obstacle_strength);
        let bias = self.steering.bias_for(boid.position());

        // Avoidance is added after normalizing so it dominates near walls and obstacles.
        normalize(boid.direction() + cohesion + alignment + separation + bias) + avoid
    }
}

fn entropy_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if let Err(err) = getrandom::fill(&mut bytes) {
        warn!(%err, "entropy unavailable, using fixed seed");
        return 0x5EED_B01D;
    }
    u64::from_le_bytes(bytes)
}
