pub mod boid;
pub mod config;
pub mod error;
pub mod flock;
pub mod math;
pub mod neighbor_grid;
pub mod neighbors;
pub mod obstacle;
pub mod rules;
pub mod scene;

pub use boid::Boid;
pub use config::{FlockConfig, NeighborSearch, SimulationBounds};
pub use error::FlockError;
pub use flock::{Flock, Steering};
pub use obstacle::Obstacle;

use glam::Vec3;
use tracing::warn;
use wasm_bindgen::prelude::*;

/// Flock handle exported to JavaScript. Owns the configuration and flat
/// render buffers the host reads through [`Sim::positions_ptr`] and
/// [`Sim::transforms_ptr`] after every step.
#[wasm_bindgen]
pub struct Sim {
    flock: Flock,
    config: FlockConfig,
    positions: Vec<f32>,
    transforms: Vec<f32>,
}

#[wasm_bindgen]
impl Sim {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, seed: Option<u32>, reef: bool) -> Result<Sim, JsValue> {
        let config = FlockConfig {
            population: count.min(config::MAX_POPULATION),
            rng_seed: seed.map(u64::from),
            ..FlockConfig::default()
        };
        let obstacles = if reef { scene::reef() } else { Vec::new() };
        Self::with_config(config, obstacles).map_err(js_error)
    }

    pub fn step(&mut self, dt: f32) {
        if self.flock.paused() {
            return;
        }
        self.flock.step(dt, &self.config);
        self.sync_render_buffers();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.flock.set_paused(paused);
    }

    pub fn paused(&self) -> bool {
        self.flock.paused()
    }

    pub fn set_count(&mut self, count: usize) -> Result<(), JsValue> {
        self.resize(count).map_err(js_error)
    }

    pub fn count(&self) -> usize {
        self.flock.len()
    }

    pub fn set_steering_none(&mut self) {
        self.flock.set_steering(Steering::None);
    }

    pub fn set_steering_direction(&mut self, x: f32, y: f32, z: f32) {
        self.flock.set_steering(Steering::Direction(Vec3::new(x, y, z)));
    }

    pub fn set_steering_point(&mut self, x: f32, y: f32, z: f32) {
        self.flock.set_steering(Steering::SeekPoint(Vec3::new(x, y, z)));
    }

    pub fn set_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        self.apply_config_json(json).map_err(js_error)
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        self.config.to_json().map_err(js_error)
    }

    pub fn positions_ptr(&self) -> *const f32 {
        self.positions.as_ptr()
    }

    pub fn positions_len(&self) -> usize {
        self.positions.len()
    }

    /// Column-major 4x4 matrices, 16 floats per boid.
    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    pub fn transforms_len(&self) -> usize {
        self.transforms.len()
    }

    pub fn add_sphere(&mut self, x: f32, y: f32, z: f32, radius: f32) -> Result<(), JsValue> {
        self.add_obstacle(Obstacle::sphere(Vec3::new(x, y, z), radius))
            .map_err(js_error)
    }

    pub fn add_box(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        half_x: f32,
        half_y: f32,
        half_z: f32,
    ) -> Result<(), JsValue> {
        let obstacle = Obstacle::cuboid(Vec3::new(x, y, z), Vec3::new(half_x, half_y, half_z));
        self.add_obstacle(obstacle).map_err(js_error)
    }

    pub fn clear_obstacles(&mut self) {
        self.flock.clear_obstacles();
    }

    pub fn load_reef(&mut self) -> Result<(), JsValue> {
        self.set_obstacles(scene::reef()).map_err(js_error)
    }
}

impl Sim {
    pub fn with_config(requested: FlockConfig, obstacles: Vec<Obstacle>) -> Result<Self, FlockError> {
        let config = sanitized(requested);
        let flock = Flock::new(&config, obstacles)?;
        let mut sim = Self {
            flock,
            config,
            positions: Vec::new(),
            transforms: Vec::new(),
        };
        sim.sync_render_buffers();
        Ok(sim)
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    pub fn resize(&mut self, count: usize) -> Result<(), FlockError> {
        let count = count.min(config::MAX_POPULATION);
        let result = self.flock.resize(count, &self.config);
        self.config.population = self.flock.len();
        self.sync_render_buffers();
        result
    }

    pub fn apply_config_json(&mut self, json: &str) -> Result<(), FlockError> {
        let config = sanitized(FlockConfig::from_json(json)?);
        let population = config.population;
        self.config = config;
        self.resize(population)
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Result<(), FlockError> {
        self.flock.add_obstacle(obstacle);
        self.evict_colliding()
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) -> Result<(), FlockError> {
        self.flock.clear_obstacles();
        for obstacle in obstacles {
            self.flock.add_obstacle(obstacle);
        }
        self.evict_colliding()
    }

    fn evict_colliding(&mut self) -> Result<(), FlockError> {
        let result = self.flock.respawn_colliding(&self.config).map(|_| ());
        self.sync_render_buffers();
        result
    }

    fn sync_render_buffers(&mut self) {
        let boids = self.flock.boids();
        self.positions.clear();
        self.positions.reserve(boids.len() * 3);
        self.transforms.clear();
        self.transforms.reserve(boids.len() * 16);
        for boid in boids {
            self.positions.extend_from_slice(&boid.position().to_array());
        }
        for transform in self.flock.transforms() {
            self.transforms.extend_from_slice(&transform.to_cols_array());
        }
    }
}

fn sanitized(requested: FlockConfig) -> FlockConfig {
    let mut config = requested.clone();
    config.sanitize();
    if config != requested {
        warn!(?requested, applied = ?config, "configuration clamped");
    }
    config
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsError::new(&err.to_string()).into()
}
