use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};
use rand::Rng;
use tracing::trace;

use crate::config::SimulationBounds;
use crate::error::FlockError;
use crate::math::{angle_between, lerp, normalize, placement, rotation_about_axis, slerp};
use crate::obstacle::{any_colliding, Obstacle};

pub const MODEL_FORWARD: Vec3 = Vec3::X;

const ANTIPARALLEL_COS: f32 = -1.0 + 1.0e-6;
const ANTIPARALLEL_NUDGE: f32 = 1.0e-3;

/// Below 90 degrees the blended heading fades from normalized lerp into slerp
/// over this window so the two methods meet at the boundary.
const HEADING_BLEND_WINDOW_DEG: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boid {
    current_direction: Vec3,
    target_direction: Vec3,
    position: Vec3,
    transform: Mat4,
}

impl Boid {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        let mut direction = normalize(direction);
        if direction == Vec3::ZERO {
            direction = MODEL_FORWARD;
        }
        let mut boid = Self {
            current_direction: direction,
            target_direction: direction,
            position,
            transform: Mat4::IDENTITY,
        };
        boid.transform = placement(position, boid.orientation());
        boid
    }

    pub fn spawn<R: Rng>(
        rng: &mut R,
        bounds: &SimulationBounds,
        obstacles: &[Obstacle],
        attempts: u32,
    ) -> Result<Self, FlockError> {
        bounds.validate()?;
        let (lower, upper) = bounds.interior();

        for attempt in 0..attempts {
            let position = Vec3::new(
                rng.random_range(lower.x..upper.x),
                rng.random_range(lower.y..upper.y),
                rng.random_range(lower.z..upper.z),
            );
            if any_colliding(obstacles, position) {
                trace!(attempt, ?position, "spawn position rejected");
                continue;
            }
            return Ok(Self::new(position, random_heading(rng)));
        }

        Err(FlockError::SpawnExhausted { attempts })
    }

    pub fn initial_direction(&self) -> Vec3 {
        MODEL_FORWARD
    }

    pub fn direction(&self) -> Vec3 {
        self.current_direction
    }

    pub fn target_direction(&self) -> Vec3 {
        self.target_direction
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// A zero vector keeps the current heading.
    pub fn set_target_direction(&mut self, direction: Vec3) {
        let direction = normalize(direction);
        self.target_direction = if direction == Vec3::ZERO {
            self.current_direction
        } else {
            direction
        };
    }

    /// Rotation carrying the model forward axis onto the current heading.
    ///
    /// Past 90 degrees the naive axis-angle rotation rolls the mesh upside
    /// down, so the supplementary angle is used and the mesh is spun half a
    /// turn about the up axis instead.
    pub fn orientation(&self) -> Mat4 {
        let forward = self.initial_direction();
        let angle = angle_between(forward, self.current_direction);
        let axis = normalize(forward.cross(self.current_direction));
        if angle <= FRAC_PI_2 {
            rotation_about_axis(axis, angle)
        } else {
            rotation_about_axis(axis, -(PI - angle)) * Mat4::from_rotation_y(PI)
        }
    }

    pub fn update_direction(&mut self, speed: f32, transition: f32) {
        let rotation = self.orientation();
        self.current_direction =
            blend_heading(self.current_direction, self.target_direction, transition);
        self.position += self.current_direction * speed;
        self.transform = placement(self.position, rotation);
    }
}

/// Moves unit heading `current` toward unit heading `target`.
///
/// Normalized lerp under 90 degrees, slerp from 90 up to 180, and a nudge
/// off the axis when the two are exactly opposite.
pub fn blend_heading(current: Vec3, target: Vec3, transition: f32) -> Vec3 {
    let cos_angle = current.dot(target);
    if cos_angle <= ANTIPARALLEL_COS {
        let nudged = normalize(current + current.any_orthonormal_vector() * ANTIPARALLEL_NUDGE);
        return slerp(nudged, target, transition);
    }

    let angle = angle_between(current, target).to_degrees();
    if angle >= 90.0 {
        return slerp(current, target, transition);
    }

    let lerped = normalize(lerp(current, target, transition));
    let fade_start = 90.0 - HEADING_BLEND_WINDOW_DEG;
    if angle <= fade_start {
        return lerped;
    }

    let fade = (angle - fade_start) / HEADING_BLEND_WINDOW_DEG;
    normalize(lerp(lerped, slerp(current, target, transition), fade))
}

fn random_heading<R: Rng>(rng: &mut R) -> Vec3 {
    loop {
        let candidate = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        let length_sq = candidate.length_squared();
        if length_sq > 1.0e-4 && length_sq <= 1.0 {
            return candidate / length_sq.sqrt();
        }
    }
}
