use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::FlockError;

pub const MAX_POPULATION: usize = 3_000;
pub const MAX_SPEED: f32 = 100.0;
pub const MAX_VISION_RANGE: f32 = 15.0;
pub const MAX_VISION_ANGLE_DEG: f32 = 180.0;
pub const MAX_RULE_STRENGTH: f32 = 5.0;
pub const MIN_SPAWN_ATTEMPTS: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    #[default]
    BruteForce,
    Grid,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationBounds {
    pub min: Vec3,
    pub max: Vec3,
    pub edge_margin: f32,
}

impl Default for SimulationBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-100.0, 0.0, -100.0),
            max: Vec3::new(100.0, 50.0, 100.0),
            edge_margin: 2.0,
        }
    }
}

impl SimulationBounds {
    pub fn interior(&self) -> (Vec3, Vec3) {
        let margin = Vec3::splat(self.edge_margin.max(0.0));
        (self.min + margin, self.max - margin)
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn validate(&self) -> Result<(), FlockError> {
        let (lower, upper) = self.interior();
        let finite = self.min.is_finite() && self.max.is_finite() && self.edge_margin.is_finite();
        if !finite || !lower.cmplt(upper).all() {
            return Err(FlockError::InvalidBounds {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub population: usize,
    pub speed: f32,
    pub vision_range: f32,
    /// Half-angle of the field of view around the heading.
    pub vision_angle_deg: f32,
    pub cohesion_strength: f32,
    pub alignment_strength: f32,
    pub separation_strength: f32,
    pub edge_strength: f32,
    pub obstacle_strength: f32,
    /// Fraction of the per-tick movement used as the heading blend weight.
    pub turn_sharpness: f32,
    pub normalize_edge_push: bool,
    pub neighbor_search: NeighborSearch,
    pub spawn_attempts: u32,
    pub rng_seed: Option<u64>,
    pub bounds: SimulationBounds,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            population: 1_000,
            speed: 40.0,
            vision_range: 12.0,
            vision_angle_deg: 150.0,
            cohesion_strength: 1.0,
            alignment_strength: 1.0,
            separation_strength: 3.0,
            edge_strength: 2.0,
            obstacle_strength: 3.0,
            turn_sharpness: 0.2,
            normalize_edge_push: false,
            neighbor_search: NeighborSearch::BruteForce,
            spawn_attempts: 10_000,
            rng_seed: None,
            bounds: SimulationBounds::default(),
        }
    }
}

impl FlockConfig {
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        self.population = self.population.min(MAX_POPULATION);
        self.speed = clamp_finite(self.speed, 0.0, MAX_SPEED, defaults.speed);
        self.vision_range =
            clamp_finite(self.vision_range, 0.0, MAX_VISION_RANGE, defaults.vision_range);
        self.vision_angle_deg = clamp_finite(
            self.vision_angle_deg,
            0.0,
            MAX_VISION_ANGLE_DEG,
            defaults.vision_angle_deg,
        );
        self.cohesion_strength = clamp_finite(
            self.cohesion_strength,
            0.0,
            MAX_RULE_STRENGTH,
            defaults.cohesion_strength,
        );
        self.alignment_strength = clamp_finite(
            self.alignment_strength,
            0.0,
            MAX_RULE_STRENGTH,
            defaults.alignment_strength,
        );
        self.separation_strength = clamp_finite(
            self.separation_strength,
            0.0,
            MAX_RULE_STRENGTH,
            defaults.separation_strength,
        );
        self.edge_strength =
            clamp_finite(self.edge_strength, 0.0, MAX_RULE_STRENGTH, defaults.edge_strength);
        self.obstacle_strength = clamp_finite(
            self.obstacle_strength,
            0.0,
            MAX_RULE_STRENGTH,
            defaults.obstacle_strength,
        );
        self.turn_sharpness = clamp_finite(self.turn_sharpness, 0.0, 1.0, defaults.turn_sharpness);
        self.spawn_attempts = self.spawn_attempts.max(MIN_SPAWN_ATTEMPTS);
    }

    pub fn motion(&self, dt: f32) -> (f32, f32) {
        let movement = dt * self.speed;
        let transition = (movement * self.turn_sharpness).clamp(0.0, 1.0);
        (movement, transition)
    }

    pub fn from_json(json: &str) -> Result<Self, FlockError> {
        let config: Self = serde_json::from_str(json)?;
        config.bounds.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, FlockError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn clamp_finite(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::{FlockConfig, NeighborSearch, SimulationBounds};
    use crate::error::FlockError;
    use glam::Vec3;

    #[test]
    fn sanitize_clamps_and_replaces_non_finite() {
        let mut config = FlockConfig {
            population: 9_000,
            speed: f32::NAN,
            vision_range: -3.0,
            vision_angle_deg: 400.0,
            separation_strength: f32::INFINITY,
            turn_sharpness: 3.0,
            spawn_attempts: 0,
            ..FlockConfig::default()
        };
        config.sanitize();

        assert_eq!(config.population, 3_000);
        assert_eq!(config.speed, 40.0);
        assert_eq!(config.vision_range, 0.0);
        assert_eq!(config.vision_angle_deg, 180.0);
        assert_eq!(config.separation_strength, 3.0);
        assert_eq!(config.turn_sharpness, 1.0);
        assert_eq!(config.spawn_attempts, 1);
    }

    #[test]
    fn sanitize_keeps_defaults_untouched() {
        let mut config = FlockConfig::default();
        config.sanitize();
        assert_eq!(config, FlockConfig::default());
    }

    #[test]
    fn motion_scales_with_frame_time() {
        let config = FlockConfig::default();
        let (movement, transition) = config.motion(0.5);
        assert_eq!(movement, 20.0);
        assert_eq!(transition, 1.0);

        let (movement, transition) = config.motion(1.0 / 100.0);
        assert!((movement - 0.4).abs() < 1.0e-6);
        assert!((transition - 0.08).abs() < 1.0e-6);
    }

    #[test]
    fn bounds_validation_rejects_empty_interior() {
        assert!(SimulationBounds::default().validate().is_ok());

        let squashed = SimulationBounds {
            min: Vec3::ZERO,
            max: Vec3::new(10.0, 3.0, 10.0),
            edge_margin: 2.0,
        };
        assert!(matches!(
            squashed.validate(),
            Err(FlockError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            FlockConfig::from_json(r#"{"speed": 12.5, "neighbor_search": "grid"}"#).unwrap();
        assert_eq!(config.speed, 12.5);
        assert_eq!(config.neighbor_search, NeighborSearch::Grid);
        assert_eq!(config.vision_range, 12.0);

        let restored = FlockConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            FlockConfig::from_json("{speed: fast}"),
            Err(FlockError::Config(_))
        ));
    }
}
