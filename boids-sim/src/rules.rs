use glam::Vec3;

use crate::boid::Boid;
use crate::config::SimulationBounds;
use crate::math::normalize;
use crate::obstacle::Obstacle;

pub fn cohesion(boid: &Boid, neighbours: &[&Boid], strength: f32) -> Vec3 {
    let Some(centroid) = mean(neighbours.iter().map(|n| n.position())) else {
        return Vec3::ZERO;
    };
    normalize(centroid - boid.position()) * strength
}

pub fn alignment(neighbours: &[&Boid], strength: f32) -> Vec3 {
    let Some(heading) = mean(neighbours.iter().map(|n| n.direction())) else {
        return Vec3::ZERO;
    };
    normalize(heading) * strength
}

/// Steer away from neighbours closer than half the vision `radius`.
pub fn separation(boid: &Boid, neighbours: &[&Boid], strength: f32, radius: f32) -> Vec3 {
    let inner = radius / 2.0;
    let away = neighbours
        .iter()
        .filter(|n| n.position().distance(boid.position()) < inner)
        .map(|n| boid.position() - n.position());
    let Some(push) = mean(away) else {
        return Vec3::ZERO;
    };
    normalize(push) * strength
}

/// Unit push back toward the interior on every axis where the boid has left it.
pub fn avoid_edges(
    boid: &Boid,
    bounds: &SimulationBounds,
    strength: f32,
    normalize_push: bool,
) -> Vec3 {
    let (lower, upper) = bounds.interior();
    let position = boid.position();
    let mut push = Vec3::ZERO;

    for axis in 0..3 {
        if position[axis] < lower[axis] {
            push[axis] += 1.0;
        } else if position[axis] > upper[axis] {
            push[axis] -= 1.0;
        }
    }

    if normalize_push {
        push = normalize(push);
    }
    push * strength
}

pub fn avoid_obstacles(boid: &Boid, obstacles: &[Obstacle], strength: f32) -> Vec3 {
    let position = boid.position();
    let away: Vec3 = obstacles
        .iter()
        .filter(|obstacle| obstacle.is_colliding(position))
        .map(|obstacle| position - obstacle.position())
        .sum();
    normalize(away) * strength
}

fn mean(values: impl Iterator<Item = Vec3>) -> Option<Vec3> {
    let (sum, count) = values.fold((Vec3::ZERO, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f32)
}
