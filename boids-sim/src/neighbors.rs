use crate::boid::Boid;
use crate::neighbor_grid::NeighborGrid;

/// `vision_angle_deg` is the half-angle around the current heading.
pub fn find_neighbours<'a>(
    boid: &Boid,
    population: &'a [Boid],
    radius: f32,
    vision_angle_deg: f32,
) -> Vec<&'a Boid> {
    let vision_cos = vision_angle_deg.to_radians().cos();
    population
        .iter()
        .filter(|other| is_visible(boid, other, radius, vision_cos))
        .collect()
}

pub fn find_neighbours_in_grid<'a>(
    boid: &Boid,
    population: &'a [Boid],
    grid: &NeighborGrid,
    radius: f32,
    vision_angle_deg: f32,
) -> Vec<&'a Boid> {
    let vision_cos = vision_angle_deg.to_radians().cos();
    let mut candidates = Vec::new();
    grid.for_each_candidate(boid.position(), radius, |j| candidates.push(j));
    // Population order keeps rule sums bit-identical to the brute-force path.
    candidates.sort_unstable();

    candidates
        .into_iter()
        .filter_map(|j| population.get(j))
        .filter(|other| is_visible(boid, other, radius, vision_cos))
        .collect()
}

fn is_visible(boid: &Boid, other: &Boid, radius: f32, vision_cos: f32) -> bool {
    let offset = other.position() - boid.position();
    let distance = offset.length();
    if distance <= 0.0 || distance >= radius {
        return false;
    }
    // Comparing cosines avoids acos; the clamp keeps drift past +-1 harmless.
    let cos_angle = boid.direction().dot(offset / distance).clamp(-1.0, 1.0);
    cos_angle >= vision_cos
}
