use glam::{Mat4, Vec3};

/// Clearance added around spheres so boids turn before touching the surface.
pub const SPHERE_MARGIN: f32 = 2.0;
/// Clearance added on every side of a box.
pub const BOX_MARGIN: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxObstacle {
    pub center: Vec3,
    pub half_extents: Vec3,
    lower: Vec3,
    upper: Vec3,
}

impl BoxObstacle {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        let inflated = half_extents.abs() + Vec3::splat(BOX_MARGIN);
        Self {
            center,
            half_extents,
            lower: center - inflated,
            upper: center + inflated,
        }
    }

    pub fn corners(&self) -> (Vec3, Vec3) {
        (self.lower, self.upper)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Obstacle {
    Sphere(SphereObstacle),
    Box(BoxObstacle),
}

impl Obstacle {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(SphereObstacle { center, radius })
    }

    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        Self::Box(BoxObstacle::new(center, half_extents))
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Sphere(sphere) => sphere.center,
            Self::Box(cuboid) => cuboid.center,
        }
    }

    pub fn is_colliding(&self, point: Vec3) -> bool {
        match self {
            Self::Sphere(sphere) => point.distance(sphere.center) < sphere.radius + SPHERE_MARGIN,
            Self::Box(cuboid) => {
                let (lower, upper) = cuboid.corners();
                point.cmpge(lower).all() && point.cmple(upper).all()
            }
        }
    }

    pub fn transform(&self) -> Mat4 {
        match self {
            Self::Sphere(sphere) => {
                Mat4::from_translation(sphere.center) * Mat4::from_scale(Vec3::splat(sphere.radius))
            }
            Self::Box(cuboid) => {
                Mat4::from_translation(cuboid.center) * Mat4::from_scale(cuboid.half_extents)
            }
        }
    }
}

pub fn any_colliding(obstacles: &[Obstacle], point: Vec3) -> bool {
    obstacles.iter().any(|obstacle| obstacle.is_colliding(point))
}
