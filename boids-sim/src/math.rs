use glam::{Mat4, Vec3};

pub fn normalize(v: Vec3) -> Vec3 {
    let length = v.length();
    if length == 0.0 {
        return v;
    }
    v / length
}

pub fn clamp_unit(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    clamp_unit(a.dot(b)).acos()
}

pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Spherical interpolation between unit vectors `a` and `b`.
///
/// Degenerate for exactly antiparallel inputs: the orthogonal component
/// vanishes and the result collapses onto `a * cos(theta)`. Callers that can
/// see antiparallel headings nudge `a` off-axis first.
pub fn slerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    let cos_theta = clamp_unit(a.dot(b));
    let theta = cos_theta.acos() * t;
    let orthogonal = normalize(b - a * cos_theta);
    a * theta.cos() + orthogonal * theta.sin()
}

/// A zero axis yields the identity.
pub fn rotation_about_axis(axis: Vec3, angle_radians: f32) -> Mat4 {
    let axis = normalize(axis);
    if axis == Vec3::ZERO {
        return Mat4::IDENTITY;
    }
    Mat4::from_axis_angle(axis, angle_radians)
}

pub fn placement(position: Vec3, rotation: Mat4) -> Mat4 {
    Mat4::from_translation(position) * rotation
}
