//! Obstacle presets.

use glam::Vec3;

use crate::obstacle::Obstacle;

const REEF_BOXES: [([f32; 3], [f32; 3]); 17] = [
    // West arcade pillars and lintel.
    ([-15.2, 18.0, 5.0], [4.0, 24.0, 4.0]),
    ([-15.2, 18.0, -25.0], [4.0, 24.0, 4.0]),
    ([-15.2, 18.0, -55.0], [4.0, 24.0, 4.0]),
    ([-15.2, 42.6, -24.0], [4.0, 2.0, 38.0]),
    // Statue.
    ([-15.2, 0.0, 35.0], [4.0, 5.0, 4.0]),
    ([-15.2, 4.0, 57.0], [4.0, 8.0, 4.0]),
    ([-15.2, 0.1, 49.9], [4.0, 4.6, 3.1]),
    ([-9.0, -3.0, 44.0], [3.5, 3.0, 12.0]),
    ([-15.2, 18.0, 65.0], [4.0, 24.0, 4.0]),
    // East arcade.
    ([67.5, 18.0, -55.0], [4.0, 24.0, 4.0]),
    ([46.0, -2.5, -26.0], [26.0, 4.0, 4.0]),
    ([67.5, 7.6, 5.0], [4.0, 13.5, 4.0]),
    ([67.5, 18.0, 35.0], [4.0, 24.0, 4.0]),
    ([67.5, 42.6, 48.0], [4.0, 2.0, 23.0]),
    ([67.5, 17.0, 65.0], [4.0, 24.0, 4.0]),
    // Rocks.
    ([-62.8, 2.4, -20.0], [7.0, 9.0, 10.0]),
    ([-60.9, -2.3, 10.0], [9.3, 3.7, 7.0]),
];

const REEF_SPHERES: [([f32; 3], f32); 3] = [
    ([26.5, 1.0, -56.0], 9.0),
    ([-60.0, -8.0, -58.0], 35.0),
    ([-68.0, -8.7, 40.0], 29.0),
];

pub fn reef() -> Vec<Obstacle> {
    let boxes = REEF_BOXES
        .iter()
        .map(|&(center, half)| Obstacle::cuboid(Vec3::from_array(center), Vec3::from_array(half)));
    let spheres = REEF_SPHERES
        .iter()
        .map(|&(center, radius)| Obstacle::sphere(Vec3::from_array(center), radius));
    boxes.chain(spheres).collect()
}
