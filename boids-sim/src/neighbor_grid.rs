use glam::Vec3;

use crate::boid::Boid;
use crate::config::SimulationBounds;

const MIN_CELL_SIZE: f32 = 1.0e-3;
const MAX_CELLS_PER_AXIS: usize = 64;
const INVALID_INDEX: usize = usize::MAX;

/// Positions outside the bounds land in the nearest edge cell.
pub struct NeighborGrid {
    origin: Vec3,
    cell_size: Vec3,
    dims: [usize; 3],
    head: Vec<usize>,
    next: Vec<usize>,
}

impl Default for NeighborGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl NeighborGrid {
    pub fn new() -> Self {
        Self {
            origin: Vec3::ZERO,
            cell_size: Vec3::ONE,
            dims: [1, 1, 1],
            head: vec![INVALID_INDEX],
            next: Vec::new(),
        }
    }

    pub fn rebuild(&mut self, boids: &[Boid], bounds: &SimulationBounds, radius: f32) {
        self.ensure_layout(boids.len(), bounds, radius);
        self.head.fill(INVALID_INDEX);

        for (i, boid) in boids.iter().enumerate() {
            let cell = self.cell_index(self.cell_coords(boid.position()));
            self.next[i] = self.head[cell];
            self.head[cell] = i;
        }
    }

    pub fn for_each_candidate<F>(&self, position: Vec3, radius: f32, mut callback: F)
    where
        F: FnMut(usize),
    {
        let reach = Vec3::splat(radius.max(0.0));
        let lower = self.cell_coords(position - reach);
        let upper = self.cell_coords(position + reach);

        for z in lower[2]..=upper[2] {
            for y in lower[1]..=upper[1] {
                for x in lower[0]..=upper[0] {
                    let mut candidate = self.head[self.cell_index([x, y, z])];
                    while candidate != INVALID_INDEX {
                        callback(candidate);
                        candidate = self.next[candidate];
                    }
                }
            }
        }
    }

    pub fn cell_count(&self) -> usize {
        self.dims.iter().product()
    }

    fn ensure_layout(&mut self, count: usize, bounds: &SimulationBounds, radius: f32) {
        let extent = bounds.extent().max(Vec3::splat(MIN_CELL_SIZE));
        let floor = extent / MAX_CELLS_PER_AXIS as f32;
        let cell_size = Vec3::splat(radius.max(MIN_CELL_SIZE)).max(floor);
        let dims = [
            ((extent.x / cell_size.x).ceil() as usize).max(1),
            ((extent.y / cell_size.y).ceil() as usize).max(1),
            ((extent.z / cell_size.z).ceil() as usize).max(1),
        ];

        self.origin = bounds.min;
        self.cell_size = cell_size;
        if dims != self.dims {
            self.dims = dims;
            self.head.resize(self.cell_count(), INVALID_INDEX);
        }
        if self.next.len() != count {
            self.next.resize(count, INVALID_INDEX);
        }
    }

    fn cell_coords(&self, position: Vec3) -> [usize; 3] {
        let scaled = (position - self.origin) / self.cell_size;
        [
            clamp_cell(scaled.x, self.dims[0]),
            clamp_cell(scaled.y, self.dims[1]),
            clamp_cell(scaled.z, self.dims[2]),
        ]
    }

    fn cell_index(&self, [x, y, z]: [usize; 3]) -> usize {
        (z * self.dims[1] + y) * self.dims[0] + x
    }
}

fn clamp_cell(scaled: f32, len: usize) -> usize {
    if !scaled.is_finite() || scaled <= 0.0 {
        return 0;
    }
    (scaled.floor() as usize).min(len - 1)
}
