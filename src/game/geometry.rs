//! Cube geometry for grid cells
//!
//! Every occupied cell (snake segment, apple, wall block) is drawn as the same
//! small cube. The grid spans the world square [-1, 1] x [-1, 1], with grid
//! row 0 at the top, and every cube sits at a fixed depth in front of the
//! camera.

use super::state::Position;

/// Vertices emitted per cube: 6 faces of 4 vertices
pub const VERTICES_PER_CUBE: usize = 24;

/// Floats emitted per cube
pub const FLOATS_PER_CUBE: usize = VERTICES_PER_CUBE * 3;

/// Maps grid cells to world-space cubes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeGeometry {
    grid_size: i32,
    depth: f32,
}

impl CubeGeometry {
    pub fn new(grid_size: i32, depth: f32) -> Self {
        Self { grid_size, depth }
    }

    /// Edge length of one cube in world units
    pub fn cell_size(&self) -> f32 {
        2.0 / self.grid_size as f32
    }

    /// The 24 vertices of the cube for `cell`, as a flat x, y, z sequence.
    ///
    /// Faces come in the order front, back, top, bottom, left, right; each
    /// face is four vertices wound for triangle-strip drawing.
    #[rustfmt::skip]
    pub fn cube(&self, cell: Position) -> [f32; FLOATS_PER_CUBE] {
        let size = self.grid_size as f32;
        let x = (cell.x as f32 / size) * 2.0 - 1.0;
        let y = (cell.y as f32 / size) * -2.0 + 1.0;
        let z = self.depth;
        let l = self.cell_size();

        let (x1, y1, z1) = (x + l, y - l, z + l);

        [
            // front
            x, y, z, x1, y, z, x, y1, z, x1, y1, z,
            // back
            x, y, z1, x1, y, z1, x, y1, z1, x1, y1, z1,
            // top
            x, y, z1, x1, y, z1, x, y, z, x1, y, z,
            // bottom
            x, y1, z1, x1, y1, z1, x, y1, z, x1, y1, z,
            // left
            x, y, z1, x, y, z, x, y1, z1, x, y1, z,
            // right
            x1, y, z, x1, y, z1, x1, y1, z, x1, y1, z1,
        ]
    }

    /// Concatenate the cubes of `cells` in iteration order
    pub fn mesh<I>(&self, cells: I) -> Vec<f32>
    where
        I: IntoIterator<Item = Position>,
    {
        let cells = cells.into_iter();
        let mut buffer = Vec::with_capacity(cells.size_hint().0 * FLOATS_PER_CUBE);
        for cell in cells {
            buffer.extend_from_slice(&self.cube(cell));
        }
        buffer
    }
}

impl Default for CubeGeometry {
    fn default() -> Self {
        Self::new(50, -1.05)
    }
}
