use glam::Mat4;

use crate::game::Rgb;

/// How a vertex buffer is assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Every vertex after the second closes a triangle with the two before it
    TriangleStrip,
    /// Independent triangles of three vertices each
    Triangles,
}

impl DrawMode {
    /// Vertex index triples of the triangles described by `vertex_count`
    /// vertices in this mode
    pub fn triangles(&self, vertex_count: usize) -> Vec<[usize; 3]> {
        match self {
            DrawMode::TriangleStrip => (2..vertex_count).map(|i| [i - 2, i - 1, i]).collect(),
            DrawMode::Triangles => (0..vertex_count / 3)
                .map(|t| [3 * t, 3 * t + 1, 3 * t + 2])
                .collect(),
        }
    }
}

/// A single draw request: one entity's geometry with its uniforms
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Flat x, y, z vertex positions
    pub vertices: &'a [f32],
    pub vertex_count: usize,
    pub mode: DrawMode,
    pub projection: Mat4,
    pub color: Rgb,
}

/// Receiver of everything the game wants on screen
pub trait RenderSink {
    /// Called before the first draw of a frame
    fn begin_frame(&mut self) {}

    fn draw(&mut self, call: DrawCall<'_>);

    /// Update the displayed score
    fn show_score(&mut self, score: u32);
}

/// An owned copy of a [`DrawCall`]
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub vertex_count: usize,
    pub mode: DrawMode,
    pub projection: Mat4,
    pub color: Rgb,
}

impl Mesh {
    /// Vertex `index` as (x, y, z)
    pub fn vertex(&self, index: usize) -> [f32; 3] {
        let i = index * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }
}

/// Sink that keeps the draw calls of the last frame in memory.
///
/// The terminal renderer paints from this buffer, and the headless mode and
/// tests inspect it directly.
#[derive(Debug, Clone, Default)]
pub struct SceneBuffer {
    meshes: Vec<Mesh>,
    score: u32,
    frames: u64,
}

impl SceneBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of frames begun so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for SceneBuffer {
    fn begin_frame(&mut self) {
        self.meshes.clear();
        self.frames += 1;
    }

    fn draw(&mut self, call: DrawCall<'_>) {
        let floats = (call.vertex_count * 3).min(call.vertices.len());
        self.meshes.push(Mesh {
            vertices: call.vertices[..floats].to_vec(),
            vertex_count: floats / 3,
            mode: call.mode,
            projection: call.projection,
            color: call.color,
        });
    }

    fn show_score(&mut self, score: u32) {
        self.score = score;
    }
}
