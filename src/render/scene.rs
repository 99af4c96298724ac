use glam::Mat4;

use super::sink::{DrawCall, DrawMode, RenderSink};
use crate::game::{Camera, GameState, VERTICES_PER_CUBE};

/// Right-handed perspective projection with an OpenGL depth range
pub fn projection(camera: &Camera) -> Mat4 {
    Mat4::perspective_rh_gl(camera.fov_y, camera.aspect, camera.near, camera.far)
}

/// Issue one draw call per entity: player, rival, apple, then wall.
///
/// Snake meshes are rebuilt here on every call; the apple and wall hand over
/// the buffers they cache.
pub fn draw_scene<S: RenderSink + ?Sized>(state: &GameState, projection: Mat4, sink: &mut S) {
    sink.begin_frame();

    for snake in [&state.player, &state.rival] {
        let vertices = state.geometry.mesh(snake.segments());
        sink.draw(DrawCall {
            vertices: &vertices,
            vertex_count: snake.len() * VERTICES_PER_CUBE,
            mode: DrawMode::TriangleStrip,
            projection,
            color: snake.color(),
        });
    }

    sink.draw(DrawCall {
        vertices: state.apple.buffer(),
        vertex_count: VERTICES_PER_CUBE,
        mode: DrawMode::TriangleStrip,
        projection,
        color: state.apple.color(),
    });

    sink.draw(DrawCall {
        vertices: state.wall.buffer(),
        vertex_count: state.wall.cells().len() * VERTICES_PER_CUBE,
        mode: DrawMode::TriangleStrip,
        projection,
        color: state.wall.color(),
    });
}
