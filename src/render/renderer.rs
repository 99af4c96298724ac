use std::collections::BTreeSet;

use glam::{Mat4, Vec4};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine},
        Block, BorderType, Borders, Paragraph,
    },
    Frame,
};

use super::sink::{Mesh, SceneBuffer};
use crate::game::Rgb;
use crate::metrics::GameMetrics;

/// Paints the last recorded scene as a wireframe on a braille canvas
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, scene: &SceneBuffer, metrics: &GameMetrics, paused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(scene, metrics), chunks[0]);

        let board_area = square_area(chunks[1]);
        frame.render_widget(self.render_board(scene, paused), board_area);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_board<'a>(
        &self,
        scene: &SceneBuffer,
        paused: bool,
    ) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
        let lines = wireframe(scene.meshes());
        let title = if paused { " Cube Snake (paused) " } else { " Cube Snake " };

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(title),
            )
            .marker(Marker::Braille)
            .x_bounds([-1.0, 1.0])
            .y_bounds([-1.0, 1.0])
            .paint(move |ctx| {
                for line in &lines {
                    ctx.draw(line);
                }
            })
    }

    fn render_stats(&self, scene: &SceneBuffer, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scene.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Rounds: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to turn | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest centred area that looks square, given cells twice as tall as wide
fn square_area(area: Rect) -> Rect {
    let height = area.height.min(area.width / 2);
    let width = height * 2;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Project a world-space vertex to normalised device x, y.
/// Vertices behind the camera yield `None`.
pub fn project(projection: &Mat4, vertex: [f32; 3]) -> Option<(f64, f64)> {
    let clip = *projection * Vec4::new(vertex[0], vertex[1], vertex[2], 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    Some(((clip.x / clip.w) as f64, (clip.y / clip.w) as f64))
}

/// Canvas lines for the unique triangle edges of every mesh
pub fn wireframe(meshes: &[Mesh]) -> Vec<CanvasLine> {
    let mut lines = Vec::new();

    for mesh in meshes {
        let color = to_color(mesh.color);
        let points: Vec<_> = (0..mesh.vertex_count)
            .map(|i| project(&mesh.projection, mesh.vertex(i)))
            .collect();

        let mut edges = BTreeSet::new();
        for [a, b, c] in mesh.mode.triangles(mesh.vertex_count) {
            for (i, j) in [(a, b), (b, c), (a, c)] {
                edges.insert((i.min(j), i.max(j)));
            }
        }

        for (i, j) in edges {
            if let (Some((x1, y1)), Some((x2, y2))) = (points[i], points[j]) {
                if (x1, y1) != (x2, y2) {
                    lines.push(CanvasLine::new(x1, y1, x2, y2, color));
                }
            }
        }
    }

    lines
}

fn to_color(rgb: Rgb) -> Color {
    let [r, g, b] = rgb.to_u8();
    Color::Rgb(r, g, b)
}
