//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::vertex::Vertex;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Width in pixels of `text` drawn at `scale` pixels per glyph cell
pub fn text_width(text: &str, scale: f32) -> f32 {
    let chars = text.chars().count() as u32;
    if chars == 0 {
        return 0.0;
    }
    (chars * ADVANCE - 1) as f32 * scale
}

/// Height in pixels of one line of text
pub fn text_height(scale: f32) -> f32 {
    GLYPH_HEIGHT as f32 * scale
}

/// Generate vertices for a line of text with its top-left corner at `origin`.
///
/// Every lit glyph cell becomes one `scale`-sized square. Unsupported
/// characters render as blanks.
pub fn text(text: &str, origin: Vec2, scale: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for (i, c) in text.chars().enumerate() {
        let Some(rows) = font::glyph(c) else {
            continue;
        };
        let glyph_x = origin.x + (i as u32 * ADVANCE) as f32 * scale;
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if !font::lit(&rows, col, row) {
                    continue;
                }
                let min = Vec2::new(glyph_x + col as f32 * scale, origin.y + row as f32 * scale);
                vertices.extend(rect(min, min + Vec2::splat(scale), color));
            }
        }
    }

    vertices
}

/// Text horizontally centered on `center_x`
pub fn centered_text(s: &str, center_x: f32, top: f32, scale: f32, color: [f32; 4]) -> Vec<Vertex> {
    let x = center_x - text_width(s, scale) / 2.0;
    text(s, Vec2::new(x, top), scale, color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vertices_on_radius() {
        let verts = circle(Vec2::new(10.0, 10.0), 5.0, [1.0; 4], 16);
        assert_eq!(verts.len(), 48);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 10.0]);
            for v in &tri[1..] {
                let d = Vec2::from(v.position) - Vec2::new(10.0, 10.0);
                assert!((d.length() - 5.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_rect_is_two_triangles_inside_bounds() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [1.0; 4]);
        assert_eq!(verts.len(), 6);
        for v in verts {
            assert!(v.position[0] == 1.0 || v.position[0] == 3.0);
            assert!(v.position[1] == 2.0 || v.position[1] == 4.0);
        }
    }

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 2.0), 0.0);
        assert_eq!(text_width("A", 2.0), 10.0);
        assert_eq!(text_width("AB", 1.0), 11.0);
    }

    #[test]
    fn test_text_one_quad_per_lit_cell() {
        // 'I' has 3 + 5 + 3 lit cells
        let verts = text("I", Vec2::ZERO, 1.0, [1.0; 4]);
        assert_eq!(verts.len(), 11 * 6);
        // Spaces produce nothing
        assert!(text("  ", Vec2::ZERO, 1.0, [1.0; 4]).is_empty());
    }

    #[test]
    fn test_centered_text_is_symmetric() {
        let verts = centered_text("SCORE", 200.0, 0.0, 2.0, [1.0; 4]);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) / 2.0 - 200.0).abs() < 2.0);
    }
}
