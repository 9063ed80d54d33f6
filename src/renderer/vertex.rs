//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::sim::{FruitColor, Variant};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
    pub const ORANGE: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const YELLOW: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const PURPLE: [f32; 4] = [0.5, 0.0, 0.5, 1.0];
    pub const MAGENTA: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
    pub const BROWN: [f32; 4] = [0.65, 0.16, 0.16, 1.0];
    pub const LIGHT_BLUE: [f32; 4] = [0.68, 0.85, 0.9, 1.0];
    /// Outside the play field when the window aspect differs
    pub const LETTERBOX: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

/// Fill color for a fruit
pub fn fruit_rgba(color: FruitColor) -> [f32; 4] {
    match color {
        FruitColor::Red => colors::RED,
        FruitColor::Green => colors::GREEN,
        FruitColor::Orange => colors::ORANGE,
        FruitColor::Yellow => colors::YELLOW,
        FruitColor::Purple => colors::PURPLE,
        FruitColor::Magenta => colors::MAGENTA,
    }
}

/// Per-variant look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: [f32; 4],
    pub basket: [f32; 4],
    pub hud_text: [f32; 4],
    /// Full-field dimming behind the game over text
    pub overlay: Option<[f32; 4]>,
    pub game_over_title: [f32; 4],
    pub game_over_text: [f32; 4],
}

impl Theme {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Self {
                background: colors::WHITE,
                basket: colors::BLUE,
                hud_text: colors::BLACK,
                overlay: None,
                game_over_title: colors::RED,
                game_over_text: colors::BLACK,
            },
            Variant::Arcade => Self {
                background: colors::LIGHT_BLUE,
                basket: colors::BROWN,
                hud_text: colors::BLACK,
                overlay: Some([0.0, 0.0, 0.0, 150.0 / 255.0]),
                game_over_title: colors::WHITE,
                game_over_text: colors::WHITE,
            },
        }
    }
}
