use std::fmt::Write as _;

use bevy::render::render_resource::BlendState;
use glam::Vec2;

use crate::gpu::ffi::{GpuParticle, ViewportSize};

/// Straight alpha: src * a + dst * (1 - a), alpha accumulates the same way.
pub const SPRITE_BLEND: BlendState = BlendState::ALPHA_BLENDING;

// two triangles, unit quad centred on the particle
pub const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-0.5, -0.5],
    [0.5, -0.5],
    [0.5, 0.5],
    [-0.5, -0.5],
    [0.5, 0.5],
    [-0.5, 0.5],
];

pub const VERTICES_PER_SPRITE: u32 = QUAD_CORNERS.len() as u32;

/// Host-space position (origin top-left, y down) to normalized device
/// coordinates. An axis with zero extent maps to 0 instead of dividing by it.
pub fn to_ndc(position: Vec2, viewport: ViewportSize) -> Vec2 {
    let (w, h) = (viewport.width(), viewport.height());
    let x = if w > 0.0 { position.x / w * 2.0 - 1.0 } else { 0.0 };
    let y = if h > 0.0 { 1.0 - position.y / h * 2.0 } else { 0.0 };
    Vec2::new(x, y)
}

/// NDC corners of the sprite, in the order the vertex shader emits them.
pub fn sprite_corners(particle: &GpuParticle, viewport: ViewportSize) -> [Vec2; 6] {
    let center = particle.position();
    QUAD_CORNERS.map(|c| to_ndc(center + Vec2::from_array(c) * particle.size, viewport))
}

/// Device twin of [`to_ndc`] and [`sprite_corners`], appended to the layout module.
pub fn sprite_math_wgsl() -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "const QUAD_CORNERS: array<vec2<f32>, {VERTICES_PER_SPRITE}> = array<vec2<f32>, {VERTICES_PER_SPRITE}>("
    );
    for [x, y] in QUAD_CORNERS {
        let _ = writeln!(out, "    vec2<f32>({x:?}, {y:?}),");
    }
    out.push_str(");\n\n");
    out.push_str(
        r#"fn position_to_ndc(position: vec2<f32>, viewport: vec2<f32>) -> vec2<f32> {
    let has_extent = viewport > vec2<f32>(0.0);
    let safe = select(vec2<f32>(1.0), viewport, has_extent);
    let ndc = vec2<f32>(position.x / safe.x * 2.0 - 1.0, 1.0 - position.y / safe.y * 2.0);
    return select(vec2<f32>(0.0), ndc, has_extent);
}

fn quad_corner(vertex: u32) -> vec2<f32> {
    var corners = QUAD_CORNERS;
    return corners[vertex % 6u];
}

fn sprite_corner_ndc(particle: Particle, viewport: vec2<f32>, vertex: u32) -> vec2<f32> {
    return position_to_ndc(particle.position + quad_corner(vertex) * particle.size, viewport);
}
"#,
    );
    out
}
