use std::mem::{align_of, offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use static_assertions::const_assert_eq;

// ---------------- Types ----------------

/// One point-sprite particle as the shader sees it.
///
/// Field order is the contract. `color` is a `vec4<f32>` on the device and
/// needs 16-byte alignment there, so bytes 12..16 are explicit padding and
/// the host struct carries the same alignment.
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuParticle {
    // not using glam to make sure WGSL compatibility
    pub position: [f32; 2],
    pub size: f32, // diameter, same units as position
    pub _pad: f32,
    pub color: [f32; 4], // straight alpha
}

/// Payload of the viewport-size slot: render target width and height.
#[repr(C, align(8))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ViewportSize {
    pub size: [f32; 2],
}

pub const PARTICLE_STRIDE: usize = 32;
pub const POSITION_OFFSET: usize = 0;
pub const SIZE_OFFSET: usize = 8;
pub const COLOR_OFFSET: usize = 16;
pub const PARTICLE_ALIGN: usize = 16;
pub const VIEWPORT_SIZE_BYTES: usize = 8;

const_assert_eq!(size_of::<GpuParticle>(), PARTICLE_STRIDE);
const_assert_eq!(offset_of!(GpuParticle, position), POSITION_OFFSET);
const_assert_eq!(offset_of!(GpuParticle, size), SIZE_OFFSET);
const_assert_eq!(offset_of!(GpuParticle, color), COLOR_OFFSET);
const_assert_eq!(align_of::<GpuParticle>(), PARTICLE_ALIGN);
const_assert_eq!(size_of::<ViewportSize>(), VIEWPORT_SIZE_BYTES);

// ---------------- Implementations ----------------

impl GpuParticle {
    /// Builds a record the way a producer must: `size` never goes below zero.
    pub fn new(position: Vec2, size: f32, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            size: non_negative(size),
            _pad: 0.0,
            color: color.to_array(),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    pub fn color(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }

    pub fn is_degenerate(&self) -> bool {
        self.size == 0.0
    }
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: [non_negative(width), non_negative(height)],
        }
    }

    pub fn width(&self) -> f32 {
        self.size[0]
    }

    pub fn height(&self) -> f32 {
        self.size[1]
    }
}

// NaN falls to zero as well (f32::max ignores NaN)
#[inline]
fn non_negative(v: f32) -> f32 {
    v.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_size_is_never_stored() {
        let p = GpuParticle::new(Vec2::ZERO, -3.0, Vec4::ONE);
        assert_eq!(p.size, 0.0);
        assert!(p.is_degenerate());

        let p = GpuParticle::new(Vec2::ZERO, f32::NAN, Vec4::ONE);
        assert_eq!(p.size, 0.0);
    }

    #[test]
    fn padding_is_zeroed() {
        let p = GpuParticle::new(Vec2::new(1.0, 2.0), 4.0, Vec4::new(0.1, 0.2, 0.3, 0.4));
        assert_eq!(p._pad, 0.0);
        assert_eq!(p.position(), Vec2::new(1.0, 2.0));
        assert_eq!(p.color(), Vec4::new(0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn color_is_not_clamped() {
        let p = GpuParticle::new(Vec2::ZERO, 1.0, Vec4::new(2.0, -1.0, 0.5, 1.5));
        assert_eq!(p.color, [2.0, -1.0, 0.5, 1.5]);
    }

    #[test]
    fn viewport_is_non_negative() {
        let v = ViewportSize::new(-800.0, f32::NAN);
        assert_eq!(v.size, [0.0, 0.0]);
        let v = ViewportSize::new(800.0, 600.0);
        assert_eq!((v.width(), v.height()), (800.0, 600.0));
    }
}
