use bevy::prelude::*;
use bytemuck::Zeroable;

use crate::error::LayoutError;
use crate::gpu::ffi::{GpuParticle, PARTICLE_STRIDE, ViewportSize};

// ==================== resources ======================================

/// Host-resident copy of one frame's particles plus the viewport uniform.
///
/// Storage is allocated once at `capacity` and reused every frame; only the
/// first `len()` records are live and uploaded.
#[derive(Resource, Debug, Clone)]
pub struct ParticleFrame {
    particles: Vec<GpuParticle>,
    count: usize,
    viewport: ViewportSize,
}

// =====================================================================

impl ParticleFrame {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: vec![GpuParticle::zeroed(); capacity],
            count: 0,
            viewport: ViewportSize::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn particles(&self) -> &[GpuParticle] {
        &self.particles[..self.count]
    }

    /// Hands every slot to `body`, which returns how many it filled.
    /// Counts past the capacity are clamped.
    pub fn update<F>(&mut self, body: F)
    where
        F: FnOnce(&mut [GpuParticle]) -> usize,
    {
        let count = body(&mut self.particles);
        if count > self.particles.len() {
            warn!(
                "particle frame: {} particles written, capacity is {}",
                count,
                self.particles.len()
            );
        }
        self.count = count.min(self.particles.len());
    }

    pub fn push(&mut self, particle: GpuParticle) -> Result<(), LayoutError> {
        let Some(slot) = self.particles.get_mut(self.count) else {
            return Err(LayoutError::FrameFull {
                capacity: self.particles.len(),
            });
        };
        *slot = particle;
        self.count += 1;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = ViewportSize::new(width, height);
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Bytes for the particles slot. Zero-copy view of the live records.
    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.particles())
    }

    /// Bytes for the viewport-size slot.
    pub fn viewport_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.viewport)
    }
}

// ========================== readback =================================

/// Record count of a particle byte buffer.
pub fn record_count(bytes: &[u8]) -> Result<usize, LayoutError> {
    if bytes.len() % PARTICLE_STRIDE != 0 {
        return Err(LayoutError::MisalignedBuffer {
            len: bytes.len(),
            stride: PARTICLE_STRIDE,
        });
    }
    Ok(bytes.len() / PARTICLE_STRIDE)
}

/// Reads record `index` at `index * PARTICLE_STRIDE`. The buffer does not
/// need to be aligned.
pub fn read_particle(bytes: &[u8], index: usize) -> Result<GpuParticle, LayoutError> {
    let count = record_count(bytes)?;
    if index >= count {
        return Err(LayoutError::IndexOutOfBounds { index, count });
    }
    let start = index * PARTICLE_STRIDE;
    Ok(bytemuck::pod_read_unaligned(
        &bytes[start..start + PARTICLE_STRIDE],
    ))
}

/// Reads one f32 at `index * PARTICLE_STRIDE + offset`, the way a shader
/// addresses a member.
pub fn read_field_f32(bytes: &[u8], index: usize, offset: usize) -> Result<f32, LayoutError> {
    if offset > PARTICLE_STRIDE - 4 {
        return Err(LayoutError::FieldOutOfRecord {
            offset,
            stride: PARTICLE_STRIDE,
        });
    }
    let count = record_count(bytes)?;
    if index >= count {
        return Err(LayoutError::IndexOutOfBounds { index, count });
    }
    let start = index * PARTICLE_STRIDE + offset;
    Ok(bytemuck::pod_read_unaligned(&bytes[start..start + 4]))
}
