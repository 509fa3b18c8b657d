use std::num::NonZeroU64;

use bevy::render::render_resource::{
    BindGroupLayoutEntry, BindingType, BufferBindingType, ShaderStages,
};

use crate::error::LayoutError;
use crate::gpu::ffi::{PARTICLE_STRIDE, VIEWPORT_SIZE_BYTES};
use crate::gpu::layout::{PARTICLE_LAYOUT, VIEWPORT_LAYOUT};

// Published values. Append new slots, never renumber.
pub const PARTICLES_SLOT: u32 = 0;
pub const VIEWPORT_SIZE_SLOT: u32 = 1;

/// Bind group every point sprite resource lives in.
pub const POINT_SPRITE_GROUP: u32 = 0;

/// Which resource occupies which binding index, on both sides of the boundary.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSlot {
    Particles = PARTICLES_SLOT,
    ViewportSize = VIEWPORT_SIZE_SLOT,
}

impl BindingSlot {
    pub const ALL: [BindingSlot; 2] = [BindingSlot::Particles, BindingSlot::ViewportSize];

    pub const fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.index() == index)
    }

    /// Variable name of the resource in the generated shader module.
    pub const fn wgsl_name(self) -> &'static str {
        match self {
            BindingSlot::Particles => "particles",
            BindingSlot::ViewportSize => "viewport_size",
        }
    }

    /// Store type, named after the manifest of the record it holds.
    pub fn wgsl_type(self) -> String {
        match self {
            BindingSlot::Particles => format!("array<{}>", PARTICLE_LAYOUT.name),
            BindingSlot::ViewportSize => VIEWPORT_LAYOUT.name.to_string(),
        }
    }

    /// `var<...> name: type` part of the shader declaration.
    pub fn wgsl_var(self) -> String {
        let space = match self {
            BindingSlot::Particles => "storage, read",
            BindingSlot::ViewportSize => "uniform",
        };
        format!("var<{space}> {}: {}", self.wgsl_name(), self.wgsl_type())
    }

    pub const fn wgsl_const_name(self) -> &'static str {
        match self {
            BindingSlot::Particles => "PARTICLES_SLOT",
            BindingSlot::ViewportSize => "VIEWPORT_SIZE_SLOT",
        }
    }

    // both are only read while expanding sprites
    pub fn visibility(self) -> ShaderStages {
        ShaderStages::VERTEX
    }

    pub fn buffer_binding_type(self) -> BufferBindingType {
        match self {
            BindingSlot::Particles => BufferBindingType::Storage { read_only: true },
            BindingSlot::ViewportSize => BufferBindingType::Uniform,
        }
    }

    pub fn min_binding_size(self) -> Option<NonZeroU64> {
        let bytes = match self {
            BindingSlot::Particles => PARTICLE_STRIDE,
            BindingSlot::ViewportSize => VIEWPORT_SIZE_BYTES,
        };
        NonZeroU64::new(bytes as u64)
    }

    pub fn layout_entry(self) -> BindGroupLayoutEntry {
        BindGroupLayoutEntry {
            binding: self.index(),
            visibility: self.visibility(),
            ty: BindingType::Buffer {
                ty: self.buffer_binding_type(),
                has_dynamic_offset: false,
                min_binding_size: self.min_binding_size(),
            },
            count: None,
        }
    }
}

/// Layout: 0 = particles SSBO, 1 = viewport size UBO
pub fn bind_group_layout_entries() -> Vec<BindGroupLayoutEntry> {
    BindingSlot::ALL.into_iter().map(BindingSlot::layout_entry).collect()
}

/// Pipeline-setup check of a layout against the registry.
///
/// Collisions, omissions, foreign indices and a wrong buffer kind are all
/// reported before any draw is issued. A `min_binding_size` of `None` is
/// accepted, any other value must match the record size.
pub fn validate_layout_entries(entries: &[BindGroupLayoutEntry]) -> Result<(), LayoutError> {
    let mut seen: Vec<u32> = Vec::with_capacity(entries.len());

    for entry in entries {
        if seen.contains(&entry.binding) {
            return Err(LayoutError::DuplicateBinding {
                binding: entry.binding,
            });
        }
        seen.push(entry.binding);

        let slot =
            BindingSlot::from_index(entry.binding).ok_or(LayoutError::UnknownBinding(entry.binding))?;

        let BindingType::Buffer {
            ty,
            min_binding_size,
            ..
        } = entry.ty
        else {
            return Err(LayoutError::BindingType { slot });
        };
        if ty != slot.buffer_binding_type() {
            return Err(LayoutError::BindingType { slot });
        }
        if min_binding_size.is_some() && min_binding_size != slot.min_binding_size() {
            return Err(LayoutError::MinBindingSize {
                slot,
                expected: slot.min_binding_size().map(NonZeroU64::get),
                found: min_binding_size.map(NonZeroU64::get),
            });
        }
    }

    for slot in BindingSlot::ALL {
        if !seen.contains(&slot.index()) {
            return Err(LayoutError::MissingBinding(slot));
        }
    }
    Ok(())
}
