//! Layout manifest for every host/device shared struct.
//!
//! The manifest is the single source of truth: the WGSL declarations the
//! shader imports are generated from it, and its host offsets come straight
//! from `offset_of!` on the `#[repr(C)]` types in [`crate::gpu::ffi`].
//! The device side is never computed by hand: each struct has a `ShaderType`
//! twin and encase lays it out with the WGSL rules.

use std::fmt::Write as _;
use std::mem::{align_of, offset_of, size_of};

use bevy::math::{Vec2, Vec4};
use bevy::render::render_resource::ShaderType;
use bevy::render::render_resource::encase::{ShaderSize, StorageBuffer};

use crate::error::LayoutError;
use crate::gpu::bindings::{BindingSlot, POINT_SPRITE_GROUP};
use crate::gpu::ffi::{GpuParticle, ViewportSize};
use crate::gpu::sprite::sprite_math_wgsl;

/// Import path of the generated module, used by `#import` in shaders.
pub const LAYOUT_IMPORT_PATH: &str = "point_sprites::layout";

// ---------------- Device twins ----------------

/// Device view of [`GpuParticle`].
#[derive(ShaderType, Clone, Copy, Debug, Default)]
pub struct ParticleShader {
    pub position: Vec2,
    pub size: f32,
    pub color: Vec4,
}

/// Device view of [`ViewportSize`].
#[derive(ShaderType, Clone, Copy, Debug, Default)]
pub struct ViewportShader {
    pub size: Vec2,
}

// A struct member starts at its own alignment, so placing the twin after a
// lone f32 exposes that alignment through min_size alone.
#[allow(dead_code)]
#[derive(ShaderType)]
struct ParticleAfterScalar {
    lead: f32,
    inner: ParticleShader,
}

#[allow(dead_code)]
#[derive(ShaderType)]
struct ViewportAfterScalar {
    lead: f32,
    inner: ViewportShader,
}

// ---------------- Manifest ----------------

/// WGSL spelling of a member type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WgslType {
    F32,
    Vec2F32,
    Vec4F32,
}

impl WgslType {
    pub const fn name(self) -> &'static str {
        match self {
            WgslType::F32 => "f32",
            WgslType::Vec2F32 => "vec2<f32>",
            WgslType::Vec4F32 => "vec4<f32>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub ty: WgslType,
    pub host_offset: usize,
}

/// Padding fields of the host struct are not listed; WGSL inserts them.
#[derive(Debug, Clone, Copy)]
pub struct StructLayout {
    pub name: &'static str,
    pub fields: &'static [FieldLayout],
    pub host_size: usize,
    pub host_align: usize,
    /// Layout encase assigns to the `ShaderType` twin.
    pub device: fn() -> Result<DeviceLayout, LayoutError>,
}

/// Offsets, alignment and size on the device side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLayout {
    pub offsets: Vec<usize>,
    pub align: usize,
    pub size: usize,
}

pub const PARTICLE_LAYOUT: StructLayout = StructLayout {
    name: "Particle",
    fields: &[
        FieldLayout {
            name: "position",
            ty: WgslType::Vec2F32,
            host_offset: offset_of!(GpuParticle, position),
        },
        FieldLayout {
            name: "size",
            ty: WgslType::F32,
            host_offset: offset_of!(GpuParticle, size),
        },
        FieldLayout {
            name: "color",
            ty: WgslType::Vec4F32,
            host_offset: offset_of!(GpuParticle, color),
        },
    ],
    host_size: size_of::<GpuParticle>(),
    host_align: align_of::<GpuParticle>(),
    device: particle_device_layout,
};

pub const VIEWPORT_LAYOUT: StructLayout = StructLayout {
    name: "ViewportSize",
    fields: &[FieldLayout {
        name: "size",
        ty: WgslType::Vec2F32,
        host_offset: offset_of!(ViewportSize, size),
    }],
    host_size: size_of::<ViewportSize>(),
    host_align: align_of::<ViewportSize>(),
    device: viewport_device_layout,
};

// ---------------- Device layouts through encase ----------------

/// Bytes encase writes for `value` into a storage buffer.
pub fn encode_device<T>(value: &T) -> Result<Vec<u8>, LayoutError>
where
    T: ShaderType + bevy::render::render_resource::encase::internal::WriteInto,
{
    let mut buffer = StorageBuffer::new(Vec::<u8>::new());
    buffer
        .write(value)
        .map_err(|err| LayoutError::Encode(err.to_string()))?;
    Ok(buffer.into_inner())
}

// Offset of the first 4-byte word holding `value`; sentinels are unique.
fn offset_of_value(bytes: &[u8], value: f32) -> usize {
    let needle = value.to_le_bytes();
    bytes
        .chunks_exact(4)
        .position(|word| word == needle)
        .map_or(bytes.len(), |word| word * 4)
}

fn particle_device_layout() -> Result<DeviceLayout, LayoutError> {
    let sentinel = ParticleShader {
        position: Vec2::new(1.0, 2.0),
        size: 3.0,
        color: Vec4::new(4.0, 5.0, 6.0, 7.0),
    };
    let bytes = encode_device(&sentinel)?;
    let size = ParticleShader::SHADER_SIZE.get();

    Ok(DeviceLayout {
        offsets: vec![
            offset_of_value(&bytes, 1.0),
            offset_of_value(&bytes, 3.0),
            offset_of_value(&bytes, 4.0),
        ],
        align: (ParticleAfterScalar::min_size().get() - size) as usize,
        size: size as usize,
    })
}

fn viewport_device_layout() -> Result<DeviceLayout, LayoutError> {
    let sentinel = ViewportShader {
        size: Vec2::new(1.0, 2.0),
    };
    let bytes = encode_device(&sentinel)?;
    let size = ViewportShader::SHADER_SIZE.get();

    Ok(DeviceLayout {
        offsets: vec![offset_of_value(&bytes, 1.0)],
        align: (ViewportAfterScalar::min_size().get() - size) as usize,
        size: size as usize,
    })
}

impl StructLayout {
    pub fn device_layout(&self) -> Result<DeviceLayout, LayoutError> {
        (self.device)()
    }

    pub fn verify(&self) -> Result<(), LayoutError> {
        let device = self.device_layout()?;

        for (field, &offset) in self.fields.iter().zip(&device.offsets) {
            if field.host_offset != offset {
                return Err(LayoutError::FieldOffsetMismatch {
                    strukt: self.name,
                    field: field.name,
                    host: field.host_offset,
                    device: offset,
                });
            }
        }
        if self.host_size != device.size {
            return Err(LayoutError::StructSizeMismatch {
                strukt: self.name,
                host: self.host_size,
                device: device.size,
            });
        }
        if self.host_align != device.align {
            return Err(LayoutError::StructAlignMismatch {
                strukt: self.name,
                host: self.host_align,
                device: device.align,
            });
        }
        Ok(())
    }

    pub fn wgsl_declaration(&self) -> String {
        let mut out = format!("struct {} {{\n", self.name);
        for field in self.fields {
            let _ = writeln!(out, "    {}: {},", field.name, field.ty.name());
        }
        out.push_str("}\n");
        out
    }
}

/// Checks every shared struct. Cheap enough to run at plugin build.
pub fn verify_all() -> Result<(), LayoutError> {
    PARTICLE_LAYOUT.verify()?;
    VIEWPORT_LAYOUT.verify()
}

/// Full source of the `point_sprites::layout` shader module.
pub fn layout_module_source() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#define_import_path {LAYOUT_IMPORT_PATH}");
    for layout in [PARTICLE_LAYOUT, VIEWPORT_LAYOUT] {
        out.push('\n');
        out.push_str(&layout.wgsl_declaration());
    }
    out.push('\n');

    for slot in BindingSlot::ALL {
        let _ = writeln!(out, "const {}: u32 = {}u;", slot.wgsl_const_name(), slot.index());
    }
    out.push('\n');

    for slot in BindingSlot::ALL {
        let _ = writeln!(
            out,
            "@group({POINT_SPRITE_GROUP}) @binding({}) {};",
            slot.index(),
            slot.wgsl_var()
        );
    }
    out.push('\n');
    out.push_str(&sprite_math_wgsl());
    out
}
