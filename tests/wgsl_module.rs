use std::mem::{align_of, offset_of, size_of};

use bevy_point_sprites::gpu::bindings::{BindingSlot, POINT_SPRITE_GROUP};
use bevy_point_sprites::gpu::ffi::{GpuParticle, ViewportSize};
use bevy_point_sprites::gpu::layout::layout_module_source;
use naga::proc::{Alignment, Layouter};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Handle, Module, Type, TypeInner};

// naga_oil directives are not WGSL
fn compile_layout_module() -> Module {
    let src: String = layout_module_source()
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| format!("{line}\n"))
        .collect();
    let module = naga::front::wgsl::parse_str(&src).expect("generated module parses");
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .expect("generated module validates");
    module
}

fn struct_named(module: &Module, name: &str) -> Handle<Type> {
    module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some(name))
        .map(|(handle, _)| handle)
        .unwrap_or_else(|| panic!("no struct {name} in the generated module"))
}

fn member_offsets(module: &Module, handle: Handle<Type>) -> Vec<usize> {
    match &module.types[handle].inner {
        TypeInner::Struct { members, .. } => {
            members.iter().map(|m| m.offset as usize).collect()
        }
        other => panic!("expected a struct, found {other:?}"),
    }
}

#[test]
fn compiler_agrees_with_host_particle() {
    let module = compile_layout_module();
    let mut layouter = Layouter::default();
    layouter.update(module.to_ctx()).unwrap();

    let particle = struct_named(&module, "Particle");
    assert_eq!(
        member_offsets(&module, particle),
        vec![
            offset_of!(GpuParticle, position),
            offset_of!(GpuParticle, size),
            offset_of!(GpuParticle, color),
        ]
    );
    assert_eq!(layouter[particle].size as usize, size_of::<GpuParticle>());
    assert_eq!(
        layouter[particle].alignment,
        Alignment::new(align_of::<GpuParticle>() as u32).unwrap()
    );
}

#[test]
fn compiler_agrees_with_host_viewport() {
    let module = compile_layout_module();
    let mut layouter = Layouter::default();
    layouter.update(module.to_ctx()).unwrap();

    let viewport = struct_named(&module, "ViewportSize");
    assert_eq!(member_offsets(&module, viewport), vec![offset_of!(ViewportSize, size)]);
    assert_eq!(layouter[viewport].size as usize, size_of::<ViewportSize>());
}

#[test]
fn resources_sit_at_their_registry_slots() {
    let module = compile_layout_module();

    for slot in BindingSlot::ALL {
        let (_, global) = module
            .global_variables
            .iter()
            .find(|(_, g)| g.name.as_deref() == Some(slot.wgsl_name()))
            .unwrap_or_else(|| panic!("{slot:?} is not declared"));
        let binding = global.binding.as_ref().expect("resource has a binding");
        assert_eq!(binding.group, POINT_SPRITE_GROUP);
        assert_eq!(binding.binding, slot.index());
    }
}
