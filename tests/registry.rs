use std::num::NonZeroU64;

use bevy::render::render_resource::{
    BindGroupLayoutEntry, BindingType, BufferBindingType, ShaderStages,
};
use bevy_point_sprites::LayoutError;
use bevy_point_sprites::gpu::bindings::{
    BindingSlot, bind_group_layout_entries, validate_layout_entries,
};

fn uniform_entry(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::VERTEX,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[test]
fn entries_follow_the_registry() {
    let entries = bind_group_layout_entries();
    let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
    assert_eq!(bindings, vec![0, 1]);

    match entries[0].ty {
        BindingType::Buffer {
            ty,
            min_binding_size,
            ..
        } => {
            assert_eq!(ty, BufferBindingType::Storage { read_only: true });
            assert_eq!(min_binding_size, NonZeroU64::new(32));
        }
        _ => panic!("particles slot must be a buffer"),
    }
}

#[test]
fn collision_is_reported() {
    let mut entries = bind_group_layout_entries();
    entries.push(uniform_entry(1));
    assert_eq!(
        validate_layout_entries(&entries),
        Err(LayoutError::DuplicateBinding { binding: 1 })
    );
}

#[test]
fn omission_is_reported() {
    let entries = vec![BindingSlot::Particles.layout_entry()];
    assert_eq!(
        validate_layout_entries(&entries),
        Err(LayoutError::MissingBinding(BindingSlot::ViewportSize))
    );
}

#[test]
fn foreign_binding_is_reported() {
    let mut entries = bind_group_layout_entries();
    entries.push(uniform_entry(7));
    assert_eq!(
        validate_layout_entries(&entries),
        Err(LayoutError::UnknownBinding(7))
    );
}

#[test]
fn wrong_record_size_is_reported() {
    let mut entries = bind_group_layout_entries();
    entries[0].ty = BindingType::Buffer {
        ty: BufferBindingType::Storage { read_only: true },
        has_dynamic_offset: false,
        min_binding_size: NonZeroU64::new(28),
    };
    assert_eq!(
        validate_layout_entries(&entries),
        Err(LayoutError::MinBindingSize {
            slot: BindingSlot::Particles,
            expected: Some(32),
            found: Some(28),
        })
    );
}

#[test]
fn unsized_entries_are_accepted() {
    let mut entries = bind_group_layout_entries();
    entries[1] = uniform_entry(1);
    assert_eq!(validate_layout_entries(&entries), Ok(()));
}
