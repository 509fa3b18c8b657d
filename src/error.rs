use thiserror::Error;

use crate::gpu::bindings::BindingSlot;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("binding {binding} is declared more than once")]
    DuplicateBinding { binding: u32 },

    #[error("no layout entry for the {0:?} slot")]
    MissingBinding(BindingSlot),

    #[error("binding {0} is not part of the point sprite registry")]
    UnknownBinding(u32),

    #[error("{slot:?} slot expects min_binding_size {expected:?}, found {found:?}")]
    MinBindingSize {
        slot: BindingSlot,
        expected: Option<u64>,
        found: Option<u64>,
    },

    #[error("{slot:?} slot has the wrong binding type")]
    BindingType { slot: BindingSlot },

    #[error("{strukt}.{field}: host offset {host} but WGSL offset {device}")]
    FieldOffsetMismatch {
        strukt: &'static str,
        field: &'static str,
        host: usize,
        device: usize,
    },

    #[error("{strukt}: host size {host} but WGSL size {device}")]
    StructSizeMismatch {
        strukt: &'static str,
        host: usize,
        device: usize,
    },

    #[error("{strukt}: host alignment {host} but WGSL alignment {device}")]
    StructAlignMismatch {
        strukt: &'static str,
        host: usize,
        device: usize,
    },

    #[error("encoding the device layout failed: {0}")]
    Encode(String),

    #[error("buffer of {len} bytes is not a whole number of {stride}-byte records")]
    MisalignedBuffer { len: usize, stride: usize },

    #[error("record {index} requested but the buffer holds {count}")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("field offset {offset} is outside the {stride}-byte record")]
    FieldOutOfRecord { offset: usize, stride: usize },

    #[error("frame is full ({capacity} records)")]
    FrameFull { capacity: usize },
}
