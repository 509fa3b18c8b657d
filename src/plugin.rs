use bevy::asset::weak_handle;
use bevy::prelude::*;

use crate::gpu::bindings::{bind_group_layout_entries, validate_layout_entries};
use crate::gpu::frame::ParticleFrame;
use crate::gpu::layout::{layout_module_source, verify_all};

/// Generated `point_sprites::layout` module.
pub const POINT_SPRITE_LAYOUT_SHADER: Handle<Shader> =
    weak_handle!("5d0c6f3a-93b1-4f7e-9c1d-2a8e4b7f6c15");

/// Asset path of the sprite shader that imports the layout module.
pub const POINT_SPRITE_SHADER_PATH: &str = "shaders/point_sprites.wgsl";

pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSpriteConfig {
    pub capacity: usize, // records per frame
}

impl PointSpriteConfig {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl Default for PointSpriteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// Plugin

pub struct PointSpritePlugin;

impl Plugin for PointSpritePlugin {
    fn build(&self, app: &mut App) {
        // fail at setup, never at draw time
        if let Err(err) =
            verify_all().and_then(|()| validate_layout_entries(&bind_group_layout_entries()))
        {
            panic!("point sprite layout check failed: {err}");
        }

        let config = *app
            .world_mut()
            .get_resource_or_insert_with(PointSpriteConfig::default);
        app.insert_resource(ParticleFrame::with_capacity(config.capacity));
        info!("particle frame READY ({} records)", config.capacity);

        // headless apps have no shader assets
        let Some(mut shaders) = app.world_mut().get_resource_mut::<Assets<Shader>>() else {
            info!("no Assets<Shader>, layout module not registered");
            return;
        };
        shaders.insert(
            &POINT_SPRITE_LAYOUT_SHADER,
            Shader::from_wgsl(layout_module_source(), "point_sprites/layout.wgsl"),
        );
        info!("point_sprites::layout shader is READY");
    }
}
