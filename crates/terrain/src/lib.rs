pub mod assets;
pub mod generator;
pub mod heightfield;
pub mod mesh;
pub mod render;
pub mod types;

pub use generator::{GeneratedTerrain, TerrainGenerator};
pub use heightfield::HeightField;
pub use mesh::{TerrainMeshData, build_terrain_mesh};
pub use render::{TerrainHeights, TerrainRenderSettings};
pub use types::{
    HeightClassifier, LAYER_COUNT, LayerBandsFile, TerrainConfig, TerrainError, TerrainLayer,
};

use bevy::prelude::*;

pub struct TerrainPlugin {
    pub config: types::TerrainConfig,
}

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<render::TerrainRenderSettings>()
            .init_asset::<assets::LayerBandsAsset>()
            .init_asset_loader::<assets::LayerBandsAssetLoader>()
            .add_systems(Startup, render::setup_terrain)
            .add_systems(Update, render::finish_terrain_spawn);
    }
}
