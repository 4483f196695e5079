use bevy::prelude::*;

mod game;

use game::GamePlugin;

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.60, 0.80, 0.95)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 80.0,
            affects_lightmapped_meshes: false,
        })
        .add_plugins(DefaultPlugins)
        .add_plugins(terrain::TerrainPlugin {
            config: terrain::TerrainConfig {
                seed: 20260806,
                grid_size: 512,
            },
        })
        .add_plugins(GamePlugin)
        .run();
}
