use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use glam::Vec3;

use crate::assets::LayerBandsAsset;
use crate::generator::TerrainGenerator;
use crate::heightfield::HeightField;
use crate::mesh::TerrainMeshData;
use crate::types::{HeightClassifier, TerrainConfig};

#[derive(Component)]
pub struct Terrain;

#[derive(Resource, Clone)]
pub struct LayerBandsHandle(pub Handle<LayerBandsAsset>);

/// The synthesized height grid, kept around after the mesh is spawned so the
/// viewer can sample surface height (camera focus follows the terrain).
#[derive(Resource)]
pub struct TerrainHeights(pub HeightField);

/// How the normalized [-1, 1] terrain footprint maps into world space.
#[derive(Resource, Clone, Copy, Debug)]
pub struct TerrainRenderSettings {
    /// World half-extent of the footprint on x and z.
    pub world_extent: f32,
    /// World scale applied to elevations.
    pub height_scale: f32,
}

impl Default for TerrainRenderSettings {
    fn default() -> Self {
        Self {
            world_extent: 120.0,
            height_scale: 40.0,
        }
    }
}

pub fn setup_terrain(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle: Handle<LayerBandsAsset> = asset_server.load("layers.ron");
    commands.insert_resource(LayerBandsHandle(handle));
}

pub fn finish_terrain_spawn(
    mut commands: Commands,
    handle: Option<Res<LayerBandsHandle>>,
    assets: Res<Assets<LayerBandsAsset>>,
    config: Res<TerrainConfig>,
    settings: Res<TerrainRenderSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(handle) = handle else {
        return;
    };

    let Some(asset) = assets.get(&handle.0) else {
        return;
    };

    commands.remove_resource::<LayerBandsHandle>();

    // The loader already validated the bands, but the asset may have been
    // handed over by other means.
    let classifier = match HeightClassifier::from_bands(&asset.0) {
        Ok(classifier) => classifier,
        Err(err) => {
            error!("terrain layer bands rejected: {err}");
            return;
        }
    };

    let generator = TerrainGenerator::new(config.clone());
    let terrain = match generator.generate(&classifier) {
        Ok(terrain) => terrain,
        Err(err) => {
            error!("terrain generation failed: {err}");
            return;
        }
    };

    info!(
        "generated terrain: {0}x{0} grid, {1} vertices",
        config.grid_size,
        terrain.mesh.vertex_count()
    );

    let mesh_handle = meshes.add(mesh_from_terrain_mesh_data(&terrain.mesh));
    let material = materials.add(StandardMaterial {
        perceptual_roughness: 1.0,
        ..default()
    });

    commands.spawn((
        Terrain,
        Mesh3d(mesh_handle),
        MeshMaterial3d(material),
        Transform::from_scale(Vec3::new(
            settings.world_extent,
            settings.height_scale,
            settings.world_extent,
        )),
    ));
    commands.insert_resource(TerrainHeights(terrain.field));
}

/// Pack the attribute arrays into a non-indexed triangle-list mesh. Vertex
/// colors carry the flat classification; the texture-blend weights stay on
/// the data side until a splat-map material consumes them.
fn mesh_from_terrain_mesh_data(data: &TerrainMeshData) -> Mesh {
    let positions: Vec<[f32; 3]> = data
        .positions
        .iter()
        .map(|&[x, y, z, _w]| [x, y, z])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, data.colors.clone());
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, data.tex_coords.clone());
    mesh
}
