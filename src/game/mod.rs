pub mod camera;
pub mod lighting;

use bevy::prelude::*;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(camera::OrbitCameraSettings::default())
            .add_systems(
                Startup,
                (camera::setup_viewer, lighting::setup_sun_light).chain(),
            )
            .add_systems(
                Update,
                (camera::orbit_camera_input, camera::update_orbit_camera).chain(),
            );
    }
}
