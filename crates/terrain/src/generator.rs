use crate::heightfield::HeightField;
use crate::mesh::{TerrainMeshData, build_terrain_mesh};
use crate::types::{HeightClassifier, TerrainConfig, TerrainError};

/// The finished product of one generation run: the synthesized height grid
/// and the mesh attribute arrays derived from it. Read-only from here on.
pub struct GeneratedTerrain {
    pub field: HeightField,
    pub mesh: TerrainMeshData,
}

/// Facade over the whole pipeline: validate the config, synthesize the
/// height field, run the mesh derivation pass.
pub struct TerrainGenerator {
    config: TerrainConfig,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, classifier: &HeightClassifier) -> Result<GeneratedTerrain, TerrainError> {
        self.config.validate()?;

        let field = HeightField::synthesize(self.config.grid_size, self.config.seed)?;
        let mesh = build_terrain_mesh(&field, classifier);

        Ok(GeneratedTerrain { field, mesh })
    }
}
