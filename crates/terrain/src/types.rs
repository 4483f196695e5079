use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

// --- Errors ---

#[derive(Error, Debug)]
pub enum TerrainError {
    /// The synthesis recursion only terminates when the grid side halves
    /// down to 1, so the side length must be a power of two.
    #[error("grid size {0} is not a power of two of at least 2")]
    GridSize(usize),
    #[error("invalid layer bands: {0}")]
    InvalidBands(String),
}

// --- Config ---

#[derive(Resource, Clone, Debug)]
pub struct TerrainConfig {
    pub seed: u64,
    pub grid_size: usize,
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.grid_size < 2 || !self.grid_size.is_power_of_two() {
            return Err(TerrainError::GridSize(self.grid_size));
        }
        Ok(())
    }
}

// --- Terrain layers ---

/// Ordered surface layers. The discriminant is the channel index in a
/// texture-blend weight vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerrainLayer {
    Water = 0,
    Grass = 1,
    Rock = 2,
    Snow = 3,
}

pub const LAYER_COUNT: usize = 4;

impl TerrainLayer {
    pub fn channel(self) -> usize {
        self as usize
    }

    /// Unit blend vector selecting exactly this layer.
    pub fn one_hot(self) -> [f32; LAYER_COUNT] {
        let mut weights = [0.0; LAYER_COUNT];
        weights[self.channel()] = 1.0;
        weights
    }
}

// --- Height band tables ---

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct ColorBand {
    /// Select this band if height < below.
    pub below: f32,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct BlendThresholds {
    pub water_below: f32,
    pub grass_below: f32,
    pub rock_below: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LayerBandsFile {
    pub color_bands: Vec<ColorBand>,
    pub fallback_color: [f32; 4],
    pub blend_thresholds: BlendThresholds,
}

impl Default for LayerBandsFile {
    fn default() -> Self {
        Self {
            color_bands: vec![
                ColorBand {
                    below: 0.01,
                    color: [0.0, 0.2, 1.0, 1.0],
                },
                ColorBand {
                    below: 0.05,
                    color: [0.0, 1.0, 0.0, 1.0],
                },
                // The top two bands share a color on purpose; the table keeps
                // them separate so a data change can split them.
                ColorBand {
                    below: 0.2,
                    color: [1.0, 1.0, 1.0, 1.0],
                },
            ],
            fallback_color: [1.0, 1.0, 1.0, 1.0],
            blend_thresholds: BlendThresholds {
                water_below: 0.01,
                grass_below: 0.05,
                rock_below: 0.12,
            },
        }
    }
}

// --- Classifier ---

/// Pure elevation classification: flat color bands and one-hot texture-blend
/// weights. The two threshold sets are independent.
#[derive(Clone, Debug)]
pub struct HeightClassifier {
    color_bands: Vec<ColorBand>,
    fallback_color: [f32; 4],
    blend: BlendThresholds,
}

impl Default for HeightClassifier {
    fn default() -> Self {
        let bands = LayerBandsFile::default();
        Self {
            color_bands: bands.color_bands,
            fallback_color: bands.fallback_color,
            blend: bands.blend_thresholds,
        }
    }
}

impl HeightClassifier {
    pub fn from_bands(bands: &LayerBandsFile) -> Result<Self, TerrainError> {
        validate_bands(bands)?;
        Ok(Self {
            color_bands: bands.color_bands.clone(),
            fallback_color: bands.fallback_color,
            blend: bands.blend_thresholds,
        })
    }

    pub fn color_for(&self, height: f32) -> [f32; 4] {
        for band in &self.color_bands {
            if height < band.below {
                return band.color;
            }
        }
        self.fallback_color
    }

    pub fn layer_for(&self, height: f32) -> TerrainLayer {
        if height < self.blend.water_below {
            TerrainLayer::Water
        } else if height < self.blend.grass_below {
            TerrainLayer::Grass
        } else if height < self.blend.rock_below {
            TerrainLayer::Rock
        } else {
            TerrainLayer::Snow
        }
    }

    pub fn texture_weight_for(&self, height: f32) -> [f32; LAYER_COUNT] {
        self.layer_for(height).one_hot()
    }
}

fn validate_bands(bands: &LayerBandsFile) -> Result<(), TerrainError> {
    if bands.color_bands.is_empty() {
        return Err(TerrainError::InvalidBands(
            "at least one color band is required".to_string(),
        ));
    }

    let mut last = f32::NEG_INFINITY;
    for band in &bands.color_bands {
        if !band.below.is_finite() {
            return Err(TerrainError::InvalidBands(format!(
                "color band threshold {} is not finite",
                band.below
            )));
        }
        if band.below <= last {
            return Err(TerrainError::InvalidBands(format!(
                "color band threshold {} must be strictly greater than {}",
                band.below, last
            )));
        }
        if band.color.iter().any(|c| !c.is_finite()) {
            return Err(TerrainError::InvalidBands(format!(
                "color band below {} has a non-finite component",
                band.below
            )));
        }
        last = band.below;
    }

    if bands.fallback_color.iter().any(|c| !c.is_finite()) {
        return Err(TerrainError::InvalidBands(
            "fallback color has a non-finite component".to_string(),
        ));
    }

    let t = bands.blend_thresholds;
    let ordered = t.water_below.is_finite()
        && t.grass_below.is_finite()
        && t.rock_below.is_finite()
        && t.water_below < t.grass_below
        && t.grass_below < t.rock_below;
    if !ordered {
        return Err(TerrainError::InvalidBands(format!(
            "blend thresholds must be finite and strictly increasing (got {}, {}, {})",
            t.water_below, t.grass_below, t.rock_below
        )));
    }

    Ok(())
}
