use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;

use crate::types::{HeightClassifier, LayerBandsFile};

#[derive(Asset, TypePath, Debug, Clone)]
pub struct LayerBandsAsset(pub LayerBandsFile);

#[derive(Default)]
pub struct LayerBandsAssetLoader;

impl AssetLoader for LayerBandsAssetLoader {
    type Asset = LayerBandsAsset;
    type Settings = ();
    type Error = String;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| format!("failed to read asset bytes: {e}"))?;

        let text = std::str::from_utf8(&bytes)
            .map_err(|e| format!("layer bands asset was not valid utf-8: {e}"))?;

        let parsed: LayerBandsFile =
            ron::from_str(text).map_err(|e| format!("failed to parse layer bands ron: {e}"))?;

        // Reject malformed band tables at load time, before generation runs.
        HeightClassifier::from_bands(&parsed).map_err(|e| e.to_string())?;

        Ok(LayerBandsAsset(parsed))
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}
