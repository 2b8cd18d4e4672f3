//! Asset loading
//!
//! Sprites are referenced by a static relative path such as `waymark/a@3x.png`. Loading is
//! async; a failure is a `Resource` error and is never retried.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{OverlayError, OverlayResult};
use crate::renderer::Texture;

/// Static reference to an image asset, relative to the asset root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetRef(pub &'static str);

impl AssetRef {
    pub fn path(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[allow(async_fn_in_trait)]
pub trait AssetLoader {
    async fn load(&self, asset: &AssetRef) -> OverlayResult<Texture>;
}

/// Preloaded textures keyed by reference
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetLoader {
    textures: HashMap<AssetRef, Texture>,
}

impl MemoryAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: AssetRef, texture: Texture) {
        self.textures.insert(asset, texture);
    }

    pub fn with(mut self, asset: AssetRef, texture: Texture) -> Self {
        self.insert(asset, texture);
        self
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl AssetLoader for MemoryAssetLoader {
    async fn load(&self, asset: &AssetRef) -> OverlayResult<Texture> {
        self.textures
            .get(asset)
            .cloned()
            .ok_or_else(|| OverlayError::resource(format!("asset '{asset}' is not loaded")))
    }
}

/// Decodes PNG files below a root directory
#[derive(Debug, Clone)]
pub struct FsAssetLoader {
    root: PathBuf,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, asset: &AssetRef) -> PathBuf {
        self.root.join(asset.path())
    }
}

impl AssetLoader for FsAssetLoader {
    async fn load(&self, asset: &AssetRef) -> OverlayResult<Texture> {
        let path = self.resolve(asset);
        let bytes = std::fs::read(&path).map_err(|e| {
            OverlayError::resource(format!("read asset '{}': {e}", path.display()))
        })?;
        let image = image::load_from_memory(&bytes).map_err(|e| {
            OverlayError::resource(format!("decode asset '{}': {e}", path.display()))
        })?;
        let texture = Texture::from_rgba_image(&image.to_rgba8())?;
        log::debug!(
            "loaded asset '{asset}' ({}x{})",
            texture.width(),
            texture.height()
        );
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgba8;

    const DOT: AssetRef = AssetRef("test/dot.png");

    #[test]
    fn test_memory_loader() {
        let tex = Texture::solid(2, 2, Rgba8::new(9, 9, 9, 9)).unwrap();
        let loader = MemoryAssetLoader::new().with(DOT, tex.clone());
        assert_eq!(pollster::block_on(loader.load(&DOT)).unwrap(), tex);
        let missing = pollster::block_on(loader.load(&AssetRef("nope.png")));
        assert!(matches!(missing, Err(OverlayError::Resource(_))));
    }

    #[test]
    fn test_fs_loader_decodes_png() {
        let dir = std::env::temp_dir().join(format!("aoe-overlay-assets-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("test")).unwrap();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
        img.save(dir.join(DOT.path())).unwrap();

        let loader = FsAssetLoader::new(&dir);
        let tex = pollster::block_on(loader.load(&DOT)).unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(tex.pixel(0, 0), Some(Rgba8::new(255, 0, 0, 255)));

        let err = pollster::block_on(loader.load(&AssetRef("test/missing.png"))).unwrap_err();
        assert!(err.to_string().starts_with("resource error:"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
