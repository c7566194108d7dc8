//! Image dimension loading.
//!
//! Adding a spritesheet only needs the natural pixel size of its image. The
//! [`ImageLoader`] trait is the single await point of the crate.
//!
//! - [`MemoryImageLoader`] – answers from a url → size table
//! - [`FileImageLoader`] – reads image headers from disk (`image-loader` feature)

use rustc_hash::FxHashMap;

use crate::error::{Result, SpriteError};

/// Natural pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[allow(async_fn_in_trait)]
pub trait ImageLoader {
    /// Resolve once the image at `url` is decoded, or fail with
    /// [`SpriteError::ImageLoad`].
    async fn load(&self, url: &str) -> Result<ImageSize>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryImageLoader {
    images: FxHashMap<String, ImageSize>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(url, width, height);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, width: u32, height: u32) {
        self.images.insert(url.into(), ImageSize::new(width, height));
    }
}

impl ImageLoader for MemoryImageLoader {
    async fn load(&self, url: &str) -> Result<ImageSize> {
        self.images
            .get(url)
            .copied()
            .ok_or_else(|| SpriteError::ImageLoad {
                url: url.to_string(),
                reason: "no such image".to_string(),
            })
    }
}

#[cfg(feature = "image-loader")]
pub use file::FileImageLoader;

#[cfg(feature = "image-loader")]
mod file {
    use std::path::PathBuf;

    use super::{ImageLoader, ImageSize};
    use crate::error::{Result, SpriteError};

    /// Reads image dimensions from files, resolving urls against `root`.
    #[derive(Debug, Clone, Default)]
    pub struct FileImageLoader {
        root: PathBuf,
    }

    impl FileImageLoader {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    impl ImageLoader for FileImageLoader {
        async fn load(&self, url: &str) -> Result<ImageSize> {
            let path = self.root.join(url);
            let (width, height) =
                image::image_dimensions(&path).map_err(|e| SpriteError::ImageLoad {
                    url: url.to_string(),
                    reason: e.to_string(),
                })?;
            Ok(ImageSize { width, height })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader_hit_and_miss() {
        let loader = MemoryImageLoader::new().with_image("hero.png", 128, 64);
        assert_eq!(
            pollster::block_on(loader.load("hero.png")),
            Ok(ImageSize::new(128, 64))
        );
        assert!(matches!(
            pollster::block_on(loader.load("missing.png")),
            Err(SpriteError::ImageLoad { .. })
        ));
    }

    #[cfg(feature = "image-loader")]
    #[test]
    fn test_file_loader_missing_file() {
        let loader = FileImageLoader::new(std::env::temp_dir());
        let result = pollster::block_on(loader.load("spritedom-does-not-exist.png"));
        assert!(matches!(result, Err(SpriteError::ImageLoad { .. })));
    }
}
