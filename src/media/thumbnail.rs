use image::imageops::FilterType;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Longest edge of generated grid thumbnails
const THUMBNAIL_SIZE: u32 = 320;

/// Get the thumbnail cache directory
/// Returns ~/.cache/media-gallery/thumbnails on Linux
pub fn thumbnail_cache_dir() -> Option<PathBuf> {
    let mut path = dirs_next::cache_dir().or_else(dirs_next::home_dir)?;
    path.push("media-gallery");
    path.push("thumbnails");
    Some(path)
}

/// Cache file name for a source image
///
/// Size and modification time are part of the key so that a file replaced
/// under the same name (the rebuild tool renumbers files) gets a new thumbnail.
pub fn thumbnail_path(cache_dir: &Path, source: &Path) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    if let Ok(meta) = fs::metadata(source) {
        meta.len().hash(&mut hasher);
        meta.modified().ok().hash(&mut hasher);
    }
    cache_dir.join(format!("{:016x}.png", hasher.finish()))
}

/// Generate (or reuse) a thumbnail for one image
/// Returns the path to the cached thumbnail, or None if the image could not be decoded
pub fn generate_thumbnail(source: &Path, cache_dir: &Path) -> Option<PathBuf> {
    let target = thumbnail_path(cache_dir, source);
    if target.exists() {
        return Some(target);
    }

    if let Err(e) = fs::create_dir_all(cache_dir) {
        warn!("Could not create thumbnail cache {}: {}", cache_dir.display(), e);
        return None;
    }

    let img = match image::open(source) {
        Ok(img) => img,
        Err(e) => {
            debug!("Skipping thumbnail for {}: {}", source.display(), e);
            return None;
        }
    };

    let thumbnail = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        img
    };

    match thumbnail.save(&target) {
        Ok(()) => {
            debug!("Generated thumbnail: {}", target.display());
            Some(target)
        }
        Err(e) => {
            warn!("Could not save thumbnail {}: {}", target.display(), e);
            None
        }
    }
}

/// Generate thumbnails for a batch of images off the UI thread
/// Returns (source, thumbnail) pairs for every image that succeeded
pub async fn generate_thumbnails(sources: Vec<PathBuf>) -> Vec<(PathBuf, PathBuf)> {
    let Some(cache_dir) = thumbnail_cache_dir() else {
        warn!("No cache directory available, showing full-size images in the grid");
        return Vec::new();
    };

    // Spawn blocking because decoding and resizing are CPU-bound
    tokio::task::spawn_blocking(move || {
        sources
            .into_iter()
            .filter_map(|source| {
                let thumb = generate_thumbnail(&source, &cache_dir)?;
                Some((source, thumb))
            })
            .collect()
    })
    .await
    .unwrap_or_else(|e| {
        warn!("Thumbnail task failed: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_large_images_are_downscaled() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("big.png");
        ImageBuffer::from_pixel(800, 400, Rgb([200u8, 10, 10]))
            .save(&source)
            .unwrap();

        let cache = dir.path().join("cache");
        let thumb = generate_thumbnail(&source, &cache).unwrap();

        assert!(thumb.starts_with(&cache));
        let decoded = image::open(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 160));

        // Second call reuses the cached file
        assert_eq!(generate_thumbnail(&source, &cache), Some(thumb));
    }

    #[test]
    fn test_small_images_keep_their_size() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("small.png");
        ImageBuffer::from_pixel(16, 8, Rgb([0u8, 0, 0])).save(&source).unwrap();

        let thumb = generate_thumbnail(&source, dir.path()).unwrap();
        let decoded = image::open(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }

    #[test]
    fn test_undecodable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        fs::write(&source, b"not an image").unwrap();

        assert_eq!(generate_thumbnail(&source, dir.path()), None);
        assert_eq!(generate_thumbnail(&dir.path().join("missing.png"), dir.path()), None);
    }

    #[test]
    fn test_cache_names_differ_per_source() {
        let cache = Path::new("/cache");
        let a = thumbnail_path(cache, Path::new("/g/media/wins/1.png"));
        let b = thumbnail_path(cache, Path::new("/g/media/wins/2.png"));
        assert_ne!(a, b);
        assert_eq!(a, thumbnail_path(cache, Path::new("/g/media/wins/1.png")));
    }
}
