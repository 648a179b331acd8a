/// Manifest rebuild
///
/// Walks `<root>/media/<category>`, renumbers the files of each category to
/// `1.ext`, `2.ext`, ... (lowercased extensions) and writes the resulting
/// `media_manifest.json`. Renaming problems never abort the run: the file
/// keeps its original name in the manifest.
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{GalleryConfig, DEFAULT_CATEGORIES};
use crate::error::{GalleryError, Result};
use crate::state::manifest::Manifest;

/// Summary of a rebuild run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub manifest_path: PathBuf,
    pub renamed: usize,
    pub kept: usize,
    pub failed: usize,
    pub created_dirs: usize,
}

/// Rebuild and write the manifest for the gallery at `config.root`
pub fn rebuild_manifest(config: &GalleryConfig) -> Result<(Manifest, RebuildReport)> {
    let media_dir = config.media_dir();
    let mut report = RebuildReport {
        manifest_path: config.manifest_path(),
        ..RebuildReport::default()
    };
    let mut manifest = Manifest::new();

    info!("Starting gallery update in {}", media_dir.display());

    for category in categories(&media_dir) {
        let category_dir = media_dir.join(&category);

        if !category_dir.is_dir() {
            fs::create_dir_all(&category_dir).map_err(|source| GalleryError::Io {
                path: category_dir.clone(),
                source,
            })?;
            info!("Created directory: {}", category_dir.display());
            report.created_dirs += 1;
            manifest.insert(category, Vec::new());
            continue;
        }

        debug!("Processing category: {} ({})", category, category_dir.display());
        let files = renumber_category(&category_dir, &mut report)?;
        manifest.insert(category, files);
    }

    let json = manifest.to_json_pretty()?;
    fs::write(&report.manifest_path, json).map_err(|source| GalleryError::Io {
        path: report.manifest_path.clone(),
        source,
    })?;

    info!(
        "Gallery manifest updated: {} renamed, {} kept, {} failed. Saved to {}",
        report.renamed,
        report.kept,
        report.failed,
        report.manifest_path.display()
    );

    Ok((manifest, report))
}

/// Default categories first, then any other existing subdirectory by name
fn categories(media_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();

    let mut extra: Vec<String> = WalkDir::new(media_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.') && !names.contains(name))
        .collect();
    extra.sort();

    names.extend(extra);
    names
}

/// Rename the files of one category and return their final names in order
fn renumber_category(dir: &Path, report: &mut RebuildReport) -> Result<Vec<String>> {
    // Visible regular files only, sorted for a consistent numbering
    let files: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();

    let mut result = Vec::with_capacity(files.len());

    for (i, file_name) in files.into_iter().enumerate() {
        let new_name = numbered_name(i + 1, &file_name);
        let old_path = dir.join(&file_name);
        let new_path = dir.join(&new_name);

        if file_name == new_name {
            debug!("File already correctly named: {}", new_name);
            report.kept += 1;
            result.push(new_name);
            continue;
        }

        if new_path.exists() {
            warn!(
                "Could not rename '{}' to '{}': target already exists",
                file_name, new_name
            );
            report.failed += 1;
            result.push(file_name);
            continue;
        }

        match fs::rename(&old_path, &new_path) {
            Ok(()) => {
                debug!("Renamed: {} -> {}", file_name, new_name);
                report.renamed += 1;
                result.push(new_name);
            }
            Err(e) => {
                warn!(
                    "Could not rename '{}' to '{}': {}. Is it open in another program?",
                    file_name, new_name, e
                );
                report.failed += 1;
                result.push(file_name);
            }
        }
    }

    Ok(result)
}

/// `<n><ext lowercased>`, keeping the dot; names without an extension get none
fn numbered_name(n: usize, file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) => format!("{}.{}", n, ext.to_string_lossy().to_lowercase()),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(root: &Path) -> GalleryConfig {
        GalleryConfig {
            root: root.to_path_buf(),
            ..GalleryConfig::default()
        }
    }

    fn touch(path: PathBuf) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name(1, "Clip.MP4"), "1.mp4");
        assert_eq!(numbered_name(12, "a.b.PNG"), "12.png");
        assert_eq!(numbered_name(3, "README"), "3");
    }

    #[test]
    fn test_rebuild_renames_and_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("media");
        touch(media.join("wins").join("b.PNG"));
        touch(media.join("wins").join("a.mp4"));
        touch(media.join("wins").join(".hidden"));
        touch(media.join("extra").join("z.gif"));

        let (manifest, report) = rebuild_manifest(&config_for(dir.path())).unwrap();

        assert_eq!(manifest.files("wins").unwrap(), ["1.mp4", "2.png"]);
        assert!(media.join("wins").join("1.mp4").exists());
        assert!(media.join("wins").join("2.png").exists());
        assert!(media.join("wins").join(".hidden").exists());

        // Missing defaults are created empty, extra directories follow them
        let names: Vec<_> = manifest.category_names().collect();
        assert_eq!(
            names,
            ["wins", "losses", "funny", "toxic", "hackers", "glitch_abuser", "history", "extra"]
        );
        assert!(media.join("history").is_dir());
        assert_eq!(manifest.files("losses").unwrap().len(), 0);
        assert_eq!(manifest.files("extra").unwrap(), ["1.gif"]);
        assert_eq!(report.created_dirs, 6);
        assert_eq!(report.renamed, 3);

        let written = fs::read_to_string(dir.path().join("media_manifest.json")).unwrap();
        assert_eq!(Manifest::from_json(&written).unwrap(), manifest);
        assert!(written.contains("\n    \"wins\": [\n        \"1.mp4\""));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path().join("media").join("funny").join("x.jpg"));

        let config = config_for(dir.path());
        let (first, _) = rebuild_manifest(&config).unwrap();
        let (second, report) = rebuild_manifest(&config).unwrap();

        assert_eq!(first, second);
        assert_eq!(report.renamed, 0);
        assert_eq!(report.kept, 1);
        assert_eq!(report.created_dirs, 0);
    }

    #[test]
    fn test_taken_target_keeps_original_name() {
        let dir = tempfile::tempdir().unwrap();
        let toxic = dir.path().join("media").join("toxic");
        // Sorted: "1.jpg", "10.jpg", "2.jpg" -> "10.jpg" would become "2.jpg"
        touch(toxic.join("1.jpg"));
        touch(toxic.join("10.jpg"));
        touch(toxic.join("2.jpg"));

        let (manifest, report) = rebuild_manifest(&config_for(dir.path())).unwrap();

        assert_eq!(manifest.files("toxic").unwrap(), ["1.jpg", "10.jpg", "3.jpg"]);
        assert_eq!(report.failed, 1);
        assert!(toxic.join("10.jpg").exists());
        assert!(toxic.join("3.jpg").exists());
    }
}
