/// The gallery manifest: category name -> ordered list of filenames
///
/// Category order follows the key order of the JSON document, so the
/// manifest is stored as a list of pairs rather than a hash map.
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::ManifestLoadError;
use super::data::MediaItem;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    categories: Vec<(String, Vec<String>)>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category; a repeated name replaces the earlier entry in place
    pub fn insert(&mut self, category: impl Into<String>, files: Vec<String>) {
        let category = category.into();
        match self.categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = files,
            None => self.categories.push((category, files)),
        }
    }

    /// Category names in manifest order
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    pub fn files(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, files)| files.as_slice())
    }

    /// Media items of one category, in manifest order
    pub fn items(&self, category: &str) -> Vec<MediaItem> {
        self.files(category)
            .unwrap_or_default()
            .iter()
            .map(|file| MediaItem::new(category, file.as_str()))
            .collect()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.files(category).is_some()
    }

    /// Total number of files across all categories
    pub fn file_count(&self) -> usize {
        self.categories.iter().map(|(_, files)| files.len()).sum()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize with 4-space indentation, matching hand-edited manifests
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for (name, files) in &self.categories {
            map.serialize_entry(name, files)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping category names to arrays of filenames")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Manifest, A::Error> {
                let mut manifest = Manifest::new();
                // A `null` category is kept as an empty one
                while let Some((name, files)) =
                    access.next_entry::<String, Option<Vec<String>>>()?
                {
                    if manifest.contains(&name) {
                        return Err(de::Error::custom(format!("duplicate category `{}`", name)));
                    }
                    manifest.insert(name, files.unwrap_or_default());
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

/// Read and parse the manifest at `path`
///
/// This is the only suspension point of the gallery view; it runs once per
/// gallery root and is never retried.
pub async fn load_manifest(path: PathBuf) -> Result<Manifest, ManifestLoadError> {
    tracing::debug!("Reading manifest from {}", path.display());

    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| ManifestLoadError::from_io(path.clone(), e))?;

    let manifest = Manifest::from_json(&json).map_err(|e| ManifestLoadError::Parse {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    tracing::info!(
        "Media manifest loaded: {} categories, {} files",
        manifest.category_names().count(),
        manifest.file_count()
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order_is_preserved() {
        let manifest =
            Manifest::from_json(r#"{"zeta": ["1.png"], "alpha": [], "mid": ["2.mp4", "1.gif"]}"#)
                .unwrap();

        let names: Vec<_> = manifest.category_names().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(manifest.files("mid").unwrap(), ["2.mp4", "1.gif"]);
        assert_eq!(manifest.files("alpha").unwrap().len(), 0);
        assert_eq!(manifest.file_count(), 3);
        assert!(manifest.files("missing").is_none());
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(Manifest::from_json(r#"["a.png"]"#).is_err());
        assert!(Manifest::from_json(r#"{"wins": "a.png"}"#).is_err());
        assert!(Manifest::from_json(r#"{"wins": [1, 2]}"#).is_err());
        assert!(Manifest::from_json(r#"{"wins": [], "wins": []}"#).is_err());
    }

    #[test]
    fn test_null_category_is_empty() {
        let manifest = Manifest::from_json(r#"{"wins": ["a.png"], "losses": null}"#).unwrap();

        let names: Vec<_> = manifest.category_names().collect();
        assert_eq!(names, ["wins", "losses"]);
        assert_eq!(manifest.files("losses").unwrap().len(), 0);
        assert_eq!(manifest.file_count(), 1);
    }

    #[test]
    fn test_pretty_output_uses_four_spaces() {
        let mut manifest = Manifest::new();
        manifest.insert("wins", vec!["1.png".into()]);
        manifest.insert("losses", vec![]);

        let json = manifest.to_json_pretty().unwrap();
        assert_eq!(
            json,
            "{\n    \"wins\": [\n        \"1.png\"\n    ],\n    \"losses\": []\n}"
        );
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }

    #[test]
    fn test_items_carry_category() {
        let manifest = Manifest::from_json(r#"{"wins": ["a.png", "b.mp4"]}"#).unwrap();
        assert_eq!(
            manifest.items("wins"),
            vec![MediaItem::new("wins", "a.png"), MediaItem::new("wins", "b.mp4")]
        );
        assert!(manifest.items("losses").is_empty());
    }

    #[tokio::test]
    async fn test_load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("media_manifest.json");

        let missing = load_manifest(path.clone()).await.unwrap_err();
        assert!(matches!(missing, ManifestLoadError::NotFound { .. }));

        std::fs::write(&path, "{ not json").unwrap();
        let malformed = load_manifest(path.clone()).await.unwrap_err();
        assert!(matches!(malformed, ManifestLoadError::Parse { .. }));

        std::fs::write(&path, r#"{"wins": ["a.png"]}"#).unwrap();
        let manifest = load_manifest(path).await.unwrap();
        assert_eq!(manifest.files("wins").unwrap(), ["a.png"]);
    }
}
