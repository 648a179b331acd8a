/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The gallery manifest and its loader (manifest.rs)
/// - The gallery controller: tabs, active media list, viewer (gallery.rs)

pub mod data;
pub mod gallery;
pub mod manifest;
