/// View builders for the gallery window

pub mod grid;
pub mod viewer;
