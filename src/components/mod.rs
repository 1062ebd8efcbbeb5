//! Leptos components of the annotator window.

mod file_io;
/// Interactive relationship graph canvas.
pub mod graph_canvas;
mod panes;
mod tabs;
mod toolbar;

pub use panes::{StatusLine, TextPaneView, TreePaneView};
pub use tabs::GraphTabs;
pub use toolbar::Toolbar;
