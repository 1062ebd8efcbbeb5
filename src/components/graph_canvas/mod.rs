//! Interactive relationship graph canvas.
//!
//! Renders one graph panel on an HTML canvas with:
//! - Circle layout, optionally relaxed by a force simulation
//! - Node selection and Shift+click edge toggling
//! - Pan, zoom, and node dragging interactions
//! - Smooth neighbour highlighting on hover
//!
//! # Example
//!
//! ```ignore
//! use fable_graph::components::graph_canvas::{GraphCanvas, PanelData, Theme};
//!
//! view! {
//!     <GraphCanvas
//!         data=panel_signal
//!         on_gesture=move |g| log::info!("{g:?}")
//!         theme=Theme::default()
//!         width=800.0
//!         height=600.0
//!     />
//! }
//! ```

mod component;
mod render;
/// Zoom-dependent sizing.
pub mod scale;
mod state;
/// Colours and styles.
pub mod theme;
mod types;

pub use component::GraphCanvas;
pub use state::PanelState;
pub use theme::Theme;
pub use types::PanelData;
