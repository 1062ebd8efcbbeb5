//! Annotation session logic: graph panels, the tab view and the controller.
//!
//! Nothing here touches the DOM. Canvas widgets send [`PanelGesture`]s in,
//! panels queue [`ViewEvent`]s, and the [`Controller`] drains them.

mod controller;
mod dispatch;
mod panel;
mod tabs;

pub use controller::{Controller, NavState, Notice, NoticeLevel, TextPane, TreePane};
pub use dispatch::{EventQueue, PanelGesture, ViewEvent};
pub use panel::{GraphPanel, PanelNode};
pub use tabs::TabbedGraphView;
