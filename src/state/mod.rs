pub mod history;
pub mod navigation;
pub mod navigator;
pub mod pane;
pub mod selection;
pub mod sort;

pub use history::{NavigationHistory, PersistedNavigation};
pub use navigator::{Navigator, Toolbar};
pub use pane::{PaneController, PaneState};
