//! navfold-core - Core library for navfold
//!
//! Collapsible folder semantics for auto-generated documentation sidebars:
//! classify the rendered tree, resolve which folders are open, apply it, and
//! keep a session mirror of the user's toggles across navigations.

pub mod classifier;
pub mod document;
pub mod dom;
pub mod error;
pub mod interaction;
pub mod models;
pub mod plugin;
pub mod reconciler;
pub mod resolver;
pub mod storage;
pub mod store;

pub use classifier::classify;
pub use document::{Marker, NavDocument, TOGGLE_CLASS};
pub use error::CoreError;
pub use interaction::{handle_activation, snapshot_open_paths, Activation};
pub use models::{ClassifiedTree, CollapseConfig, NavNode, NodeId};
pub use plugin::{Ready, RenderReport, SidebarCollapse, STYLESHEET, STYLE_ID};
pub use reconciler::{reconcile, ReconcileReport};
pub use resolver::{resolve, Resolution};
pub use storage::{JsonFileStorage, MemoryStorage, SessionStorage};
pub use store::{LoadedOpenPaths, OpenStateStore, OPEN_STATE_KEY};
