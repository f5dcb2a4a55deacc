//! Data models for navfold

pub mod config;
pub mod node;

pub use config::{CollapseConfig, SETTINGS_KEY};
pub use node::{Ancestors, ClassifiedTree, NavNode, NodeId};
