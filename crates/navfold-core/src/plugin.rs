//! Lifecycle glue
//!
//! [`SidebarCollapse`] is what the host's two hooks call into: one render
//! cycle per `doneEach`, one listener registration on `ready`, and one call
//! per activation reaching the delegated listener. Only the configuration and
//! the path-keyed store live across cycles.

use crate::classifier::classify;
use crate::document::NavDocument;
use crate::interaction::{handle_activation, Activation};
use crate::models::CollapseConfig;
use crate::reconciler::{reconcile, ReconcileReport};
use crate::resolver::resolve;
use crate::storage::SessionStorage;
use crate::store::OpenStateStore;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Id of the injected stylesheet element
pub const STYLE_ID: &str = "navfold-style";

/// Open/closed indicator and triangle affordance
pub const STYLESHEET: &str = r#".sidebar-nav li > ul {
  display: none;
  margin-left: .75em;
}
.sidebar-nav li.open > ul {
  display: block;
}
.sidebar-nav li.folder > .nav-toggle {
  display: inline-block;
  cursor: pointer;
  padding: 2px;
  margin-right: .25em;
  transition: transform .2s ease;
}
.sidebar-nav li.folder > .nav-toggle::before {
  content: '\25B8';
}
.sidebar-nav li.open.folder > .nav-toggle {
  transform: rotate(90deg);
}
"#;

/// Summary of one render cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub nodes: usize,
    pub folders: usize,
    /// Paths of folders rendered open, sorted
    pub open_paths: BTreeSet<String>,
    pub active_path: Option<String>,
    pub reconcile: ReconcileReport,
}

/// Outcome of the ready hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ready {
    /// Listener attached now
    Registered,
    /// Listener was attached by an earlier call
    AlreadyRegistered,
    /// Navigation root not rendered; a later call may retry
    RootMissing,
}

/// Collapsible sidebar state shared by the host hooks
#[derive(Debug)]
pub struct SidebarCollapse<S> {
    config: CollapseConfig,
    store: OpenStateStore<S>,
    listening: bool,
}

impl<S: SessionStorage> SidebarCollapse<S> {
    pub fn new(config: CollapseConfig, storage: S) -> Self {
        Self {
            store: OpenStateStore::new(storage, config.persist),
            config,
            listening: false,
        }
    }

    pub fn config(&self) -> &CollapseConfig {
        &self.config
    }

    pub fn store(&self) -> &OpenStateStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut OpenStateStore<S> {
        &mut self.store
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Install the stylesheet; repeated calls leave a single copy
    pub fn init<D: NavDocument>(&self, doc: &mut D) {
        if doc.install_stylesheet(STYLE_ID, STYLESHEET) {
            debug!(id = STYLE_ID, "Installed sidebar stylesheet");
        }
    }

    /// Run classify → resolve → reconcile over the freshly rendered tree.
    ///
    /// Returns `None` without touching anything when the navigation root is
    /// not rendered yet.
    pub fn on_each_render<D: NavDocument>(&mut self, doc: &mut D) -> Option<RenderReport> {
        let Some(mut tree) = classify(doc) else {
            debug!("Navigation root missing, skipping render cycle");
            return None;
        };

        let loaded = self.store.load();
        let resolution = resolve(&tree, &self.config, &loaded);

        let unsaved: Vec<&str> = resolution
            .revealed
            .iter()
            .filter(|p| !loaded.get(p.as_str()).copied().unwrap_or(false))
            .map(String::as_str)
            .collect();
        if !unsaved.is_empty() {
            let mut keep: Vec<&str> = loaded
                .iter()
                .filter(|(_, open)| **open)
                .map(|(p, _)| p.as_str())
                .collect();
            keep.sort_unstable();
            if let Err(e) = self.store.save(keep.into_iter().chain(unsaved)) {
                warn!(error = %e, kind = e.kind(), "Failed to persist revealed folders");
            }
        }

        let reconcile = reconcile(doc, &mut tree, &resolution, &self.config);
        let report = RenderReport {
            nodes: tree.len(),
            folders: tree.folders().count(),
            open_paths: resolution.open_paths(&tree),
            active_path: tree.active().and_then(|id| tree.node(id).path.clone()),
            reconcile,
        };
        info!(
            nodes = report.nodes,
            folders = report.folders,
            open = report.reconcile.opened,
            active = ?report.active_path,
            "Sidebar render cycle complete"
        );
        Some(report)
    }

    /// Attach the delegated activation listener at most once
    pub fn on_ready<D: NavDocument>(&mut self, doc: &mut D) -> Ready {
        if self.listening {
            return Ready::AlreadyRegistered;
        }
        if !doc.listen_for_activations() {
            debug!("Navigation root missing, listener not attached");
            return Ready::RootMissing;
        }
        self.listening = true;
        debug!("Attached sidebar activation listener");
        Ready::Registered
    }

    /// Route one activation from the delegated listener
    pub fn on_activation<D: NavDocument>(&mut self, doc: &mut D, target: &D::Target) -> Activation {
        handle_activation(doc, &mut self.store, target)
    }
}
