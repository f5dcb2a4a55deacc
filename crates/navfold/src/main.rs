//! navfold - collapsible docs sidebar driver
//!
//! Replays what the browser plugin does on each page: mount the sidebar the
//! host would render, run one render cycle, and optionally click a folder's
//! control. A session file stands in for `sessionStorage` so consecutive
//! invocations behave like navigations within one browsing session.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use navfold_core::dom::{Document, ElementId, Outline};
use navfold_core::{
    Activation, CollapseConfig, JsonFileStorage, NavDocument, OpenStateStore, SidebarCollapse,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "navfold",
    version,
    about = "Collapsible folder state for documentation sidebars",
    long_about = "Simulates render cycles of a collapsible docs sidebar.\n\
                  \n\
                  An outline file (JSON) describes the sidebar the host renders. Each\n\
                  command mounts it fresh, the way the host rebuilds the sidebar on every\n\
                  navigation, then classifies, resolves and reconciles open folders.\n\
                  \n\
                  Examples:\n\
                    navfold render sidebar.json --active /guide/install\n\
                    navfold toggle sidebar.json /guide --active /faq\n\
                    navfold --open-level 2 render sidebar.json --json\n\
                    navfold session\n\
                    navfold clear-session\n\
                  \n\
                  Environment Variables:\n\
                    NAVFOLD_CONFIG                   # TOML config file\n\
                    NAVFOLD_SETTINGS                 # Host settings JSON (sidebarCollapse key)\n\
                    NAVFOLD_SESSION                  # Session file path\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file (openLevel, persist, scrollIntoView)
    #[arg(long, env = "NAVFOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Host settings JSON; options are read from its `sidebarCollapse` object
    #[arg(long, env = "NAVFOLD_SETTINGS")]
    settings: Option<PathBuf>,

    /// Auto-open folders at depth < this value
    #[arg(long)]
    open_level: Option<u32>,

    /// Do not read or write the session
    #[arg(long)]
    no_persist: bool,

    /// Do not scroll the active entry into view
    #[arg(long)]
    no_scroll: bool,

    /// Session file (default: <cache dir>/navfold/session.json)
    #[arg(long, env = "NAVFOLD_SESSION")]
    session: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one render cycle and print the sidebar
    Render {
        /// Outline JSON file
        outline: PathBuf,
        /// Path of the current page
        #[arg(long)]
        active: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render, then click the control of the folder at PATH
    Toggle {
        /// Outline JSON file
        outline: PathBuf,
        /// Folder path to toggle
        path: String,
        /// Path of the current page
        #[arg(long)]
        active: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the folder paths stored in the session
    Session {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the session
    ClearSession,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let session_path = match &cli.session {
        Some(path) => path.clone(),
        None => default_session_path()?,
    };
    debug!(?config, session = %session_path.display(), "Starting navfold");

    match cli.command {
        Command::Render {
            outline,
            active,
            json,
        } => run_render(config, &session_path, &outline, active.as_deref(), json),
        Command::Toggle {
            outline,
            path,
            active,
            json,
        } => run_toggle(config, &session_path, &outline, &path, active.as_deref(), json),
        Command::Session { json } => run_session(&session_path, json),
        Command::ClearSession => run_clear_session(&session_path),
    }
}

/// Defaults, then the TOML file, then host settings, then flags
fn load_config(cli: &Cli) -> Result<CollapseConfig> {
    let mut config = CollapseConfig::default();

    if let Some(path) = &cli.config {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        config = CollapseConfig::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
    }

    if let Some(path) = &cli.settings {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {}", path.display()))?;
        let settings: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Settings {} is not valid JSON", path.display()))?;
        config.apply_settings(&settings);
    }

    if let Some(level) = cli.open_level {
        config.open_level = level;
    }
    if cli.no_persist {
        config.persist = false;
    }
    if cli.no_scroll {
        config.scroll_into_view = false;
    }
    Ok(config)
}

fn default_session_path() -> Result<PathBuf> {
    let cache = dirs::cache_dir().context("Could not determine cache directory")?;
    Ok(cache.join("navfold").join("session.json"))
}

fn read_outline(path: &Path) -> Result<Outline> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Outline {} is not valid JSON", path.display()))
}

/// Mount the outline and run the host's hooks for a fresh page load
fn mount(
    config: CollapseConfig,
    session_path: &Path,
    outline_path: &Path,
    active: Option<&str>,
) -> Result<(SidebarCollapse<JsonFileStorage>, Document, navfold_core::RenderReport)> {
    let outline = read_outline(outline_path)?;
    let mut plugin = SidebarCollapse::new(config, JsonFileStorage::open(session_path));
    let mut doc = Document::new();

    plugin.init(&mut doc);
    doc.mount_sidebar(&outline, active);
    let report = plugin
        .on_each_render(&mut doc)
        .context("Sidebar root missing after mount")?;
    plugin.on_ready(&mut doc);

    Ok((plugin, doc, report))
}

fn run_render(
    config: CollapseConfig,
    session_path: &Path,
    outline_path: &Path,
    active: Option<&str>,
    json: bool,
) -> Result<()> {
    let (_, doc, report) = mount(config, session_path, outline_path, active)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&render::report_json(&report))?);
    } else {
        for line in render::tree_lines(&doc) {
            println!("{line}");
        }
    }
    Ok(())
}

fn run_toggle(
    config: CollapseConfig,
    session_path: &Path,
    outline_path: &Path,
    path: &str,
    active: Option<&str>,
    json: bool,
) -> Result<()> {
    let (mut plugin, mut doc, _) = mount(config, session_path, outline_path, active)?;

    let Some(item) = find_item(&doc, path) else {
        bail!("No sidebar entry with path {path}");
    };
    let Some(control) = doc.toggle(item) else {
        println!("{path} is a page, the click navigates instead of toggling");
        return Ok(());
    };

    let outcome = plugin.on_activation(&mut doc, &control);
    if json {
        let open = match &outcome {
            Activation::Toggled { open, .. } => Some(*open),
            Activation::Ignored => None,
        };
        let value = serde_json::json!({
            "path": path,
            "open": open,
            "openFolders": navfold_core::snapshot_open_paths(&doc),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for line in render::tree_lines(&doc) {
            println!("{line}");
        }
    }
    Ok(())
}

fn run_session(session_path: &Path, json: bool) -> Result<()> {
    let store = OpenStateStore::new(JsonFileStorage::open(session_path), true);
    let mut paths: Vec<String> = store
        .load()
        .into_iter()
        .filter(|(_, open)| *open)
        .map(|(p, _)| p)
        .collect();
    paths.sort();

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else if paths.is_empty() {
        println!("No folders stored in {}", session_path.display());
    } else {
        println!("{}", render::session_table(&paths));
    }
    Ok(())
}

fn run_clear_session(session_path: &Path) -> Result<()> {
    let mut storage = JsonFileStorage::open(session_path);
    storage
        .clear()
        .with_context(|| format!("Failed to clear session {}", session_path.display()))?;
    println!("✓ Session cleared: {}", session_path.display());
    Ok(())
}

fn find_item(doc: &Document, path: &str) -> Option<ElementId> {
    let mut stack = doc.root_items()?;
    while let Some(item) = stack.pop() {
        if doc.stored_path(&item).as_deref() == Some(path) {
            return Some(item);
        }
        stack.extend(doc.child_items(&item));
    }
    None
}
