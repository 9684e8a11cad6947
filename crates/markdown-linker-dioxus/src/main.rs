use anyhow::{Context, bail};
use dioxus::prelude::*;
use markdown_linker_config::{Config, LinkConfig};
use markdown_linker_engine::io;
use relative_path::RelativePathBuf;
use std::env;
use std::path::{Path, PathBuf};
use std::process;

mod session;
mod ui;

use ui::App;

/// Opened when no Markdown file is named on the command line
const DEFAULT_MARKDOWN_FILE: &str = "README.md";

/// Everything the root component needs, handed over as launch context
#[derive(Debug, Clone, PartialEq)]
pub struct Startup {
    pub workspace_path: PathBuf,
    pub markdown_file: RelativePathBuf,
    pub links: LinkConfig,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("markdown-linker starting up");

    let args: Vec<String> = env::args().collect();
    let program_name = args
        .first()
        .cloned()
        .unwrap_or_else(|| "markdown-linker".to_string());

    let startup = match startup_from_args(args.get(1..).unwrap_or_default()) {
        Ok(startup) => startup,
        Err(e) => {
            log::error!("Startup failed: {e:#}");
            eprintln!("Error: {e:#}");
            eprintln!("Usage: {program_name} [workspace-path] [markdown-file]");
            eprintln!(
                "Or create a config file at {}",
                Config::config_path().display()
            );
            process::exit(1);
        }
    };

    log::info!(
        "Opening {} in workspace {}",
        startup.markdown_file,
        startup.workspace_path.display()
    );

    dioxus::LaunchBuilder::desktop()
        .with_cfg(make_window_config(&startup))
        .with_context(startup)
        .launch(app_root);
}

/// Work out the workspace and document from `[workspace-path] [markdown-file]`,
/// falling back to the config file for whatever is missing
fn startup_from_args(args: &[String]) -> anyhow::Result<Startup> {
    let config = Config::load().context("Failed to load config file")?;
    startup_from(args, config)
}

fn startup_from(args: &[String], config: Option<Config>) -> anyhow::Result<Startup> {
    let (workspace_path, markdown_arg) = match args {
        [] => {
            let Some(config) = &config else {
                bail!("No workspace path provided and no config file found");
            };
            log::info!(
                "Using workspace path from config: {}",
                config.workspace_path.display()
            );
            (config.workspace_path.clone(), None)
        }
        [workspace] => (PathBuf::from(workspace), None),
        [workspace, markdown_file] => (PathBuf::from(workspace), Some(markdown_file.as_str())),
        _ => bail!("Too many arguments"),
    };

    io::validate_workspace_root(&workspace_path)
        .with_context(|| format!("Workspace path '{}' is invalid", workspace_path.display()))?;

    let markdown_file = match markdown_arg {
        Some(arg) => markdown_relative_to(&workspace_path, Path::new(arg))?,
        None => RelativePathBuf::from(DEFAULT_MARKDOWN_FILE),
    };

    Ok(Startup {
        workspace_path,
        markdown_file,
        links: config.map(|config| config.links).unwrap_or_default(),
    })
}

/// Accept the Markdown file relative to the workspace or as a path inside it
fn markdown_relative_to(workspace_path: &Path, markdown_file: &Path) -> anyhow::Result<RelativePathBuf> {
    let relative = if markdown_file.is_absolute() {
        markdown_file.strip_prefix(workspace_path).with_context(|| {
            format!(
                "Markdown file '{}' is outside the workspace",
                markdown_file.display()
            )
        })?
    } else {
        markdown_file
    };
    RelativePathBuf::from_path(relative)
        .with_context(|| format!("Invalid Markdown path '{}'", markdown_file.display()))
}

fn app_root() -> Element {
    let startup = use_context::<Startup>();

    rsx! {
        App {
            workspace_path: startup.workspace_path,
            markdown_file: startup.markdown_file,
            links: startup.links,
        }
    }
}

fn make_window_config(startup: &Startup) -> dioxus::desktop::Config {
    use dioxus::desktop::{Config, WindowBuilder};

    let window = WindowBuilder::new()
        .with_title(format!("markdown-linker - {}", startup.markdown_file))
        .with_always_on_top(false);

    Config::default().with_window(window)
}
