//! livepen - live preview for an HTML, CSS and JS trio.
//!
//! # Usage
//!
//! ```bash
//! livepen watch my-pen/
//! livepen import my-pen/ ~/Downloads/widget.js
//! livepen settings --theme light --project-name "My Pen"
//! livepen export my-pen/ --to dist/
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use livepen::app::App;
use livepen::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, settings_store_path,
};
use livepen::debounce::PREVIEW_DEBOUNCE_MS;
use livepen::perf;
use livepen::render::RenderOutcome;
use livepen::settings::{FileStore, Layout, RawSettings, Settings, SettingsStore, Theme};

/// Live preview for an HTML, CSS and JS trio
#[derive(Parser, Debug)]
#[command(name = "livepen", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Preview file to write (default: <DIR>/.livepen/preview.html)
    #[arg(long, global = true, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Debounce window for live preview, in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    delay: Option<u64>,

    /// Enable performance logging
    #[arg(long, global = true)]
    perf: bool,

    /// Write compose/render/watch debug events to a file
    #[arg(long, global = true, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long, global = true)]
    save: bool,

    /// Clear saved defaults
    #[arg(long, global = true)]
    clear: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Watch a project and re-render the preview on every edit
    Watch {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Render the preview once
    Render {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Import an .html, .css or .js file into a project
    Import {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Restore the default templates
    Reset {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
    /// Export a standalone HTML document named after the project
    Export {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
        /// Directory to write the export into (default: the project)
        #[arg(long, value_name = "DIR")]
        to: Option<PathBuf>,
    },
    /// Show or change editor settings
    Settings {
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        /// Font size such as 14px
        #[arg(long, value_name = "SIZE")]
        font_size: Option<String>,
        #[arg(long, value_name = "NAME")]
        project_name: Option<String>,
        #[arg(long, value_enum)]
        layout: Option<Layout>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("livepen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf || cli.perf);
    let debug_log_path = effective
        .debug_log
        .clone()
        .or_else(|| cli.debug_log.clone())
        .or_else(|| std::env::var_os("LIVEPEN_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(debug_log_path.as_deref()) {
        tracing::warn!(
            "Failed to initialize debug log {}: {err}",
            debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        );
    }

    let delay_ms = cli
        .delay
        .or(effective.delay_ms)
        .unwrap_or(PREVIEW_DEBOUNCE_MS);
    let out = cli.out.clone().or_else(|| effective.out.clone());
    let app_for = |dir: PathBuf| {
        App::new(dir)
            .with_preview_path(out.clone())
            .with_delay_ms(delay_ms)
    };

    match cli.command {
        Command::Watch { dir } => app_for(dir).run().context("Watch loop failed"),
        Command::Render { dir } => {
            let path = app_for(dir).render_once()?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Import { dir, file } => {
            let kind = app_for(dir)
                .import(&file)
                .with_context(|| format!("Import of {} failed", file.display()))?;
            println!("Imported {} into {kind}", file.display());
            Ok(())
        }
        Command::Reset { dir } => {
            if app_for(dir).reset()? == RenderOutcome::Failed {
                tracing::warn!("Project reset but the preview could not be written");
            }
            println!("Code reset to default template");
            Ok(())
        }
        Command::Export { dir, to } => {
            let path = app_for(dir).export(to.as_deref())?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Settings {
            theme,
            font_size,
            project_name,
            layout,
        } => {
            let mut store = SettingsStore::new(FileStore::open(settings_store_path()));
            let current = store.load();
            if theme.is_none() && font_size.is_none() && project_name.is_none() && layout.is_none()
            {
                println!("{current}");
                return Ok(());
            }
            let mut raw = RawSettings::from(&current);
            if let Some(theme) = theme {
                raw.theme = theme.as_str().to_string();
            }
            if let Some(font_size) = font_size {
                raw.font_size = font_size;
            }
            if let Some(name) = project_name {
                raw.project_name = name;
            }
            if let Some(layout) = layout {
                raw.layout = layout.as_str().to_string();
            }
            let candidate = Settings::from_raw(&raw).context("Invalid settings")?;
            store
                .apply(&candidate)
                .context("Failed to save settings")?;
            println!("{candidate}");
            Ok(())
        }
    }
}
