use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use sassblog::app::{build_http_client, App, AppEvent};
use sassblog::config::Config;
use sassblog::content::{BodyLoader, BodySource, ContentGateway, HttpGateway, LocalGateway};
use sassblog::navigation::{Location, Navigator, QueryHandling, THEME_PARAM};
use sassblog::theme::ThemeVariant;

#[derive(Parser, Debug)]
#[command(name = "sassblog", version, about = "Terminal browser for blog and documentation articles")]
struct Args {
    /// Config file (default: ~/.config/sassblog/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of a json-server style posts endpoint
    #[arg(long, value_name = "URL")]
    api: Option<String>,

    /// Where article bodies live: a directory or an http(s) URL
    #[arg(long, value_name = "DIR|URL")]
    content_base: Option<String>,

    /// Location to open, e.g. `blog/learn?page=2`
    #[arg(long, value_name = "LOCATION")]
    location: Option<String>,

    /// Articles per listing page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Print the location to stdout instead of starting the UI
    #[arg(long)]
    print: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(api) = &args.api {
        config.api_base_url = Some(api.clone());
    }
    if let Some(base) = &args.content_base {
        config.content_base = base.clone();
    }
    if let Some(location) = &args.location {
        config.start_location = location.clone();
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    config.validate()?;
    Ok(config)
}

/// Start location, with the configured display mode filled in when the
/// location does not name one.
fn start_location(config: &Config) -> Location {
    let location = Location::parse(&config.start_location);
    let theme = config.theme_variant();
    if location.query(THEME_PARAM).is_some() || theme == ThemeVariant::default() {
        return location;
    }
    location.with_query(
        &[(THEME_PARAM, Some(theme.as_query_value()))],
        QueryHandling::Merge,
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = load_config(&args)?;
    let client = build_http_client(config.request_timeout())
        .context("Failed to create HTTP client")?;

    let gateway: Arc<dyn ContentGateway> = match &config.api_base_url {
        Some(base) => {
            tracing::info!(api = %base, "Using posts endpoint");
            Arc::new(HttpGateway::new(client.clone(), base, config.request_timeout())?)
        }
        None => {
            tracing::info!("Using bundled catalog");
            Arc::new(LocalGateway::bundled())
        }
    };
    let bodies = BodyLoader::new(
        client,
        BodySource::parse(&config.content_base)?,
        &config.content_extension,
        config.request_timeout(),
    );
    let location = start_location(&config);

    if args.print {
        let out = sassblog::print::render_location(
            gateway.as_ref(),
            &bodies,
            &location,
            config.page_size,
        )
        .await?;
        print!("{}", out);
        return Ok(());
    }

    let mut app = App::new(gateway, bodies, Navigator::new(location), config.page_size);
    for warning in app.keybindings.apply_overrides(&config.keybindings) {
        tracing::warn!(warning = %warning, "Ignoring keybinding override");
        eprintln!("Warning: {}", warning);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    sassblog::ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
