use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use twcast_core::{AppError, Config, ConfigError};
use twcast_weather::{
    render_html, render_text, spawn_decoration_loop, taiwan_now, CityRegistry, Dashboard,
    DashboardView, DecorationField, Location, LocationSource,
};

/// Rows of falling particles drawn on the loading screen
const LOADING_ROWS: u16 = 6;

#[derive(Parser)]
#[command(name = "twcast", version, about = "Taiwan city weather dashboard")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, env = "TWCAST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the dashboard for the detected or chosen city
    Show(ShowArgs),
    /// List the cities that can be selected
    Cities,
}

#[derive(Args, Default)]
struct ShowArgs {
    /// City display name or slug; skips location detection
    #[arg(long)]
    city: Option<String>,

    /// Device latitude
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Device longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Behave as if location permission was refused
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    no_location: bool,

    /// Write an HTML page instead of printing to the terminal
    #[arg(long)]
    html: Option<PathBuf>,

    /// Keep reading city names from stdin and re-render
    #[arg(long, short)]
    interactive: bool,

    /// Skip the loading screen delay
    #[arg(long)]
    no_wait: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    twcast_core::init()?;

    match cli.command {
        Some(Command::Cities) => {
            list_cities()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Show(args)) => show(cli.config, args).await,
        None => show(cli.config, ShowArgs::default()).await,
    }
}

fn list_cities() -> Result<()> {
    let registry = CityRegistry::taiwan().context("Failed to build city registry")?;
    let mut out = std::io::stdout().lock();
    for entry in registry.entries() {
        writeln!(out, "{}\t{}", entry.display_name, entry.slug)?;
    }
    Ok(())
}

async fn show(config_path: Option<PathBuf>, args: ShowArgs) -> Result<ExitCode> {
    let config = match Config::load_validated(config_path.as_deref()) {
        Ok((config, _)) => config,
        Err(e) => {
            if let Some(err) = e.downcast_ref::<ConfigError>() {
                eprintln!("{}", err.user_message());
            }
            return Err(e);
        }
    };

    let source = if args.no_location {
        LocationSource::Denied
    } else if let (Some(latitude), Some(longitude)) = (args.lat, args.lon) {
        LocationSource::Fixed(Location {
            latitude,
            longitude,
        })
    } else {
        LocationSource::from_config(&config.location)
    };

    let mut dashboard = Dashboard::new(&config, taiwan_now().date())
        .context("Failed to set up dashboard")?;
    let theme = dashboard.theme();
    tracing::info!("Theme: {:?}", theme.mode);

    let field = Arc::new(Mutex::new(DecorationField::new(
        theme.particle,
        config.decoration.width,
        Duration::from_millis(config.decoration.lifetime_ms),
    )));
    let interval = Duration::from_millis(config.decoration.interval_ms);
    let token = CancellationToken::new();
    let decoration = spawn_decoration_loop(field.clone(), interval, token.clone());

    // An HTML page runs its own reveal timer.
    let reveal_delay = if args.no_wait || args.html.is_some() {
        Duration::ZERO
    } else {
        Duration::from_millis(config.weather.reveal_delay_ms)
    };
    let renderer = Renderer {
        field,
        interval,
        reveal_delay,
        page_reveal_ms: config.weather.reveal_delay_ms,
        html: args.html.clone(),
    };

    let city = match args.city {
        Some(city) => city,
        None => {
            let resolution = dashboard.resolve(&source).await;
            if let Some(notice) = &resolution.notice {
                eprintln!("{notice}");
            }
            resolution.slug
        }
    };

    let mut exit = renderer.load(&mut dashboard, &city).await;

    if args.interactive {
        exit = interactive(&mut dashboard, &renderer).await?;
    }

    token.cancel();
    if let Err(e) = decoration.await {
        tracing::warn!("Decoration loop ended abnormally: {}", e);
    }

    Ok(exit)
}

/// Read city names from stdin until EOF or `q`, re-rendering each one.
async fn interactive(dashboard: &mut Dashboard, renderer: &Renderer) -> Result<ExitCode> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut exit = ExitCode::SUCCESS;

    loop {
        eprint!("city> ");
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "q" | "quit" => break,
            "?" | "list" => list_cities()?,
            city => exit = renderer.load(dashboard, city).await,
        }
    }

    Ok(exit)
}

struct Renderer {
    field: Arc<Mutex<DecorationField>>,
    interval: Duration,
    reveal_delay: Duration,
    page_reveal_ms: u64,
    html: Option<PathBuf>,
}

impl Renderer {
    /// Fetch and render one city behind the loading screen. Failures are
    /// reported to the user and leave the previous view in place.
    async fn load(&self, dashboard: &mut Dashboard, city: &str) -> ExitCode {
        let screen = LoadingScreen::start(self.field.clone(), self.interval);

        let result = dashboard.select_city(city).await;
        if result.is_ok() {
            tokio::time::sleep(self.reveal_delay).await;
        }
        screen.stop().await;

        match result {
            Ok(view) => match self.output(dashboard, &view) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!("Failed to write dashboard: {}", e);
                    eprintln!("{}", AppError::Io(e).user_message());
                    ExitCode::FAILURE
                }
            },
            Err(e) => {
                tracing::error!("Failed to load {}: {}", city, e);
                let err = AppError::Weather(e.into());
                eprintln!("{}", err.user_message());
                ExitCode::FAILURE
            }
        }
    }

    fn output(&self, dashboard: &Dashboard, view: &DashboardView) -> std::io::Result<()> {
        match &self.html {
            Some(path) => {
                let page = render_html(
                    view,
                    dashboard.registry().entries(),
                    dashboard.starfield().stars(),
                    self.page_reveal_ms,
                );
                std::fs::write(path, page)?;
                tracing::info!("Wrote dashboard for {} to {}", view.slug, path.display());
            }
            None => {
                let mut out = std::io::stdout().lock();
                out.write_all(render_text(view).as_bytes())?;
                out.flush()?;
            }
        }
        Ok(())
    }
}

/// Animates the decoration field on stderr while a fetch is in flight.
struct LoadingScreen {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl LoadingScreen {
    fn start(field: Arc<Mutex<DecorationField>>, interval: Duration) -> Self {
        let token = CancellationToken::new();
        if !std::io::stderr().is_terminal() {
            return Self {
                token,
                handle: None,
            };
        }

        let stop = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut drawn = false;
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        let frame = field.lock().render_frame(tokio::time::Instant::now(), LOADING_ROWS);
                        if let Err(e) = draw_frame(&frame, drawn) {
                            tracing::debug!("Loading screen draw failed: {}", e);
                            break;
                        }
                        drawn = true;
                    }
                }
            }
            if drawn {
                let _ = clear_frame();
            }
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    async fn stop(self) {
        self.token.cancel();
        if let Some(handle) = self.handle {
            let _ = handle.await;
        }
    }
}

fn draw_frame(frame: &[String], redraw: bool) -> std::io::Result<()> {
    let mut err = std::io::stderr().lock();
    if redraw {
        queue!(err, cursor::MoveUp(frame.len() as u16))?;
    }
    for line in frame {
        queue!(
            err,
            terminal::Clear(ClearType::CurrentLine),
            Print(line),
            Print("\n")
        )?;
    }
    err.flush()
}

fn clear_frame() -> std::io::Result<()> {
    let mut err = std::io::stderr().lock();
    queue!(
        err,
        cursor::MoveUp(LOADING_ROWS),
        terminal::Clear(ClearType::FromCursorDown)
    )?;
    err.flush()
}
