/// Hush - ambient sound player for the terminal
use anyhow::Context;
use clap::{Parser, Subcommand};
use hush_cache::CachingResolver;
use hush_core::{AuthContext, StaticAuth, Track, UserId};
use hush_cli::{
    catalog,
    config::AppConfig,
    render::{history_line, notification_line, status_line},
    JsonLinesStore, SimulatedBackend,
};
use hush_playback::{
    snap_timer_minutes, Collaborators, PlaybackSession, SessionError, SessionHandle,
    SessionNotification,
};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "hush=info,hush_cli=info,hush_playback=info,hush_cache=info";

#[derive(Parser)]
#[command(name = "hush")]
#[command(about = "Play ambient sounds and stories", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HUSH_CONFIG")]
    config: Option<PathBuf>,

    /// User that history and favorites are kept for
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one or more sounds together
    Play {
        /// Remote storage paths (whiteNoises_1.0/Rain.wav) or URIs
        sounds: Vec<String>,
        /// Play a story by title
        #[arg(long)]
        story: Option<String>,
        /// Stop playback after this many minutes
        #[arg(short, long)]
        timer: Option<f32>,
        /// Per-track volume, as ID=LEVEL (Rain=0.4)
        #[arg(long = "volume", value_parser = parse_volume)]
        volumes: Vec<(String, f32)>,
        /// Open the full-screen player instead of the mini player
        #[arg(long)]
        full_screen: bool,
        /// Save what is playing to favorites
        #[arg(long)]
        favorite: bool,
    },
    /// List listening history
    History,
    /// List saved favorites
    Favorites,
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        config.user = Some(user);
    }

    // Initialize tracing
    let default_filter = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Play {
            sounds,
            story,
            timer,
            volumes,
            full_screen,
            favorite,
        } => {
            config.validate()?;
            let mut tracks = sounds
                .iter()
                .map(|arg| catalog::track_from_arg(arg))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(title) = story {
                tracks.push(catalog::story(&title)?);
            }
            anyhow::ensure!(!tracks.is_empty(), "nothing to play");

            play(
                &config,
                tracks,
                PlayOptions {
                    timer,
                    volumes,
                    full_screen,
                    favorite,
                },
            )
            .await?;
        }
        Commands::History => list_history(&config).await?,
        Commands::Favorites => list_favorites(&config).await?,
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

struct PlayOptions {
    timer: Option<f32>,
    volumes: Vec<(String, f32)>,
    full_screen: bool,
    favorite: bool,
}

async fn play(config: &AppConfig, tracks: Vec<Track>, options: PlayOptions) -> anyhow::Result<()> {
    tracing::info!("Starting Hush");

    let resolver = CachingResolver::new(&config.cache).context("cannot set up audio cache")?;
    tracing::info!("Audio cache at {}", resolver.cache_dir().display());

    let store = Arc::new(JsonLinesStore::new(
        config.history_path(),
        config.favorites_path(),
    ));
    let auth = match &config.user {
        Some(user) => StaticAuth::signed_in(user.clone()),
        None => StaticAuth::anonymous(),
    };

    let session = PlaybackSession::spawn(
        config.session.clone(),
        Collaborators {
            backend: Arc::new(SimulatedBackend::new()),
            resolver: Arc::new(resolver),
            history: store.clone(),
            favorites: store,
            auth: Arc::new(auth),
        },
    );

    let mut notifications = session.notifications();
    let mut updates = session.subscribe();

    session.open(tracks)?;
    for (id, level) in options.volumes {
        session.set_track_volume(id, level)?;
    }
    if options.full_screen {
        session.show_full_screen()?;
    }
    if let Some(minutes) = options.timer {
        let minutes = snap_timer_minutes(
            minutes,
            config.session.timer_snap_minutes,
            config.session.max_timer_minutes,
        );
        if minutes > 0 {
            session.start_timer(minutes)?;
        }
    }
    if options.favorite {
        save_favorite(&session).await;
    }

    let mut last_line = String::new();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping");
                session.close(true)?;
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = status_line(&updates.borrow_and_update());
                if line != last_line {
                    println!("{line}");
                    last_line = line;
                }
            }
            notification = notifications.recv() => match notification {
                Ok(notification) => {
                    println!("{}", notification_line(&notification));
                    match notification {
                        SessionNotification::TimerExpired => break,
                        SessionNotification::AutoHidden => {
                            session.shutdown().await?;
                            anyhow::bail!("every track failed to play");
                        }
                        _ => {}
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} notifications", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.shutdown().await?;
    Ok(())
}

async fn save_favorite(session: &SessionHandle) {
    match session.add_to_favorites().await {
        Ok(Some(id)) => println!("Saved to favorites ({id})"),
        Ok(None) => {}
        Err(SessionError::AlreadyFavorite) => println!("Already in favorites"),
        Err(SessionError::NotAuthenticated) => {
            println!("Sign in to save favorites (pass --user or set HUSH_USER)");
        }
        Err(err) => tracing::warn!("Could not save favorite: {}", err),
    }
}

async fn list_history(config: &AppConfig) -> anyhow::Result<()> {
    let user = require_user(config)?;
    let store = JsonLinesStore::new(config.history_path(), config.favorites_path());

    let records = store.history(&user).await?;
    println!("History:");
    for record in records.iter().rev() {
        println!("  {}", history_line(&record.entry));
    }
    Ok(())
}

async fn list_favorites(config: &AppConfig) -> anyhow::Result<()> {
    let user = require_user(config)?;
    let store = JsonLinesStore::new(config.history_path(), config.favorites_path());

    let records = store.favorites(&user).await?;
    println!("Favorites:");
    for record in records {
        println!("  {}  {}", record.id, history_line(&record.entry));
    }
    Ok(())
}

fn require_user(config: &AppConfig) -> anyhow::Result<UserId> {
    let auth = match &config.user {
        Some(user) => StaticAuth::signed_in(user.clone()),
        None => StaticAuth::anonymous(),
    };
    auth.current_user_id()
        .context("no user configured (pass --user or set HUSH_USER)")
}

fn parse_volume(arg: &str) -> Result<(String, f32), String> {
    let (id, level) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=LEVEL, got {arg:?}"))?;
    let level: f32 = level
        .trim()
        .parse()
        .map_err(|e| format!("invalid volume {level:?}: {e}"))?;
    Ok((id.trim().to_string(), level))
}
