mod cli;

use hlsdeck::{
    api::Identity,
    app::App,
    config::{self, persist, Config},
};
use hlsdeck_common::{PlaybackSource, SourceOrigin};
use hlsdeck_player::{
    HeadlessBackend, PlayerBackend, PlayerController, PlayerOptions, PlayerStatus, ProcessBackend,
    QualitySelector, AUTO_LABEL,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Global flags shared by every command
struct Globals {
    config: Option<PathBuf>,
    token: Option<String>,
}

impl Globals {
    fn load_config(&self) -> Result<Config> {
        config::load_config_or_default(self.config.as_deref())
    }

    /// Build the app on a headless player or on the configured player program
    async fn build_app(&self, headless: bool) -> Result<App> {
        let config = self.load_config()?;

        let backend: Arc<dyn PlayerBackend> = if headless {
            Arc::new(HeadlessBackend::new())
        } else {
            Arc::new(ProcessBackend::new(
                config.player.program.clone(),
                config.player.args.clone(),
            ))
        };
        let options = PlayerOptions {
            playback_rates: config.player.playback_rates.clone(),
            ..PlayerOptions::default()
        };
        let player = PlayerController::load_with_options(backend, options).await?;

        let identity = config
            .resolve_token(self.token.as_deref())
            .and_then(Identity::new);
        if identity.is_none() {
            tracing::debug!("No bearer token configured");
        }

        Ok(App::new(&config, player, identity))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "hlsdeck=trace,hlsdeck_player=trace,hlsdeck_common=debug,reqwest=debug".to_string()
        } else {
            "hlsdeck=info,hlsdeck_player=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let globals = Globals {
        config: cli.config,
        token: cli.token,
    };

    match cli.command {
        Commands::Upload {
            file,
            play,
            headless,
            json,
        } => runtime()?.block_on(upload_file(&globals, &file, play, headless, json)),
        Commands::List { json } => runtime()?.block_on(list_videos(&globals, json)),
        Commands::Show { id, json, url } => {
            runtime()?.block_on(show_video(&globals, &id, json, url.as_deref()))
        }
        Commands::Delete { id } => runtime()?.block_on(delete_video(&globals, &id)),
        Commands::Play {
            id,
            sample,
            response,
            quality,
            headless,
        } => {
            let target = if sample {
                PlayTarget::Sample
            } else if let Some(path) = response {
                PlayTarget::Response(path)
            } else if let Some(id) = id {
                PlayTarget::Catalog(id)
            } else {
                anyhow::bail!("Nothing to play: pass a video id, --sample or --response <FILE>");
            };
            runtime()?.block_on(play(&globals, target, quality.as_deref(), headless))
        }
        Commands::Login { token } => store_token(&globals, Some(&token)),
        Commands::Logout => store_token(&globals, None),
        Commands::CheckPlayer => runtime()?.block_on(check_player(&globals)),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path
                .or(globals.config)
                .or_else(config::find_config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("hlsdeck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Runtime::new()?)
}

async fn upload_file(
    globals: &Globals,
    file: &Path,
    play: bool,
    headless: bool,
    json: bool,
) -> Result<()> {
    let app = globals.build_app(headless || !play).await?;

    let selected = app.select_file(file)?;
    if !json {
        println!(
            "Uploading {} ({:.2} MB, {})...",
            selected.name,
            selected.size_mb(),
            selected.media_type
        );
    }

    let source = app.upload().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&source)?);
    } else {
        print_notice(&app);
        print_source(&source, app.origin());
    }

    if play && app.status().await.is_some() {
        start_playback(&app).await?;
        interact(&app).await?;
    }

    app.shutdown().await;
    Ok(())
}

async fn list_videos(globals: &Globals, json: bool) -> Result<()> {
    let app = globals.build_app(true).await?;
    app.refresh_catalog().await?;

    let catalog = app.catalog();
    let entries = catalog.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No videos uploaded yet");
        return Ok(());
    }

    println!("Videos: {}", entries.len());
    for entry in &entries {
        match catalog.source_for(entry.id()) {
            Ok(source) => {
                let labels: Vec<&str> = source.variant_urls.labels().map(|l| l.as_str()).collect();
                if labels.is_empty() {
                    println!("  {} (auto)", entry.id());
                } else {
                    println!("  {} (auto, {})", entry.id(), labels.join(", "));
                }
            }
            Err(e) => println!("  {} - {}", entry.id(), e),
        }
    }

    Ok(())
}

async fn show_video(globals: &Globals, id: &str, json: bool, url: Option<&str>) -> Result<()> {
    let app = globals.build_app(true).await?;
    app.refresh_catalog().await?;

    let source = app.catalog().source_for(id)?;
    if let Some(label) = url {
        println!("{}", playlist_url(&source, label)?);
    } else if json {
        println!("{}", serde_json::to_string_pretty(&source)?);
    } else {
        print_source(&source, Some(SourceOrigin::Catalog));
    }

    Ok(())
}

async fn delete_video(globals: &Globals, id: &str) -> Result<()> {
    let app = globals.build_app(true).await?;
    app.delete_entry(id).await?;
    print_notice(&app);
    Ok(())
}

/// The master playlist for "auto", otherwise the variant named `label`
fn playlist_url<'a>(source: &'a PlaybackSource, label: &str) -> Result<&'a str> {
    if label.eq_ignore_ascii_case(AUTO_LABEL) {
        return Ok(&source.master_url);
    }
    source
        .variant_urls
        .get(label)
        .ok_or_else(|| anyhow::anyhow!("Unknown quality: {}", label))
}

enum PlayTarget {
    Catalog(String),
    Sample,
    Response(PathBuf),
}

async fn play(
    globals: &Globals,
    target: PlayTarget,
    quality: Option<&str>,
    headless: bool,
) -> Result<()> {
    let app = globals.build_app(headless).await?;

    match target {
        PlayTarget::Catalog(id) => {
            app.refresh_catalog().await?;
            app.play_entry(&id).await?;
        }
        PlayTarget::Sample => {
            app.load_sample().await?;
        }
        PlayTarget::Response(path) => {
            let text = read_response(&path)?;
            app.open_dev_panel();
            app.load_pasted(&text).await?;
        }
    }
    print_notice(&app);

    if let Some(source) = app.active_source().await {
        print_source(&source, app.origin());
    }

    if let Some(label) = quality {
        let chosen = app.switch_quality(label).await?;
        println!("Quality: {}", chosen);
    }

    start_playback(&app).await?;
    interact(&app).await?;

    app.shutdown().await;
    Ok(())
}

fn read_response(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read response from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read response file: {:?}", path))
}

async fn start_playback(app: &App) -> Result<()> {
    let mut player = app.player().await;
    player.play()?;
    if let Some(selector) = player.selector() {
        print_selector(selector);
    }
    Ok(())
}

const INTERACTIVE_HELP: &str = "\
Commands:
  <label>      switch quality (e.g. 720p, auto)
  play         resume playback
  pause        pause playback
  seek <secs>  jump to a position
  rate <r>     change playback rate
  status       show the current session
  quit         stop playback and exit";

/// Read playback commands from stdin until `quit`, end of input or Ctrl-C.
async fn interact(app: &App) -> Result<()> {
    println!("Type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        let result = match command {
            "q" | "quit" | "exit" => break,
            "help" | "?" => {
                println!("{}", INTERACTIVE_HELP);
                Ok(())
            }
            "status" => {
                match app.status().await {
                    Some(status) => print_status(&status),
                    None => println!("Nothing is playing"),
                }
                Ok(())
            }
            "play" => app.player().await.play().map_err(anyhow::Error::from),
            "pause" => app.player().await.pause().map_err(anyhow::Error::from),
            "seek" => match words.next().map(str::parse::<f64>) {
                Some(Ok(position)) => app
                    .player()
                    .await
                    .seek(position)
                    .map_err(anyhow::Error::from),
                _ => Err(anyhow::anyhow!("Usage: seek <secs>")),
            },
            "rate" => match words.next().map(str::parse::<f64>) {
                Some(Ok(rate)) => app
                    .player()
                    .await
                    .set_playback_rate(rate)
                    .map_err(anyhow::Error::from),
                _ => Err(anyhow::anyhow!("Usage: rate <r>")),
            },
            label => match app.switch_quality(label).await {
                Ok(chosen) => {
                    println!("Quality: {}", chosen);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
        };

        if let Err(e) = result {
            eprintln!("{}", e);
        }
    }

    Ok(())
}

fn print_notice(app: &App) {
    if let Some(notice) = app.notice() {
        if notice.is_error() {
            eprintln!("{}", notice.message);
        } else {
            println!("{}", notice.message);
        }
    }
}

fn print_source(source: &PlaybackSource, origin: Option<SourceOrigin>) {
    println!("Video ID: {}", source.video_id);
    println!("Path: {}", source.video_path);
    if let Some(origin) = origin {
        println!("Source: {}", origin);
    }
    println!("Master: {}", source.master_url);
    if source.has_variants() {
        println!("Variants: {}", source.variant_urls.len());
        for (label, url) in source.variant_urls.iter() {
            println!("  {}: {}", label, url);
        }
    }
}

fn print_selector(selector: &QualitySelector) {
    let current = selector.selected().label.as_str();
    let labels: Vec<String> = selector
        .options()
        .iter()
        .map(|option| {
            if option.label == current {
                format!("[{}]", option.label)
            } else {
                option.label.clone()
            }
        })
        .collect();
    println!("Quality: {}", labels.join("  "));
}

fn print_status(status: &PlayerStatus) {
    let secs = status.position.max(0.0) as u64;
    println!(
        "{} {:02}:{:02}:{:02} [{}] {}",
        if status.paused { "Paused" } else { "Playing" },
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        status.quality,
        status.source.video_id
    );
}

async fn check_player(globals: &Globals) -> Result<()> {
    let config = globals.load_config()?;
    println!("Checking player...\n");

    let backend = ProcessBackend::new(config.player.program.clone(), config.player.args.clone());
    match backend.load().await {
        Ok(()) => {
            print!("✓ {}", backend.name());
            if let Some(program) = backend.program() {
                print!(" - {}", program.display());
            }
            println!();
            println!("\nPlayback is available.");
            Ok(())
        }
        Err(e) => {
            println!("✗ {}", e);
            println!("\nInstall mpv, ffplay or vlc, or set `player.program` in the config.");
            println!("Use --headless to simulate playback without a player.");
            Err(e.into())
        }
    }
}

fn store_token(globals: &Globals, token: Option<&str>) -> Result<()> {
    let path = globals
        .config
        .clone()
        .or_else(config::find_config)
        .unwrap_or_else(config::user_config_path);

    persist::update_token(&path, token)?;

    match token {
        Some(_) => println!("Token stored in {}", path.display()),
        None => println!("Token removed from {}", path.display()),
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  API: {}", config.api.base_url);
    println!("  Timeout: {}s", config.api.timeout_secs);
    println!(
        "  Token: {}",
        if config.resolve_token(None).is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    match config.player.program {
        Some(ref program) => println!("  Player: {}", program.display()),
        None => println!("  Player: auto-detect"),
    }
    println!(
        "  Surface: {}x{}",
        config.player.width, config.player.height
    );
    println!("  Quality labels: {}", config.catalog.quality_labels.join(", "));

    Ok(())
}
