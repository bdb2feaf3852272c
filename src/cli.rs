use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hlsdeck")]
#[command(author, version, about = "Upload, browse and play back HLS-transcoded videos")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token for the video service (overrides config and environment)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a video for HLS transcoding
    Upload {
        /// Video file to upload
        #[arg(required = true)]
        file: PathBuf,

        /// Play the transcoded stream once processing finishes
        #[arg(long)]
        play: bool,

        /// Simulate playback instead of launching a player
        #[arg(long)]
        headless: bool,

        /// Output the playback source as JSON
        #[arg(long)]
        json: bool,
    },

    /// List uploaded videos
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the playback source a video maps to
    Show {
        /// Video id (its folder)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Print only one playlist URL (master, or the given quality) for piping
        #[arg(long, value_name = "QUALITY", num_args = 0..=1, default_missing_value = "auto", conflicts_with = "json")]
        url: Option<String>,
    },

    /// Delete an uploaded video
    Delete {
        /// Video id (its folder)
        id: String,
    },

    /// Play a video with interactive quality switching
    Play {
        /// Video id from `hlsdeck list`
        #[arg(conflicts_with_all = ["sample", "response"])]
        id: Option<String>,

        /// Play the built-in sample stream
        #[arg(long)]
        sample: bool,

        /// Play an upload response saved to a file (`-` reads stdin)
        #[arg(long, value_name = "FILE")]
        response: Option<PathBuf>,

        /// Quality to start with (defaults to Auto)
        #[arg(short, long)]
        quality: Option<String>,

        /// Simulate playback instead of launching a player
        #[arg(long)]
        headless: bool,
    },

    /// Store a bearer token in the config file
    Login {
        /// Token issued by the authentication provider
        token: String,
    },

    /// Remove the stored bearer token
    Logout,

    /// Check that an HLS-capable player is available
    CheckPlayer,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
