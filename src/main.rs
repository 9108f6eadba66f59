//! # Thai VTuber Dashboard CLI (`vtdash`)
//!
//! ## Usage
//!
//! ```bash
//! vtdash --config ./config/vtdash.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vtdash list` | One page of the channel table |
//! | `vtdash stats` | Totals and top channels |
//! | `vtdash feed <channel-id>` | Latest uploads of a channel |
//! | `vtdash playlist <playlist-id>` | Entries of a playlist |
//! | `vtdash lookup <url>` | Resolve a channel URL to its id |
//! | `vtdash submit <channel-id>` | Submit a channel for review |
//! | `vtdash register <url>` | Resolve and submit in one step |
//! | `vtdash serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Top 25 original VTubers by subscribers
//! vtdash list
//!
//! # Everyone, including rebranded and inactive channels, by newest upload
//! vtdash list --all-types --show-inactive --sort last_published_video_at
//!
//! # Page 2 of a search, as JSON
//! vtdash list --search aoi --page 2 --json
//!
//! # Register a channel as an original VTuber
//! vtdash register https://www.youtube.com/@example --type original
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=vtdash=debug`) to
//! change verbosity.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use vtdash::dashboard::DashboardQuery;
use vtdash::feed::FeedSource;
use vtdash::register::ChannelType;
use vtdash::{config, dashboard, feed, lookup, register, server};
use vtdash_core::{SortField, SortOrder};

/// Thai VTuber Dashboard: browse, rank, and summarize Thai VTuber YouTube
/// channels.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/vtdash.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "vtdash",
    about = "Browse, rank, and summarize Thai VTuber YouTube channels",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/vtdash.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Filters shared by `list` and `stats`.
#[derive(Args)]
struct FilterArgs {
    /// Include rebranded channels (ranked in their own table).
    #[arg(long)]
    all_types: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of the channel table.
    List {
        /// Case-insensitive substring of the channel title.
        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Include channels without a recent upload.
        #[arg(long)]
        show_inactive: bool,

        /// Sort field: subscribers, total_views, published_at,
        /// last_published_video_at, or title.
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort order: asc or desc (default desc).
        #[arg(long)]
        order: Option<SortOrder>,

        /// 1-based page number.
        #[arg(long)]
        page: Option<usize>,

        /// Rows per page (default from `[dashboard].page_size`).
        #[arg(long)]
        page_size: Option<usize>,

        /// Print the view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print channel totals and the subscriber top list.
    Stats {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the latest uploads of a channel.
    Feed {
        channel_id: String,

        /// Maximum number of videos (default from `[youtube].default_limit`).
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Print the entries of a playlist.
    Playlist {
        playlist_id: String,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Resolve a YouTube channel URL to its channel id.
    Lookup { url: String },

    /// Submit a channel id for inclusion in the ranking.
    Submit {
        channel_id: String,

        /// `original` (1) or `all` (2).
        #[arg(long = "type", default_value = "original")]
        channel_type: ChannelType,
    },

    /// Resolve a channel URL and submit it.
    Register {
        url: String,

        /// `original` (1) or `all` (2).
        #[arg(long = "type", default_value = "original")]
        channel_type: ChannelType,
    },

    /// Start the HTTP API server.
    ///
    /// Binds to `[server].bind` and refreshes the channel list every
    /// `[source].refresh_secs`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::List {
            search,
            filters,
            show_inactive,
            sort,
            order,
            page,
            page_size,
            json,
        } => {
            let query = DashboardQuery {
                search,
                show_original_vtuber: Some(!filters.all_types),
                show_inactive: Some(show_inactive),
                sort: sort.map(|f| f.as_str().to_string()),
                order: order.map(|o| o.as_str().to_string()),
                page,
                page_size,
            };
            dashboard::run_list(&cfg, &query, json).await?;
        }
        Commands::Stats { filters, json } => {
            dashboard::run_stats(&cfg, !filters.all_types, json).await?;
        }
        Commands::Feed {
            channel_id,
            limit,
            json,
        } => {
            feed::run_feed(&cfg, FeedSource::Channel(channel_id), limit, json).await?;
        }
        Commands::Playlist {
            playlist_id,
            limit,
            json,
        } => {
            feed::run_feed(&cfg, FeedSource::Playlist(playlist_id), limit, json).await?;
        }
        Commands::Lookup { url } => {
            lookup::run_lookup(&cfg, &url).await?;
        }
        Commands::Submit {
            channel_id,
            channel_type,
        } => {
            register::run_submit(&cfg, &channel_id, channel_type).await?;
        }
        Commands::Register { url, channel_type } => {
            register::run_register(&cfg, &url, channel_type).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
