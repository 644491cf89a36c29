use std::{
    io::{Write, stdout},
    sync::Arc,
    time::Duration,
};

use clap::{Parser, Subcommand};
use lastfm_discover_client::config::DEFAULT_BASE_URL;
use lastfm_discover_controls::{
    ApiConfig,
    discovery::Discovery,
    notification::NotificationBroadcast,
    render::{PageView, SectionBody, render_page},
    tags::{EnrichmentPolicy, TagEnrichment},
};
use snafu::prelude::*;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(short, long)]
    /// Log level
    verbosity: Option<tracing::Level>,

    #[clap(long, env = "LASTFM_API_KEY", default_value = "", hide_env_values = true)]
    /// Last.fm API key
    api_key: String,

    #[clap(long, env = "LASTFM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    /// Last.fm API endpoint
    base_url: String,

    #[clap(long, default_value_t = 10)]
    /// Request timeout in seconds. 0 for none
    timeout_secs: u64,

    #[clap(long, default_value_t = false)]
    /// Fetch tags for search results
    search_tags: bool,

    #[clap(long, default_value_t = false)]
    /// Skip tags for popular artists and tracks
    no_popular_tags: bool,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Default. Starts the web server
    Serve {
        #[clap(long, default_value_t = 9888)]
        /// Specify port for the web server
        port: u16,
    },
    /// Print popular artists and tracks
    Popular,
    /// Print artists, albums and tracks matching a query
    Search { query: String },
}

impl Cli {
    fn config(&self) -> ApiConfig {
        let timeout = (self.timeout_secs != 0).then(|| Duration::from_secs(self.timeout_secs));

        ApiConfig::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(timeout)
    }

    fn policy(&self) -> EnrichmentPolicy {
        EnrichmentPolicy {
            popular: TagEnrichment::from_enabled(!self.no_popular_tags),
            search: TagEnrichment::from_enabled(self.search_tags),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{error}"))]
    Controls { error: String },
    #[snafu(display("{error}"))]
    Terminal { error: String },
}

impl From<lastfm_discover_controls::error::Error> for Error {
    fn from(error: lastfm_discover_controls::error::Error) -> Self {
        Error::Controls {
            error: error.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Terminal {
            error: error.to_string(),
        }
    }
}

pub async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    let verbosity = match &cli.command {
        None | Some(Commands::Serve { .. }) => cli.verbosity.or(Some(tracing::Level::INFO)),
        _ => cli.verbosity,
    };

    tracing_subscriber::fmt()
        .with_max_level(verbosity)
        .with_target(false)
        .compact()
        .init();

    let broadcast = Arc::new(NotificationBroadcast::new());
    let discovery = Arc::new(Discovery::new(cli.config(), cli.policy(), broadcast));

    match cli.command.unwrap_or(Commands::Serve { port: 9888 }) {
        Commands::Serve { port } => {
            if discovery.snapshot().search_enabled() {
                let discovery = discovery.clone();
                tokio::spawn(async move {
                    if let Err(e) = discovery.load_popular().await {
                        tracing::error!("{e}");
                    }
                });
            }

            lastfm_discover_web::init(discovery, port).await?;
            Ok(())
        }
        Commands::Popular => {
            discovery.load_popular().await?;
            print_page(&render_page(&discovery.snapshot()))
        }
        Commands::Search { query } => {
            discovery.search(&query).await?;
            print_page(&render_page(&discovery.snapshot()))
        }
    }
}

fn print_page(page: &PageView) -> Result<(), Error> {
    let mut out = stdout().lock();
    write_page(&mut out, page)?;
    out.flush()?;
    Ok(())
}

fn write_page(out: &mut impl Write, page: &PageView) -> std::io::Result<()> {
    for (index, section) in page.sections.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", section.title)?;

        match &section.body {
            SectionBody::Loading { message }
            | SectionBody::Error { message }
            | SectionBody::Empty { message } => writeln!(out, "  {message}")?,
            SectionBody::Cards { cards } => {
                for card in cards {
                    let mut line = card.name.clone();
                    if let Some(subtitle) = &card.subtitle {
                        line.push_str(&format!(" - {subtitle}"));
                    }
                    line.push_str(&format!("  {}", card.image_url));
                    if !card.tags.is_empty() {
                        let tags: Vec<&str> = card.tags.iter().map(|tag| tag.name.as_str()).collect();
                        line.push_str(&format!("  [{}]", tags.join(", ")));
                    }
                    writeln!(out, "  {line}")?;
                }
            }
        }
    }

    Ok(())
}

pub fn error_exit(error: Error) {
    eprintln!("{error}");
    std::process::exit(1);
}
