//! # QuoteSnap CLI
//!
//! Command-line interface for rendering quote cards and managing saved
//! configurations.
//!
//! ## Usage
//!
//! ```bash
//! # Render the default card to a PNG
//! quotesnap render
//!
//! # Render a config file at export resolution
//! quotesnap render --config card.json --out card.png
//!
//! # Render a saved configuration by name
//! quotesnap render morning-quote
//!
//! # Manage saved configurations
//! quotesnap configs list
//! quotesnap configs show morning-quote
//! quotesnap configs save morning-quote card.json
//! quotesnap configs delete morning-quote
//!
//! # Start the HTTP server
//! quotesnap serve --listen 0.0.0.0:8080
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use quotesnap::{
    QuoteSnapError,
    card::{CardConfig, Theme, layout},
    export::{self, CaptureOptions, ExportCoordinator},
    i18n::{Catalog, Locale},
    server::{ServerConfig, serve},
    store::{ConfigStore, FileBackend},
};

/// QuoteSnap - Quote card rendering utility
#[derive(Parser, Debug)]
#[command(name = "quotesnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a quote card to a PNG file
    Render {
        /// Saved configuration name (omit to use --config or the default card)
        name: Option<String>,

        /// Card configuration JSON file (overrides `name`)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Quote text override
        #[arg(long)]
        text: Option<String>,

        /// Author override
        #[arg(long)]
        author: Option<String>,

        /// Theme override (e.g. "minimal_dark", "gradient_sunset")
        #[arg(long)]
        theme: Option<String>,

        /// Include the date line in the footer
        #[arg(long)]
        show_date: bool,

        /// Output PNG path (defaults to a timestamped filename)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Device-pixel multiplier over the 600px surface
        #[arg(long, default_value = "2")]
        pixel_ratio: u32,

        /// Locale for placeholder text and dates (e.g. "en", "zh")
        #[arg(long, default_value = "en")]
        locale: String,

        /// Data file holding saved configurations
        #[arg(long, default_value = "quotesnap.json")]
        data: PathBuf,
    },

    /// Manage saved card configurations
    Configs {
        #[command(subcommand)]
        action: ConfigAction,

        /// Data file holding saved configurations
        #[arg(long, default_value = "quotesnap.json")]
        data: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Data file holding saved configurations
        #[arg(long, default_value = "quotesnap.json")]
        data: PathBuf,

        /// Locale for placeholder text and dates (e.g. "en", "zh")
        #[arg(long, default_value = "en")]
        locale: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// List saved configuration names in insertion order
    List,
    /// Print one saved configuration as JSON
    Show { name: String },
    /// Save a configuration JSON file under a name
    Save { name: String, config: PathBuf },
    /// Delete a saved configuration
    Delete { name: String },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), QuoteSnapError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            name,
            config,
            text,
            author,
            theme,
            show_date,
            out,
            pixel_ratio,
            locale,
            data,
        } => {
            let mut card = match (config, name) {
                (Some(path), _) => read_config_file(&path)?,
                (None, Some(name)) => {
                    ConfigStore::open(FileBackend::new(data)).load(&name)?
                }
                (None, None) => CardConfig::default(),
            };

            if let Some(theme) = theme {
                card.set_theme(parse_theme(&theme)?);
            }
            if let Some(text) = text {
                card.text = text;
            }
            if let Some(author) = author {
                card.author = author;
            }
            if show_date {
                card.show_date = true;
            }

            let catalog = Catalog::new(Locale::parse(&locale));
            let spec = layout::realize(&card, &catalog)?;

            let mut exporter = ExportCoordinator::with_default_rasterizer();
            let client = reqwest::Client::new();
            export::resolve_background(&spec, exporter.rasterizer_mut(), &client).await?;

            let options = CaptureOptions {
                quality: 1.0,
                pixel_ratio,
            };
            let artifact = exporter.capture(&spec, &options)?;
            let out = out.unwrap_or_else(|| PathBuf::from(&artifact.filename));
            fs::write(&out, &artifact.png)?;
            println!(
                "Saved {} ({}x{} at {}x)",
                out.display(),
                spec.width * pixel_ratio,
                spec.height * pixel_ratio,
                pixel_ratio
            );
        }

        Commands::Configs { action, data } => {
            let mut store = ConfigStore::open(FileBackend::new(data));
            match action {
                ConfigAction::List => {
                    if store.is_empty() {
                        println!("No saved configurations.");
                    } else {
                        for name in store.list() {
                            println!("{}", name);
                        }
                    }
                }
                ConfigAction::Show { name } => {
                    let config = store.load(&name)?;
                    let json = serde_json::to_string_pretty(&config).map_err(|e| {
                        QuoteSnapError::Persistence(format!("Failed to encode config: {e}"))
                    })?;
                    println!("{}", json);
                }
                ConfigAction::Save { name, config } => {
                    let card = read_config_file(&config)?;
                    store.save(&name, &card)?;
                    println!("Saved configuration '{}'", name);
                }
                ConfigAction::Delete { name } => {
                    store.delete(&name)?;
                    println!("Deleted configuration '{}'", name);
                }
            }
        }

        Commands::Serve {
            listen,
            data,
            locale,
        } => {
            serve(ServerConfig {
                data_path: data,
                listen_addr: listen,
                locale: Locale::parse(&locale),
            })
            .await?;
        }
    }

    Ok(())
}

/// Parse a theme tag as it appears on the wire ("minimal_dark", "neon", ...).
fn parse_theme(tag: &str) -> Result<Theme, QuoteSnapError> {
    serde_json::from_value(serde_json::Value::String(tag.to_string()))
        .map_err(|_| QuoteSnapError::Validation(format!("Unknown theme {tag:?}")))
}

/// Read and validate a card configuration JSON file.
fn read_config_file(path: &PathBuf) -> Result<CardConfig, QuoteSnapError> {
    let raw = fs::read_to_string(path)?;
    let config: CardConfig = serde_json::from_str(&raw).map_err(|e| {
        QuoteSnapError::Validation(format!("Invalid config file {}: {}", path.display(), e))
    })?;
    config.validate()?;
    Ok(config)
}
