//! CLI for the TVS post video resolver.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tvs_core::{config, logging};

use commands::{run_id, run_probe, run_resolve, ResolveArgs};

/// Top-level CLI for the TVS post video resolver.
#[derive(Debug, Parser)]
#[command(name = "tvs")]
#[command(about = "TVS: resolve post URLs to direct video URLs, thumbnails and sizes", long_about = None)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a post URL to its video URLs, thumbnails and sizes.
    Resolve {
        /// Post URL, e.g. https://x.com/user/status/123.
        url: String,
        /// Route backend requests through this proxy (http://, socks5://, ...).
        #[arg(long, value_name = "URL")]
        proxy: Option<String>,
        /// Whole-pipeline attempts before giving up (default from config).
        #[arg(long, value_name = "N")]
        attempts: Option<u32>,
        /// Skip the size probe.
        #[arg(long)]
        no_sizes: bool,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the numeric id of a post URL.
    Id {
        /// Post URL.
        url: String,
    },

    /// Probe the size of one or more media URLs.
    Probe {
        /// Media URLs.
        #[arg(required = true)]
        urls: Vec<String>,
        /// Probe the URLs concurrently.
        #[arg(long)]
        parallel: bool,
        /// Print sizes as a JSON array (-1 = unknown).
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        logging::init(cli.verbose);
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve {
                url,
                proxy,
                attempts,
                no_sizes,
                json,
            } => run_resolve(
                &cfg,
                &ResolveArgs {
                    url,
                    proxy,
                    attempts,
                    with_sizes: !no_sizes,
                    json,
                },
            )?,
            CliCommand::Id { url } => run_id(&url)?,
            CliCommand::Probe {
                urls,
                parallel,
                json,
            } => run_probe(&cfg, &urls, parallel, json)?,
        }

        Ok(())
    }
}
