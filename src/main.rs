//! lantern - DHCP packet decoder
//!
//! Reads captured DHCP payloads from files and prints their decoded form.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lantern::{
    input, Config, ConsoleReporter, DhcpParser, Error, InputFormat, MessageReporter,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lantern")]
#[command(version, about = "Decode raw DHCP packets")]
struct Cli {
    /// Dump raw header fields and enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// How input files are encoded
    #[arg(short, long, global = true, value_enum)]
    format: Option<InputFormat>,

    /// Config file to read instead of LANTERN_CONFIG or /etc/lantern.conf
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode full DHCP packets (header, magic cookie and options)
    Decode {
        /// Packet files, raw binary or hex text
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also read options overloaded into the sname/file fields
        #[arg(long)]
        overload: bool,
    },
    /// Decode a bare options block (the bytes after the magic cookie)
    Options {
        /// Options file, raw binary or hex text
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);
    tracing::debug!(?config, "configuration loaded");

    let reporter = ConsoleReporter::new().with_verbose(config.verbose);
    let parser = DhcpParser::new().with_option_overload(config.option_overload);

    let all_ok = match &cli.command {
        Commands::Decode { files, .. } => {
            let mut all_ok = true;
            for path in files {
                let source = path.display().to_string();
                match decode_packet(&parser, path, config.input_format) {
                    Ok(message) => reporter.report_message(&source, &message),
                    Err(e) => {
                        reporter.report_error(&source, &e);
                        all_ok = false;
                    }
                }
            }
            all_ok
        }
        Commands::Options { file } => {
            let source = file.display().to_string();
            let result = input::read_packet(file, config.input_format)
                .and_then(|bytes| parser.parse_options(&bytes).map_err(Error::from));
            match result {
                Ok(options) => {
                    reporter.report_options(&source, &options);
                    true
                }
                Err(e) => {
                    reporter.report_error(&source, &e);
                    false
                }
            }
        }
    };

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Config file and environment first, then command line flags on top.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Config::load()
            .with_context(|| format!("failed to load {}", Config::config_path().display()))?,
    };

    if cli.verbose {
        config.verbose = true;
    }
    if let Some(format) = cli.format {
        config.input_format = format;
    }
    if let Commands::Decode { overload: true, .. } = cli.command {
        config.option_overload = true;
    }

    Ok(config)
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.tracing_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn decode_packet(
    parser: &DhcpParser,
    path: &Path,
    format: InputFormat,
) -> lantern::Result<lantern::DhcpMessage> {
    let bytes = input::read_packet(path, format)?;
    Ok(parser.parse(&bytes)?)
}
