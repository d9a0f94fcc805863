mod cli;

use mpdforge::{config, DeliveryType, ManifestCreators, ReqwestDownloader, StreamDescriptor};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mpdforge=trace,mpdforge_probe=trace,mpdforge_mpd=trace,reqwest=debug".to_string()
        } else {
            "mpdforge=info,mpdforge_probe=info,mpdforge_mpd=warn".to_string()
        }
    });

    // Logs go to stderr so the manifest can be piped from stdout
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            url,
            delivery,
            descriptor,
            fallback_duration,
            target_duration,
            output,
        } => generate(
            GenerateArgs {
                url,
                delivery,
                descriptor,
                fallback_duration,
                target_duration,
                output,
            },
            cli.config.as_deref(),
        ),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mpdforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

struct GenerateArgs {
    url: String,
    delivery: DeliveryType,
    descriptor: PathBuf,
    fallback_duration: i64,
    target_duration: Option<i32>,
    output: Option<PathBuf>,
}

fn generate(args: GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let content = std::fs::read_to_string(&args.descriptor)
        .with_context(|| format!("Failed to read descriptor file: {:?}", args.descriptor))?;
    let descriptor: StreamDescriptor = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse descriptor file: {:?}", args.descriptor))?;

    tracing::debug!(
        id = descriptor.id,
        kind = %descriptor.kind,
        delivery = %args.delivery,
        "Generating manifest"
    );

    let creators = ManifestCreators::from_config(ReqwestDownloader::new(&config.http), &config)
        .context("Invalid cache settings")?;
    let manifest = creators
        .generate(
            args.delivery,
            &args.url,
            &descriptor,
            args.fallback_duration,
            args.target_duration,
        )
        .with_context(|| format!("Failed to generate {} manifest", args.delivery))?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &manifest)
                .with_context(|| format!("Failed to write manifest to {:?}", path))?;
            tracing::info!("Wrote manifest to {:?}", path);
        }
        None => println!("{}", manifest),
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_summary(&config);
        }
    }

    Ok(())
}

fn print_summary(config: &config::Config) {
    println!(
        "  HTTP timeouts: {}s total, {}s connect",
        config.http.timeout_secs, config.http.connect_timeout_secs
    );
    match config.cache.max_entries {
        Some(max) => println!("  Cache: {} entries, clear factor {}", max, config.cache.clear_factor),
        None => println!("  Cache: unbounded, clear factor {}", config.cache.clear_factor),
    }
    println!("  Client country: {}", config.clients.country_code);
}
