//! Photolib Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use photolib_downloader::{
    cli::Args,
    config::{validate_config, Config},
    download::{run as run_download, AssetNamer, HttpTransfer, RunContext, RunState},
    error::{exit_codes, Error, Result},
    fs::LocalProbe,
    output::{
        print_banner, print_config_summary, print_error, print_info, print_run_stats,
        print_warning,
    },
    source::open_manifest,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(state) => {
            if state.cancelled {
                ExitCode::from(exit_codes::ABORT as u8)
            } else if state.has_failures() {
                ExitCode::from(exit_codes::SOME_ASSETS_FAILED as u8)
            } else {
                ExitCode::from(exit_codes::SUCCESS as u8)
            }
        }
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::TomlParse(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Source(_) | Error::MalformedRecord { .. } | Error::Json(_) => {
                    ExitCode::from(exit_codes::SOURCE_ERROR as u8)
                }
                Error::Download(_) | Error::Http(_) | Error::SizeMismatch { .. } => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<RunState> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config_path();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        if args.config.is_some() {
            print_warning(&format!(
                "Configuration file not found: {}",
                config_path.display()
            ));
        }
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;

    let root = config.download_directory();
    print_config_summary(&config, &root);

    let manifest = config
        .download
        .manifest
        .clone()
        .ok_or_else(|| Error::MissingConfig("download.manifest".into()))?;

    // Stop between records on Ctrl-C; claims made so far stay consistent.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            print_warning("Interrupted, finishing up...");
            on_signal.cancel();
        }
    });

    let assets = open_manifest(&manifest).await?;
    let mut namer = AssetNamer::new(config.naming.clone(), LocalProbe::new(&root));
    let transfer = HttpTransfer::new(&config.download)?;
    let ctx = RunContext {
        transfer: &transfer,
        options: &config.download,
        root: &root,
        cancel: &cancel,
    };

    let mut state = RunState::new();
    let result = run_download(assets, &mut namer, &ctx, &mut state).await;

    // Statistics cover aborted runs too.
    print_run_stats(&state);
    result?;

    tracing::debug!("Touched {} folders", namer.folder_count());
    Ok(state)
}
