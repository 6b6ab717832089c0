mod cli;

use wavbatch::{config, grouper, pipeline::Pipeline};
use wavbatch_av::FfmpegEngine;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, LogFormat, PathArgs};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "wavbatch=trace,wavbatch_av=trace".to_string()
        } else {
            "wavbatch=info,wavbatch_av=info".to_string()
        }
    });

    // Logs go to stderr so `plan --json` output stays machine readable
    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(&env_filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(&env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    match cli.command {
        Commands::Run {
            paths,
            no_merge,
            jobs,
            task_timeout,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            apply_paths(&mut config, paths);
            if no_merge {
                config.merge.enabled = false;
            }
            if let Some(jobs) = jobs {
                config.jobs.concurrency = jobs;
            }
            if task_timeout.is_some() {
                config.jobs.task_timeout_secs = task_timeout;
            }
            config::validate_config(&config)?;

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_pipeline(config))
        }
        Commands::Plan { paths, json } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            apply_paths(&mut config, paths);
            config::validate_config(&config)?;
            plan(&config, json)
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("wavbatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn apply_paths(config: &mut config::Config, paths: PathArgs) {
    if let Some(input) = paths.input {
        config.paths.input = input;
    }
    if let Some(output) = paths.output {
        config.paths.output = output;
    }
}

async fn run_pipeline(config: config::Config) -> Result<()> {
    let engine = FfmpegEngine::locate(config.tools.ffmpeg.as_deref())?
        .with_timeout(config.jobs.task_timeout());
    tracing::debug!("Using ffmpeg at {:?}", engine.ffmpeg());

    tracing::info!(
        "Processing {:?} -> {:?} (merge: {})",
        config.paths.input,
        config.paths.output,
        config.merge.enabled
    );

    let pipeline = Pipeline::new(Arc::new(config), Arc::new(engine));
    let summary = match pipeline.run().await {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(path) = e.path() {
                eprintln!("Failed at {}", path.display());
            }
            return Err(e.into());
        }
    };

    println!("All files processed successfully.");
    println!("{}", summary);
    Ok(())
}

fn plan(config: &config::Config, json: bool) -> Result<()> {
    let groups = grouper::discover(
        &config.paths.input,
        &config.paths.output,
        &config.scan.extensions,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No source files found under {}", config.paths.input.display());
        return Ok(());
    }

    for (group, files) in &groups {
        println!("{} ({} files)", group.display(), files.len());
        for file in files {
            let marker = if file.strip_video() { " [audio only]" } else { "" };
            println!("  {}{}", file.path.display(), marker);
        }
    }
    println!(
        "\n{} files in {} groups, merge {}",
        grouper::file_count(&groups),
        groups.len(),
        if config.merge.enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = wavbatch_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to convert files.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            config::validate_config(&config)?;
            config
        }
    };

    println!("✓ Configuration is valid");
    println!("  Input: {}", config.paths.input.display());
    println!("  Output: {}", config.paths.output.display());
    println!("  Merge enabled: {}", config.merge.enabled);
    println!("  Concurrency: {}", config.jobs.concurrency);
    match config.jobs.task_timeout_secs {
        Some(secs) => println!("  Task timeout: {}s", secs),
        None => println!("  Task timeout: none"),
    }
    println!("  Extensions: {}", config.scan.extensions.join(", "));

    Ok(())
}
