use anyhow::{Context, Result, anyhow};
use campus_core::{
    APP_NAME, AssistantConfig, Catalog, ReplyDelay, get_default_config_file,
};
use clap::Parser;
use colored::*;
use dotenv::dotenv;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::logging::{init_logging, log_error};
use crate::output::{OutputOptions, print_quick_actions, print_usage_instructions};

/// Main function - Answers a query or runs the chat session
#[tokio::main]
async fn main() {
    // Load environment variables so clap can pick up CAMPUS_ASSISTANT_*
    dotenv().ok();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        log_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(|| get_default_config_file(APP_NAME).ok());

    let config = config_path
        .as_deref()
        .map(AssistantConfig::load_or_default)
        .unwrap_or_default();

    init_logging(config.log_level.as_deref(), args.verbose);
    debug!("Effective configuration: {:?}", config);

    if args.init_config {
        let path = config_path.ok_or_else(|| anyhow!("Could not determine config path"))?;
        return init_config(path);
    }

    let catalog = Arc::new(load_catalog(&args, &config)?);

    if args.dump_catalog {
        print!("{}", catalog.to_toml_string().context("Failed to serialize catalog")?);
        return Ok(());
    }

    if args.list_actions {
        print_quick_actions(&catalog);
        return Ok(());
    }

    let delay = if args.instant {
        ReplyDelay::instant()
    } else {
        config.reply_delay()
    };
    let options = OutputOptions::from_config(&config);

    let query = match (&args.action, &args.query) {
        (Some(selector), _) => {
            let action = catalog.quick_action(selector).ok_or_else(|| {
                anyhow!(
                    "No quick action matches '{}'. Use --list-actions to see them.",
                    selector
                )
            })?;
            info!("Running quick action '{}'", action.label);
            Some(action.query.clone())
        }
        (None, query) => query.clone(),
    };

    if args.interactive {
        app::run_interactive_chat(catalog, &delay, &options).await
    } else if let Some(query) = query {
        if args.json {
            app::run_json_query(&query, &catalog)
        } else {
            app::run_single_query(query, catalog, &delay, &options).await
        }
    } else {
        print_usage_instructions();
        Ok(())
    }
}

/// Catalog from `--catalog`, then the config file, then the built-in table
fn load_catalog(args: &Args, config: &AssistantConfig) -> Result<Catalog> {
    match args.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => Catalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

fn init_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        println!(
            "{}",
            format!("Config file already exists: {}", path.display()).yellow()
        );
        return Ok(());
    }

    AssistantConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display().to_string().green());
    Ok(())
}
