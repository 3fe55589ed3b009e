//! One-shot command implementations.

use super::common::{print_info, print_success, print_warning, CliContext};
use crate::config::Config;
use crate::image_store::ImageStore;
use crate::services::{GenerationJob, GenerationOutcome, GenerationRequest};
use crate::utils::{format_path_for_display, get_log_dir};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub(super) fn cmd_generate(config_path: PathBuf, prompt: &str) -> Result<()> {
    let ctx = CliContext::load(config_path)?;
    let request = GenerationRequest::new(prompt)?;
    let store = ctx.config.image_store();
    store
        .ensure_directory()
        .context("Failed to prepare the picture directory")?;

    let settings = ctx.config.generator_settings();
    print_info(&format!(
        "Creating '{}'... This takes about {} minutes at most",
        request.prompt(),
        settings.timeout.as_secs().div_ceil(60)
    ));
    info!("Headless generation for {:?}", request.prompt());

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let outcome = runtime.block_on(GenerationJob::new(request, settings, store).run());

    match outcome {
        GenerationOutcome::Success { image_path } => {
            print_success(&format!(
                "Image created: {}",
                format_path_for_display(&image_path)
            ));
            Ok(())
        }
        GenerationOutcome::Failure(failure) => bail!("generation failed: {failure}"),
    }
}

/// What `genframe status` reports.
#[derive(Debug, Serialize)]
pub(super) struct StatusReport {
    pub image_exists: bool,
    pub image_path: PathBuf,
    /// RFC 3339 modification time of the current picture
    pub image_modified: Option<String>,
    pub config_path: PathBuf,
}

impl StatusReport {
    pub fn collect(store: &ImageStore, config_path: &Path) -> Self {
        Self {
            image_exists: store.has_image(),
            image_path: store.path().to_path_buf(),
            image_modified: store
                .modified()
                .map(|time| DateTime::<Local>::from(time).to_rfc3339()),
            config_path: config_path.to_path_buf(),
        }
    }
}

pub(super) fn cmd_status(config_path: PathBuf, json: bool) -> Result<()> {
    let ctx = CliContext::load(config_path)?;
    let report = StatusReport::collect(&ctx.config.image_store(), &ctx.config_path);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.image_exists {
        print_success(&format!(
            "Picture: {}",
            format_path_for_display(&report.image_path)
        ));
        if let Some(modified) = &report.image_modified {
            println!("   Created: {}", modified);
        }
    } else {
        print_warning(&format!(
            "No picture yet at {}, the frame will start on the prompt screen",
            format_path_for_display(&report.image_path)
        ));
    }
    println!(
        "   Config:  {}",
        format_path_for_display(&report.config_path)
    );
    Ok(())
}

pub(super) fn cmd_init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        // Parse it so a broken file is reported here rather than on start.
        Config::load(config_path)?;
        print_info(&format!(
            "Config already exists: {}",
            format_path_for_display(config_path)
        ));
        return Ok(());
    }
    Config::default().save(config_path)?;
    print_success(&format!(
        "Config written: {}",
        format_path_for_display(config_path)
    ));
    Ok(())
}

pub(super) fn cmd_config(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

pub(super) fn cmd_logs() -> Result<()> {
    let log_file = get_log_dir().join("genframe.log");
    println!("{}", log_file.display());
    println!("View logs in real-time: tail -f {}", log_file.display());
    Ok(())
}
