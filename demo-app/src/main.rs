// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::env;

use anyhow::{Context as _, bail};
use directories::ProjectDirs;
use log::LevelFilter;
use serde_json::json;

use genflac::{media_file::ffmpeg::ffprobe::probe_comment, prelude::*};

mod config;

/// Default log level for debug builds.
#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER_LEVEL: LevelFilter = LevelFilter::Info;

/// Reduce log verbosity for release builds.
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER_LEVEL: LevelFilter = LevelFilter::Warn;

const SAMPLE_RATE: SampleRateHz = SampleRateHz::of_studio_48k();

const FILE_STEM: &str = "audio__genflac__demo";

#[must_use]
fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

#[must_use]
fn app_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "genflac", app_name())
}

fn demo_metadata() -> anyhow::Result<Metadata> {
    let metadata = Metadata::try_from(json!({
        "_version": "0.0.1",
        "_hash_version": "0.0.2",
        "_type": "musicgen",
        "prompt": "♪ これはテストです。\nA \"quoted\" second line",
        "seed": "1542369587",
        "hash": "04d5509a7fd1fabda167e219812ee617",
        "history_prompt": null,
        "text_temp": 0.4,
        "waveform_temp": 0.85,
    }))?;
    Ok(metadata)
}

fn main() -> anyhow::Result<()> {
    config::init_environment();

    env_logger::Builder::new()
        .filter_level(DEFAULT_LOG_FILTER_LEVEL)
        // Parse environment variables after configuring all default option(s).
        .parse_default_env()
        .init();

    let mut config = if let Some(app_dirs) = app_dirs() {
        config::load_config_file(&config::config_file_path(&app_dirs))
    } else {
        log::warn!("Config directory is unavailable");
        Default::default()
    };
    config::apply_env_overrides(&mut config);
    log::debug!("{config:?}");

    // Fail early before writing any files
    let writer = FlacWriter::with_probed_tool(&config).context("ffmpeg")?;

    let output_dir = match config::output_dir() {
        Some(output_dir) => output_dir,
        None => env::current_dir().context("current directory")?,
    };
    let files = OutputFiles::new()
        .with("wav", output_dir.join(format!("{FILE_STEM}.wav")))
        .with("flac", output_dir.join(format!("{FILE_STEM}.flac")));

    // 1 second of silence
    let samples = vec![0.0; SAMPLE_RATE.to_inner() as usize];
    let buffer = AudioBuffer::mono(&samples);
    let metadata = demo_metadata()?;

    let outcome = writer.save(&buffer, &files, &metadata, SAMPLE_RATE)?;
    let saved = match outcome {
        SaveOutcome::Saved(saved) => saved,
        SaveOutcome::Failed(failure) => bail!("{failure}"),
    };
    println!("Saved generation to {}", saved.flac_path.display());

    let Some(comment) =
        probe_comment(&config.ffmpeg, &saved.flac_path).context("ffprobe")?
    else {
        bail!("No comment found in {}", saved.flac_path.display());
    };
    println!("Embedded comment: {comment}");
    let embedded = Metadata::from_json_str(&comment)?;
    println!("Embedded prompt: {}", embedded.prompt()?);
    if embedded != metadata {
        log::warn!("Embedded metadata differs: {embedded}");
    }
    Ok(())
}
