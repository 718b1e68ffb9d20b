// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    env, fs,
    path::{Path, PathBuf},
    str::ParseBoolError,
};

use directories::ProjectDirs;

use genflac::media_file::config::Config;

const FFMPEG_PROGRAM_ENV: &str = "GENFLAC_FFMPEG";

const FFPROBE_PROGRAM_ENV: &str = "GENFLAC_FFPROBE";

const RETAIN_SIDECAR_ENV: &str = "GENFLAC_RETAIN_SIDECAR";

const OUTPUT_DIR_ENV: &str = "GENFLAC_OUTPUT_DIR";

pub(crate) fn init_environment() {
    if let Ok(path) = dotenvy::dotenv() {
        // Print to stderr because logging has not been initialized yet
        eprintln!("Loaded environment from dotenv file {}", path.display());
    }
}

#[must_use]
pub(crate) fn config_file_path(app_dirs: &ProjectDirs) -> PathBuf {
    let mut path_buf = app_dirs.config_dir().to_path_buf();
    path_buf.push("config");
    path_buf.set_extension("ron");
    path_buf
}

/// Loads the configuration file, falling back to defaults.
#[must_use]
pub(crate) fn load_config_file(file_path: &Path) -> Config {
    log::info!(
        "Loading configuration from file: {file_path}",
        file_path = file_path.display()
    );
    match fs::read(file_path) {
        Ok(bytes) => ron::de::from_bytes(&bytes)
            .map_err(|err| {
                log::warn!("Failed to parse configuration data: {err}");
            })
            .unwrap_or_default(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Default::default(),
        Err(err) => {
            log::warn!("Failed to read configuration data from file: {err}");
            Default::default()
        }
    }
}

fn parse_bool_var(var: &str) -> Result<bool, ParseBoolError> {
    var.to_lowercase().parse::<bool>().or_else(|err| {
        if let Ok(val) = var.parse::<u8>() {
            match val {
                0 => return Ok(false),
                1 => return Ok(true),
                _ => (),
            }
        }
        Err(err)
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    let var = env::var(key).ok()?;
    log::debug!("{key} = {var}");
    if var.trim().is_empty() {
        return None;
    }
    Some(var)
}

/// Overrides configuration values with environment variables.
pub(crate) fn apply_env_overrides(config: &mut Config) {
    if let Some(program) = non_empty_var(FFMPEG_PROGRAM_ENV) {
        config.ffmpeg.program = program.into();
    }
    if let Some(program) = non_empty_var(FFPROBE_PROGRAM_ENV) {
        config.ffmpeg.probe_program = program.into();
    }
    if let Some(var) = non_empty_var(RETAIN_SIDECAR_ENV) {
        match parse_bool_var(&var) {
            Ok(retain_sidecar) => config.writer.retain_sidecar = retain_sidecar,
            Err(err) => {
                log::warn!("Failed to parse {RETAIN_SIDECAR_ENV} = {var}: {err}");
            }
        }
    }
}

#[must_use]
pub(crate) fn output_dir() -> Option<PathBuf> {
    non_empty_var(OUTPUT_DIR_ENV).map(Into::into)
}
