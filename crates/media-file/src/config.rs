// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

pub const DEFAULT_FFPROBE_PROGRAM: &str = "ffprobe";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ffmpeg: FfmpegConfig,
    pub writer: WriterConfig,
}

/// Location of the external executables.
///
/// Plain program names are resolved through the `PATH` environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    pub program: PathBuf,
    pub probe_program: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_FFMPEG_PROGRAM.into(),
            probe_program: DEFAULT_FFPROBE_PROGRAM.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Keep the metadata sidecar file next to the FLAC file instead of
    /// deleting it after encoding.
    pub retain_sidecar: bool,
}
