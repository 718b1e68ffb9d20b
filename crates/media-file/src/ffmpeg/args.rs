// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::Path;

use genflac_core::audio::{ChannelCount, SampleRateHz};

use crate::prelude::*;

/// Reads the raw input from standard input.
pub const PIPE_INPUT: &str = "pipe:";

/// Little-endian 32-bit floating point PCM.
pub const RAW_INPUT_FORMAT: &str = "f32le";

pub const METADATA_INPUT_FORMAT: &str = "ffmetadata";

pub const OUTPUT_FORMAT: &str = "flac";

pub const LOG_LEVEL: &str = "error";

/// Metadata is only imported from the sidecar, i.e. the second input.
pub const METADATA_INPUT_INDEX: usize = 1;

pub const MAP_OPTION: &str = "-map";

/// Arguments for encoding raw PCM from standard input into a FLAC file
/// with the metadata of a sidecar file.
#[derive(Debug, Clone, Copy)]
pub struct TranscodeArgs<'a> {
    pub channel_count: ChannelCount,
    pub sample_rate: SampleRateHz,
    pub sidecar_path: &'a Path,
    pub output_path: &'a Path,
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

impl TranscodeArgs<'_> {
    /// Builds the argument list including a `-map` option for each
    /// input stream.
    ///
    /// The mapping of the sidecar input is superfluous and should be
    /// removed with [`strip_map_directive()`] before passing the
    /// arguments to `ffmpeg`.
    pub fn build(&self) -> Result<Vec<String>> {
        let Self {
            channel_count,
            sample_rate,
            sidecar_path,
            output_path,
        } = *self;
        let metadata_input_index = METADATA_INPUT_INDEX.to_string();
        let args = vec![
            // Input #0: Raw PCM
            "-f".to_owned(),
            RAW_INPUT_FORMAT.to_owned(),
            "-ac".to_owned(),
            channel_count.value().to_string(),
            "-ar".to_owned(),
            sample_rate.to_inner().to_string(),
            "-i".to_owned(),
            PIPE_INPUT.to_owned(),
            // Input #1: Metadata sidecar
            "-i".to_owned(),
            path_arg(sidecar_path)?,
            // Output
            MAP_OPTION.to_owned(),
            "0".to_owned(),
            MAP_OPTION.to_owned(),
            metadata_input_index.clone(),
            "-f".to_owned(),
            OUTPUT_FORMAT.to_owned(),
            "-loglevel".to_owned(),
            LOG_LEVEL.to_owned(),
            "-map_metadata".to_owned(),
            metadata_input_index,
            path_arg(output_path)?,
            // Overwrite existing output files
            "-y".to_owned(),
        ];
        Ok(args)
    }
}

/// Finds the first `-map 1` option.
///
/// Returns 0 if not found. An option at the very beginning of the
/// argument list is therefore indistinguishable from a missing one.
#[must_use]
pub fn find_map_directive(args: &[String]) -> usize {
    let input_index = METADATA_INPUT_INDEX.to_string();
    args.windows(2)
        .position(|pair| pair[0] == MAP_OPTION && pair[1] == input_index)
        .unwrap_or_default()
}

/// Removes the first `-map 1` option.
///
/// The argument list is returned unmodified if the option has not been
/// found by [`find_map_directive()`].
#[must_use]
pub fn strip_map_directive(mut args: Vec<String>) -> Vec<String> {
    let index = find_map_directive(&args);
    if index > 0 {
        args.drain(index..index + 2);
    }
    args
}
