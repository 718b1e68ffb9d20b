// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fmt,
    path::{Path, PathBuf},
};

use genflac_core::prelude::*;

use crate::{
    config::{Config, WriterConfig},
    ffmpeg::{
        FfmpegTool, Transcoder,
        args::{TranscodeArgs, strip_map_directive},
    },
    fmt::ffmetadata::{Sidecar, render_sidecar, sidecar_path},
    prelude::*,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub flac_path: PathBuf,

    /// The embedded metadata with the escaped prompt.
    pub metadata: Metadata,

    /// Only available if the sidecar file has been retained.
    pub sidecar_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeFailure {
    pub flac_path: PathBuf,
    pub args: Vec<String>,

    /// `None` if the process has been terminated by a signal.
    pub exit_code: Option<i32>,

    /// Diagnostics of the process, decoded as UTF-8.
    pub stderr: String,

    /// Only available if the sidecar file has been retained.
    pub sidecar_path: Option<PathBuf>,
}

impl fmt::Display for TranscodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            flac_path,
            args,
            exit_code,
            stderr,
            sidecar_path: _,
        } = self;
        write!(f, "Failed to save generation to {}", flac_path.display())?;
        if let Some(exit_code) = exit_code {
            write!(f, " (exit code {exit_code})")?;
        }
        write!(f, "\nffmpeg args: {args:?}\nffmpeg stderr: {stderr}")
    }
}

/// The result of encoding a FLAC file.
///
/// A failed transcoding process is not considered an error. The
/// failure is reported together with diagnostics for the caller
/// to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(SavedFile),
    Failed(TranscodeFailure),
}

impl SaveOutcome {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    #[must_use]
    pub fn flac_path(&self) -> &Path {
        match self {
            Self::Saved(saved) => &saved.flac_path,
            Self::Failed(failure) => &failure.flac_path,
        }
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(saved) => {
                write!(f, "Saved generation to {}", saved.flac_path.display())
            }
            Self::Failed(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

/// Encodes generated audio into FLAC files with the metadata
/// embedded as a JSON comment.
#[derive(Debug, Clone)]
pub struct FlacWriter<T> {
    transcoder: T,
    config: WriterConfig,
}

impl FlacWriter<FfmpegTool> {
    /// Probes the configured `ffmpeg` executable.
    ///
    /// Fails if the executable is missing or incompatible.
    pub fn with_probed_tool(config: &Config) -> Result<Self> {
        let tool = FfmpegTool::probe(&config.ffmpeg)?;
        Ok(Self::new(tool, config.writer))
    }
}

impl<T> FlacWriter<T>
where
    T: Transcoder,
{
    #[must_use]
    pub const fn new(transcoder: T, config: WriterConfig) -> Self {
        Self { transcoder, config }
    }

    #[must_use]
    pub const fn transcoder(&self) -> &T {
        &self.transcoder
    }

    #[must_use]
    pub const fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Encodes the samples and embeds the metadata.
    ///
    /// The prompt of the embedded metadata is escaped. The metadata
    /// of the caller is not modified.
    ///
    /// Errors are only returned for invalid inputs and for I/O
    /// failures, before or while invoking the transcoder. A transcoder
    /// that exits unsuccessfully results in [`SaveOutcome::Failed`].
    pub fn save(
        &self,
        buffer: &AudioBuffer<'_>,
        files: &OutputFiles,
        metadata: &Metadata,
        sample_rate: SampleRateHz,
    ) -> Result<SaveOutcome> {
        let flac_path = files.flac_path().ok_or(Error::MissingOutputPath)?;
        if let Err(err) = buffer.validate() {
            return Err(Error::InvalidAudioBuffer(err.into_iter().collect()));
        }
        if !sample_rate.is_valid() {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        let channel_count = buffer.channel_count();
        let metadata = metadata.with_escaped_prompt()?;
        let comment = metadata.to_compact_json()?;

        log::info!(
            "Saving generation to {flac_path}",
            flac_path = flac_path.display()
        );
        let sidecar = Sidecar::create(sidecar_path(&flac_path), &render_sidecar(&comment))?;
        let args = TranscodeArgs {
            channel_count,
            sample_rate,
            sidecar_path: sidecar.path(),
            output_path: &flac_path,
        }
        .build()?;
        let args = strip_map_directive(args);
        log::debug!("ffmpeg args: {args:?}");

        let input = buffer.to_pcm_f32le();
        let transcoded = self.transcoder.transcode(&args, &input);

        let sidecar_path = if self.config.retain_sidecar {
            Some(sidecar.retain())
        } else {
            drop(sidecar);
            None
        };
        let output = transcoded?;
        if output.is_success() {
            log::info!(
                "Saved generation to {flac_path}",
                flac_path = flac_path.display()
            );
            return Ok(SaveOutcome::Saved(SavedFile {
                flac_path,
                metadata,
                sidecar_path,
            }));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let failure = TranscodeFailure {
            flac_path,
            args,
            exit_code: output.exit_code,
            stderr,
            sidecar_path,
        };
        log::error!("{failure}");
        Ok(SaveOutcome::Failed(failure))
    }
}

#[cfg(test)]
mod tests;
