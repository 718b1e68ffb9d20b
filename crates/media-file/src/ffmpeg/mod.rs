// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Invocation of the external `ffmpeg` executable.

use std::{
    ffi::OsStr,
    io::{self, ErrorKind, Write as _},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use anyhow::anyhow;

use crate::{config::FfmpegConfig, prelude::*};

pub mod args;
pub mod capability;
pub mod ffprobe;

use self::capability::Formats;

/// Exit status and diagnostics of a finished transcoding process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscodeOutput {
    /// `None` if the process has been terminated by a signal.
    pub exit_code: Option<i32>,
    pub stderr: Vec<u8>,
}

impl TranscodeOutput {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs a transcoding process to completion.
///
/// The input is written to the standard input of the process
/// which is closed afterwards. Implementations block until the
/// process has terminated.
pub trait Transcoder {
    fn transcode(&self, args: &[String], input: &[u8]) -> Result<TranscodeOutput>;
}

impl<T> Transcoder for &T
where
    T: Transcoder + ?Sized,
{
    fn transcode(&self, args: &[String], input: &[u8]) -> Result<TranscodeOutput> {
        (**self).transcode(args, input)
    }
}

/// An `ffmpeg` executable that has been probed for the required features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegTool {
    program: PathBuf,
    version: String,
}

impl FfmpegTool {
    /// Checks that the configured executable exists and supports
    /// all formats needed for encoding FLAC files from raw PCM input
    /// with metadata from a sidecar file.
    ///
    /// Supposed to be invoked once on startup before any files are
    /// written.
    pub fn probe(config: &FfmpegConfig) -> Result<Self> {
        let program = config.program.clone();
        let version_info = run_for_stdout(&program, ["-hide_banner", "-version"])?;
        let Some(version) = capability::parse_version(&version_info) else {
            return Err(Error::IncompatibleTool {
                program,
                missing: vec!["version info".to_owned()],
            });
        };
        let formats_info = run_for_stdout(&program, ["-hide_banner", "-formats"])?;
        let missing = Formats::parse(&formats_info).missing_requirements();
        if !missing.is_empty() {
            log::warn!(
                "{program} {version} lacks required formats: {missing:?}",
                program = program.display()
            );
            return Err(Error::IncompatibleTool { program, missing });
        }
        log::info!(
            "Using {program} {version}",
            program = program.display()
        );
        Ok(Self {
            program,
            version: version.to_owned(),
        })
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Transcoder for FfmpegTool {
    fn transcode(&self, args: &[String], input: &[u8]) -> Result<TranscodeOutput> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(&self.program, err))?;
        // The input is written concurrently while stderr is drained.
        // The pipe is closed when the writer drops stdin.
        let stdin = child.stdin.take();
        let (write_result, output) = thread::scope(|scope| {
            let writer =
                scope.spawn(move || stdin.map_or(Ok(()), |mut stdin| stdin.write_all(input)));
            let output = child.wait_with_output();
            let write_result = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("writing input panicked")));
            (write_result, output)
        });
        let output = output?;
        match write_result {
            Ok(()) => (),
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                // The process exited before consuming all input.
                // Its exit status and diagnostics are still reported.
                log::debug!(
                    "{program} closed its input prematurely: {err}",
                    program = self.program.display()
                );
            }
            Err(err) => return Err(err.into()),
        }
        Ok(TranscodeOutput {
            exit_code: output.status.code(),
            stderr: output.stderr,
        })
    }
}

fn spawn_error(program: &Path, err: io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::ToolNotFound(program.to_path_buf())
    } else {
        err.into()
    }
}

pub(crate) fn run_for_stdout<I, S>(program: &Path, args: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|err| spawn_error(program, err))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "{program} exited with {status}: {stderr}",
            program = program.display(),
            status = output.status,
            stderr = stderr.trim(),
        )
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
