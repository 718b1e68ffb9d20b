// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

// Opt-in for allowed-by-default lints (in alphabetical order)
// See also: <https://doc.rust-lang.org/rustc/lints>
#![warn(future_incompatible)]
#![warn(let_underscore)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(unused)]
// Clippy lints
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// TODO: Add missing docs
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod ffmpeg;
pub mod fmt;
pub mod io;

use std::{io::Error as IoError, path::PathBuf, result::Result as StdResult};

use genflac_core::{
    audio::{SampleRateHz, buffer::AudioBufferInvalidity},
    metadata::MetadataError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("external tool not found: {}", .0.display())]
    ToolNotFound(PathBuf),

    #[error("incompatible external tool {}: missing {}", .program.display(), .missing.join(", "))]
    IncompatibleTool {
        program: PathBuf,
        missing: Vec<String>,
    },

    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("missing output path")]
    MissingOutputPath,

    #[error("invalid audio buffer: {0:?}")]
    InvalidAudioBuffer(Vec<AudioBufferInvalidity>),

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(SampleRateHz),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = StdResult<T, Error>;

pub mod prelude {
    pub use super::{Error, Result};
}
