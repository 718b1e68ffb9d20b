// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Save generated audio as FLAC files with embedded JSON metadata.
//!
//! The samples are encoded by an external `ffmpeg` process. The metadata
//! is passed through a sidecar file in the FFmetadata format and ends up
//! as a JSON comment tag in the FLAC file.

pub use genflac_core as domain;

#[cfg(feature = "media-file")]
pub use genflac_media_file as media_file;

pub mod prelude {
    pub use genflac_core::prelude::*;

    #[cfg(feature = "media-file")]
    pub use genflac_media_file::{
        config::Config,
        ffmpeg::{FfmpegTool, Transcoder},
        io::save::{FlacWriter, SaveOutcome},
    };
}
