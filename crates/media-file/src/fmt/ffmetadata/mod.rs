// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Sidecar files in the FFmetadata format.
//!
//! See also: <https://ffmpeg.org/ffmpeg-formats.html#Metadata-2>

use std::{
    ffi::OsString,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::prelude::*;

/// First line of every FFmetadata file, including the format version.
pub const HEADER: &str = ";FFMETADATA1";

/// Suffix appended to the target path for naming the sidecar file.
pub const SIDECAR_SUFFIX: &str = ".ffmetadata.ini";

const COMMENT_KEY_PREFIX: &str = "comment=";

#[must_use]
pub fn sidecar_path(target_path: &Path) -> PathBuf {
    let mut path = OsString::from(target_path.as_os_str());
    path.push(SIDECAR_SUFFIX);
    path.into()
}

/// Renders the contents of a sidecar file with a single comment tag.
///
/// The comment must not contain any unescaped line breaks.
#[must_use]
pub fn render_sidecar(comment: &str) -> String {
    debug_assert!(!comment.contains(['\n', '\r']));
    format!("{HEADER}\n{COMMENT_KEY_PREFIX}{comment}\n")
}

/// Extracts the raw value of the first comment tag.
///
/// Returns `None` if the header is missing or if the
/// contents do not contain a comment tag.
#[must_use]
pub fn parse_sidecar_comment(contents: &str) -> Option<&str> {
    let mut lines = contents.lines();
    if lines.next()?.trim_end() != HEADER {
        return None;
    }
    lines.find_map(|line| line.strip_prefix(COMMENT_KEY_PREFIX))
}

/// A sidecar file that is deleted when dropped.
#[derive(Debug)]
pub struct Sidecar {
    path: PathBuf,
    retained: bool,
}

impl Sidecar {
    /// Creates or overwrites the sidecar file.
    pub fn create(path: PathBuf, contents: &str) -> Result<Self> {
        fs::write(&path, contents)?;
        log::debug!("Created sidecar file {path}", path = path.display());
        Ok(Self {
            path,
            retained: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the file on disk and returns its path.
    #[must_use]
    pub fn retain(mut self) -> PathBuf {
        self.retained = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for Sidecar {
    fn drop(&mut self) {
        if self.retained {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!(
                    "Deleted sidecar file {path}",
                    path = self.path.display()
                );
            }
            Err(err) if err.kind() == ErrorKind::NotFound => (),
            Err(err) => {
                log::warn!(
                    "Failed to delete sidecar file {path}: {err}",
                    path = self.path.display()
                );
            }
        }
    }
}
