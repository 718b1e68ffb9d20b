// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    collections::BTreeMap,
    ffi::OsStr,
    path::{Path, PathBuf},
};

pub const FLAC_KIND: &str = "flac";

pub const WAV_KIND: &str = "wav";

/// Output file paths of a generation, keyed by their kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFiles {
    paths: BTreeMap<String, PathBuf>,
}

impl OutputFiles {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    #[must_use]
    pub fn with(mut self, kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.insert(kind, path);
        self
    }

    pub fn insert(
        &mut self,
        kind: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Option<PathBuf> {
        self.paths.insert(kind.into(), path.into())
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Path> {
        self.paths.get(kind).map(PathBuf::as_path)
    }

    /// The target path of the FLAC file.
    ///
    /// Falls back to the path of the WAV file with its extension
    /// replaced if no explicit FLAC path is available.
    #[must_use]
    pub fn flac_path(&self) -> Option<PathBuf> {
        if let Some(path) = self.get(FLAC_KIND) {
            return Some(path.to_path_buf());
        }
        let wav_path = self.get(WAV_KIND)?;
        let is_wav = wav_path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(WAV_KIND));
        if !is_wav {
            log::debug!(
                "Cannot derive FLAC path from {wav_path}",
                wav_path = wav_path.display()
            );
            return None;
        }
        Some(wav_path.with_extension(FLAC_KIND))
    }
}

impl<K, P> FromIterator<(K, P)> for OutputFiles
where
    K: Into<String>,
    P: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let paths = iter
            .into_iter()
            .map(|(kind, path)| (kind.into(), path.into()))
            .collect();
        Self { paths }
    }
}
