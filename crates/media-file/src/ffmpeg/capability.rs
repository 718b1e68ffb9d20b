// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{collections::BTreeSet, fmt};

use super::args::{METADATA_INPUT_FORMAT, OUTPUT_FORMAT, RAW_INPUT_FORMAT};

const VERSION_PREFIX: &str = "ffmpeg version ";

/// Extracts the version from the output of `ffmpeg -version`.
#[must_use]
pub fn parse_version(version_info: &str) -> Option<&str> {
    version_info
        .lines()
        .find_map(|line| line.trim_start().strip_prefix(VERSION_PREFIX))
        .and_then(|rest| rest.split_whitespace().next())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Demuxer(&'static str),
    Muxer(&'static str),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demuxer(name) => write!(f, "demuxer {name}"),
            Self::Muxer(name) => write!(f, "muxer {name}"),
        }
    }
}

pub const REQUIREMENTS: [Requirement; 3] = [
    Requirement::Demuxer(RAW_INPUT_FORMAT),
    Requirement::Demuxer(METADATA_INPUT_FORMAT),
    Requirement::Muxer(OUTPUT_FORMAT),
];

/// Supported file formats as listed by `ffmpeg -formats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formats {
    pub demuxers: BTreeSet<String>,
    pub muxers: BTreeSet<String>,
}

fn is_flags_token(token: &str) -> bool {
    token.chars().all(|c| matches!(c, 'D' | 'E' | 'd' | '.'))
}

impl Formats {
    /// Parses the format table.
    ///
    /// Each row starts with flag columns (`D` for demuxing, `E` for
    /// muxing, `d` for devices) followed by a comma-separated list
    /// of names. Rows before the `--` separator are legend.
    #[must_use]
    pub fn parse(formats_info: &str) -> Self {
        let mut formats = Self::default();
        let rows = formats_info
            .lines()
            .skip_while(|line| !line.trim().starts_with("--"))
            .skip(1);
        for row in rows {
            let mut tokens = row.split_whitespace().peekable();
            let mut flags = String::new();
            while let Some(token) = tokens.next_if(|token| is_flags_token(token)) {
                flags.push_str(token);
            }
            let Some(names) = tokens.next() else {
                continue;
            };
            for name in names.split(',') {
                if flags.contains('D') {
                    formats.demuxers.insert(name.to_owned());
                }
                if flags.contains('E') {
                    formats.muxers.insert(name.to_owned());
                }
            }
        }
        formats
    }

    #[must_use]
    pub fn meets(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Demuxer(name) => self.demuxers.contains(name),
            Requirement::Muxer(name) => self.muxers.contains(name),
        }
    }

    #[must_use]
    pub fn missing_requirements(&self) -> Vec<String> {
        REQUIREMENTS
            .into_iter()
            .filter(|requirement| !self.meets(*requirement))
            .map(|requirement| requirement.to_string())
            .collect()
    }
}
