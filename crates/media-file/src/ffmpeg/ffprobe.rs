// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Reading back tags from encoded files with `ffprobe`.

use std::{collections::BTreeMap, ffi::OsStr, path::Path};

use serde::Deserialize;

use crate::{config::FfmpegConfig, prelude::*};

pub const COMMENT_TAG: &str = "comment";

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    format: ProbeTags,
    #[serde(default)]
    streams: Vec<ProbeTags>,
}

impl ProbeOutput {
    fn find_tag(&self, key: &str) -> Option<&str> {
        std::iter::once(&self.format)
            .chain(&self.streams)
            .flat_map(|section| &section.tags)
            .find_map(|(tag_key, value)| {
                tag_key
                    .eq_ignore_ascii_case(key)
                    .then_some(value.as_str())
            })
    }
}

/// Extracts a tag value from the JSON output of `ffprobe`.
///
/// Keys are matched case-insensitively. Container tags take
/// precedence over stream tags.
pub fn parse_probed_tag(probe_json: &str, key: &str) -> Result<Option<String>> {
    let output: ProbeOutput = serde_json::from_str(probe_json)?;
    Ok(output.find_tag(key).map(ToOwned::to_owned))
}

/// Reads the comment tag that has been embedded into a media file.
pub fn probe_comment(config: &FfmpegConfig, media_path: &Path) -> Result<Option<String>> {
    let probe_json = super::run_for_stdout(
        &config.probe_program,
        [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-show_entries"),
            OsStr::new("format_tags:stream_tags"),
            OsStr::new("-of"),
            OsStr::new("json"),
            media_path.as_os_str(),
        ],
    )?;
    let comment = parse_probed_tag(&probe_json, COMMENT_TAG)?;
    if comment.is_none() {
        log::debug!(
            "No {COMMENT_TAG} tag found in {media_path}",
            media_path = media_path.display()
        );
    }
    Ok(comment)
}
