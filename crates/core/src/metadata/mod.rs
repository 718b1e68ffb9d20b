// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Provenance metadata of a generation.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Key of the mandatory prompt entry.
pub const PROMPT_KEY: &str = "prompt";

const ESCAPED_QUOTE: &str = "\\\"";

const ESCAPED_NEWLINE: &str = "\\\n";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("missing prompt")]
    MissingPrompt,

    #[error("prompt is not a string: {0}")]
    PromptNotAString(Value),

    #[error("metadata is not a JSON object")]
    NotAnObject,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Escapes a prompt for embedding into a line-oriented text container.
///
/// Quotes are escaped before newlines, otherwise the backslashes of the
/// newline continuations would be escaped again.
#[must_use]
pub fn escape_prompt(prompt: &str) -> String {
    prompt
        .replace('"', ESCAPED_QUOTE)
        .replace('\n', ESCAPED_NEWLINE)
}

/// Reverts [`escape_prompt()`].
#[must_use]
pub fn unescape_prompt(escaped: &str) -> String {
    escaped
        .replace(ESCAPED_NEWLINE, "\n")
        .replace(ESCAPED_QUOTE, "\"")
}

/// An insertion-ordered mapping of JSON values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    #[must_use]
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        let Self(map) = self;
        map
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn prompt(&self) -> Result<&str, MetadataError> {
        match self.0.get(PROMPT_KEY) {
            None => Err(MetadataError::MissingPrompt),
            Some(Value::String(prompt)) => Ok(prompt),
            Some(value) => Err(MetadataError::PromptNotAString(value.clone())),
        }
    }

    /// A copy with the prompt escaped by [`escape_prompt()`].
    ///
    /// All other entries are cloned unmodified and keep their order.
    pub fn with_escaped_prompt(&self) -> Result<Self, MetadataError> {
        self.with_prompt_mapped(escape_prompt)
    }

    /// A copy with the prompt unescaped by [`unescape_prompt()`].
    pub fn with_unescaped_prompt(&self) -> Result<Self, MetadataError> {
        self.with_prompt_mapped(unescape_prompt)
    }

    fn with_prompt_mapped(
        &self,
        map_prompt: impl FnOnce(&str) -> String,
    ) -> Result<Self, MetadataError> {
        let prompt = map_prompt(self.prompt()?);
        let mut mapped = self.clone();
        mapped.0.insert(PROMPT_KEY.to_owned(), Value::String(prompt));
        Ok(mapped)
    }

    /// Compact JSON without escaping of non-ASCII characters.
    pub fn to_compact_json(&self) -> Result<String, MetadataError> {
        serde_json::to_string(&self.0).map_err(Into::into)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        match serde_json::from_str(json)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(MetadataError::NotAnObject),
        }
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Metadata {
    type Error = MetadataError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(MetadataError::NotAnObject),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
