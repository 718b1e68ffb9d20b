// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::time::Duration;

use bytes::{BufMut as _, Bytes, BytesMut};
use semval::prelude::*;

use super::{
    channel::{ChannelCount, ChannelCountInvalidity, NumberOfChannels},
    signal::SampleRateHz,
};

pub type SampleType = f32;

/// Size of a single encoded sample in bytes.
pub const SAMPLE_SIZE: usize = std::mem::size_of::<SampleType>();

/// A borrowed buffer of 32-bit floating point samples.
///
/// The shape follows the convention of n-dimensional arrays: a buffer
/// with a rank of 0 or 1 is mono, otherwise the second dimension
/// determines the number of channels. Multi-channel samples are
/// interleaved, i.e. grouped by frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<'a> {
    samples: &'a [SampleType],
    shape: Vec<usize>,
}

impl<'a> AudioBuffer<'a> {
    #[must_use]
    pub fn mono(samples: &'a [SampleType]) -> Self {
        Self {
            samples,
            shape: vec![samples.len()],
        }
    }

    /// Interleaved samples with shape `[frames, channels]`.
    ///
    /// Trailing samples that do not fill a whole frame are still
    /// referenced and make the buffer invalid.
    #[must_use]
    pub fn interleaved(samples: &'a [SampleType], channel_count: ChannelCount) -> Self {
        let channels = usize::from(channel_count.value());
        let frames = samples.len().checked_div(channels).unwrap_or_default();
        Self {
            samples,
            shape: vec![frames, channels],
        }
    }

    #[must_use]
    pub fn with_shape(samples: &'a [SampleType], shape: impl Into<Vec<usize>>) -> Self {
        Self {
            samples,
            shape: shape.into(),
        }
    }

    #[must_use]
    pub const fn samples(&self) -> &'a [SampleType] {
        self.samples
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub fn channel_count(&self) -> ChannelCount {
        if self.rank() <= 1 {
            return ChannelCount::MONO;
        }
        let channels = self.shape[1].min(usize::from(NumberOfChannels::MAX));
        ChannelCount::new(channels as NumberOfChannels)
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        let channels = usize::from(self.channel_count().value());
        self.samples.len().checked_div(channels).unwrap_or_default()
    }

    #[must_use]
    pub fn duration(&self, sample_rate: SampleRateHz) -> Option<Duration> {
        let rate = sample_rate.to_inner();
        if rate == 0 {
            return None;
        }
        let frames = self.frame_count() as f64;
        Some(Duration::from_secs_f64(frames / f64::from(rate)))
    }

    /// Raw PCM bytes as expected by the `f32le` input format.
    #[must_use]
    pub fn to_pcm_f32le(&self) -> Bytes {
        let mut bytes = BytesMut::with_capacity(self.samples.len() * SAMPLE_SIZE);
        for sample in self.samples {
            bytes.put_f32_le(*sample);
        }
        bytes.freeze()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioBufferInvalidity {
    Empty,
    ShapeMismatch,
    ChannelCount(ChannelCountInvalidity),
}

impl Validate for AudioBuffer<'_> {
    type Invalidity = AudioBufferInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let shape_len = self.shape.iter().product::<usize>();
        ValidationContext::new()
            .invalidate_if(self.samples.is_empty(), Self::Invalidity::Empty)
            .invalidate_if(
                shape_len != self.samples.len(),
                Self::Invalidity::ShapeMismatch,
            )
            .validate_with(&self.channel_count(), Self::Invalidity::ChannelCount)
            .into()
    }
}
