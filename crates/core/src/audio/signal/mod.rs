// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use semval::prelude::*;

///////////////////////////////////////////////////////////////////////
// SampleRate
///////////////////////////////////////////////////////////////////////

pub type SamplesPerSecond = u32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SampleRateHz(SamplesPerSecond);

impl SampleRateHz {
    #[must_use]
    pub const fn unit_of_measure() -> &'static str {
        "Hz"
    }

    #[must_use]
    pub const fn min() -> Self {
        Self(1)
    }

    /// The highest sample rate accepted by the FLAC format.
    #[must_use]
    pub const fn max() -> Self {
        Self(1_048_575)
    }

    #[must_use]
    pub const fn of_compact_disc() -> Self {
        Self(44_100)
    }

    #[must_use]
    pub const fn of_studio_48k() -> Self {
        Self(48_000)
    }

    #[must_use]
    pub const fn from_inner(inner: SamplesPerSecond) -> Self {
        Self(inner)
    }

    #[must_use]
    pub const fn to_inner(self) -> SamplesPerSecond {
        let Self(inner) = self;
        inner
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        <Self as IsValid>::is_valid(self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleRateHzInvalidity {
    Min(SampleRateHz),
    Max(SampleRateHz),
}

impl Validate for SampleRateHz {
    type Invalidity = SampleRateHzInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(*self < Self::min(), Self::Invalidity::Min(Self::min()))
            .invalidate_if(*self > Self::max(), Self::Invalidity::Max(Self::max()))
            .into()
    }
}

impl fmt::Display for SampleRateHz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_inner(), Self::unit_of_measure())
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
