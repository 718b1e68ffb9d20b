// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod buffer;
pub mod channel;
pub mod signal;

pub use self::{buffer::AudioBuffer, channel::ChannelCount, signal::SampleRateHz};
