// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Using wildcard imports consciously is acceptable.
#![allow(clippy::wildcard_imports)]
// TODO: Add missing docs
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod files;
pub mod metadata;

pub use self::{
    audio::{AudioBuffer, ChannelCount, SampleRateHz},
    files::OutputFiles,
    metadata::Metadata,
};

pub mod prelude {
    // Re-export trait methods from semval
    pub use semval::{IsValid, Validate as _};

    pub use crate::{
        audio::{AudioBuffer, ChannelCount, SampleRateHz},
        files::OutputFiles,
        metadata::{Metadata, MetadataError},
    };
}
