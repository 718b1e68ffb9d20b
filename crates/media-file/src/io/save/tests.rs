// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{cell::RefCell, fs, io};

use genflac_core::metadata::unescape_prompt;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::{ffmpeg::TranscodeOutput, fmt::ffmetadata::parse_sidecar_comment};

const SAMPLE_RATE: SampleRateHz = SampleRateHz::of_studio_48k();

#[derive(Debug)]
struct Invocation {
    args: Vec<String>,
    input: Vec<u8>,
    sidecar_contents: Option<String>,
}

#[derive(Debug)]
struct FakeTranscoder {
    output: TranscodeOutput,
    invocations: RefCell<Vec<Invocation>>,
}

impl FakeTranscoder {
    fn exiting_with(exit_code: Option<i32>, stderr: &[u8]) -> Self {
        Self {
            output: TranscodeOutput {
                exit_code,
                stderr: stderr.to_vec(),
            },
            invocations: Default::default(),
        }
    }

    fn succeeding() -> Self {
        Self::exiting_with(Some(0), b"")
    }

    fn single_invocation(&self) -> std::cell::Ref<'_, Invocation> {
        let invocations = self.invocations.borrow();
        assert_eq!(1, invocations.len());
        std::cell::Ref::map(invocations, |invocations| &invocations[0])
    }
}

impl Transcoder for FakeTranscoder {
    fn transcode(&self, args: &[String], input: &[u8]) -> Result<TranscodeOutput> {
        // The sidecar is the second input
        let sidecar_contents = args
            .windows(2)
            .filter(|pair| pair[0] == "-i")
            .nth(1)
            .and_then(|pair| fs::read_to_string(&pair[1]).ok());
        self.invocations.borrow_mut().push(Invocation {
            args: args.to_vec(),
            input: input.to_vec(),
            sidecar_contents,
        });
        Ok(self.output.clone())
    }
}

#[derive(Debug)]
struct BrokenTranscoder;

impl Transcoder for BrokenTranscoder {
    fn transcode(&self, _args: &[String], _input: &[u8]) -> Result<TranscodeOutput> {
        Err(io::Error::other("broken").into())
    }
}

struct Fixture {
    temp_dir: TempDir,
    samples: Vec<f32>,
    metadata: Metadata,
}

impl Fixture {
    fn new() -> Self {
        let metadata = Metadata::try_from(json!({
            "_version": "0.0.1",
            "_type": "musicgen",
            "prompt": "a \"quoted\"\nline",
            "seed": "1542369587",
        }))
        .unwrap();
        Self {
            temp_dir: tempfile::tempdir().unwrap(),
            // 1 second of silence
            samples: vec![0.0; 48_000],
            metadata,
        }
    }

    fn flac_path(&self) -> PathBuf {
        self.temp_dir.path().join("audio.flac")
    }

    fn files(&self) -> OutputFiles {
        OutputFiles::new().with("flac", self.flac_path())
    }

    fn buffer(&self) -> AudioBuffer<'_> {
        AudioBuffer::mono(&self.samples)
    }
}

#[test]
fn save_successfully() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());

    let outcome = writer
        .save(
            &fixture.buffer(),
            &fixture.files(),
            &fixture.metadata,
            SAMPLE_RATE,
        )
        .unwrap();

    assert!(outcome.is_saved());
    assert_eq!(fixture.flac_path().as_path(), outcome.flac_path());
    assert!(outcome.to_string().contains("audio.flac"));
    let SaveOutcome::Saved(saved) = outcome else {
        unreachable!();
    };
    assert_eq!(fixture.metadata.with_escaped_prompt().unwrap(), saved.metadata);
    assert_eq!(None, saved.sidecar_path);

    let invocation = transcoder.single_invocation();
    let sidecar_path = format!("{}.ffmetadata.ini", fixture.flac_path().display());
    let flac_path = fixture.flac_path().display().to_string();
    let expected_args: Vec<String> = [
        "-f",
        "f32le",
        "-ac",
        "1",
        "-ar",
        "48000",
        "-i",
        "pipe:",
        "-i",
        &sidecar_path,
        "-map",
        "0",
        "-f",
        "flac",
        "-loglevel",
        "error",
        "-map_metadata",
        "1",
        &flac_path,
        "-y",
    ]
    .into_iter()
    .map(ToOwned::to_owned)
    .collect();
    assert_eq!(expected_args, invocation.args);
    assert_eq!(48_000 * 4, invocation.input.len());
    assert!(invocation.input.iter().all(|byte| *byte == 0));

    // The sidecar existed while transcoding and has been deleted afterwards
    let sidecar_contents = invocation.sidecar_contents.as_deref().unwrap();
    assert!(sidecar_contents.starts_with(";FFMETADATA1\ncomment="));
    assert!(!Path::new(&sidecar_path).exists());
}

#[test]
fn sidecar_comment_reproduces_the_original_metadata() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());
    let original = fixture.metadata.clone();

    writer
        .save(
            &fixture.buffer(),
            &fixture.files(),
            &fixture.metadata,
            SAMPLE_RATE,
        )
        .unwrap();

    // The metadata of the caller is not modified
    assert_eq!(original, fixture.metadata);

    let invocation = transcoder.single_invocation();
    let sidecar_contents = invocation.sidecar_contents.as_deref().unwrap();
    let comment = parse_sidecar_comment(sidecar_contents).unwrap();
    assert!(!comment.contains('\n'));
    let embedded = Metadata::from_json_str(comment).unwrap();
    assert_eq!(
        "a \\\"quoted\\\"\\\nline",
        embedded.prompt().unwrap()
    );
    assert_eq!(
        "a \"quoted\"\nline",
        unescape_prompt(embedded.prompt().unwrap())
    );
    assert_eq!(original, embedded.with_unescaped_prompt().unwrap());
}

#[test]
fn sidecar_comment_preserves_non_ascii() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());
    let metadata = Metadata::try_from(json!({ "prompt": "♪ これはテストです。" })).unwrap();

    writer
        .save(&fixture.buffer(), &fixture.files(), &metadata, SAMPLE_RATE)
        .unwrap();

    let invocation = transcoder.single_invocation();
    assert_eq!(
        ";FFMETADATA1\ncomment={\"prompt\":\"♪ これはテストです。\"}\n",
        invocation.sidecar_contents.as_deref().unwrap()
    );
}

#[test]
fn save_multi_channel_buffer() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());
    let buffer = AudioBuffer::with_shape(&fixture.samples, [16_000, 3]);

    writer
        .save(&buffer, &fixture.files(), &fixture.metadata, SAMPLE_RATE)
        .unwrap();

    let invocation = transcoder.single_invocation();
    let channels_index = invocation
        .args
        .iter()
        .position(|arg| arg == "-ac")
        .unwrap();
    assert_eq!("3", invocation.args[channels_index + 1]);
}

#[test]
fn save_to_path_derived_from_wav() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());
    let files = OutputFiles::new().with("wav", fixture.temp_dir.path().join("audio.wav"));

    let outcome = writer
        .save(&fixture.buffer(), &files, &fixture.metadata, SAMPLE_RATE)
        .unwrap();

    assert_eq!(fixture.flac_path().as_path(), outcome.flac_path());
}

#[test]
fn failed_transcoding_is_reported_not_raised() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::exiting_with(Some(1), b"pipe:: Invalid data found\n");
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());

    let outcome = writer
        .save(
            &fixture.buffer(),
            &fixture.files(),
            &fixture.metadata,
            SAMPLE_RATE,
        )
        .unwrap();

    let SaveOutcome::Failed(failure) = &outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(fixture.flac_path(), failure.flac_path);
    assert_eq!(transcoder.single_invocation().args, failure.args);
    assert_eq!(Some(1), failure.exit_code);
    assert_eq!("pipe:: Invalid data found\n", failure.stderr);
    assert_eq!(None, failure.sidecar_path);

    let report = outcome.to_string();
    assert!(report.starts_with("Failed to save generation to"));
    assert!(report.contains("(exit code 1)"));
    assert!(report.contains("\"-map_metadata\""));
    assert!(report.contains("pipe:: Invalid data found"));

    assert!(!sidecar_path(&fixture.flac_path()).exists());
}

#[test]
fn terminated_transcoding_is_reported() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::exiting_with(None, b"\xff\xfe");
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());

    let outcome = writer
        .save(
            &fixture.buffer(),
            &fixture.files(),
            &fixture.metadata,
            SAMPLE_RATE,
        )
        .unwrap();

    let SaveOutcome::Failed(failure) = outcome else {
        panic!("unexpected outcome");
    };
    assert_eq!(None, failure.exit_code);
    // Invalid UTF-8 is replaced
    assert_eq!("\u{FFFD}\u{FFFD}", failure.stderr);
}

#[test]
fn retain_sidecar() {
    let fixture = Fixture::new();
    let config = WriterConfig {
        retain_sidecar: true,
    };
    for transcoder in [
        FakeTranscoder::succeeding(),
        FakeTranscoder::exiting_with(Some(1), b""),
    ] {
        let writer = FlacWriter::new(&transcoder, config);
        let outcome = writer
            .save(
                &fixture.buffer(),
                &fixture.files(),
                &fixture.metadata,
                SAMPLE_RATE,
            )
            .unwrap();
        let retained_path = match outcome {
            SaveOutcome::Saved(saved) => saved.sidecar_path,
            SaveOutcome::Failed(failure) => failure.sidecar_path,
        }
        .unwrap();
        assert_eq!(sidecar_path(&fixture.flac_path()), retained_path);
        assert!(retained_path.exists());
    }
}

#[test]
fn transcoder_errors_are_propagated() {
    let fixture = Fixture::new();
    let writer = FlacWriter::new(BrokenTranscoder, WriterConfig::default());

    let result = writer.save(
        &fixture.buffer(),
        &fixture.files(),
        &fixture.metadata,
        SAMPLE_RATE,
    );

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!sidecar_path(&fixture.flac_path()).exists());
}

#[test]
fn retain_sidecar_when_transcoder_fails() {
    let fixture = Fixture::new();
    let config = WriterConfig {
        retain_sidecar: true,
    };
    let writer = FlacWriter::new(BrokenTranscoder, config);

    let result = writer.save(
        &fixture.buffer(),
        &fixture.files(),
        &fixture.metadata,
        SAMPLE_RATE,
    );

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(sidecar_path(&fixture.flac_path()).exists());
}

#[test]
fn missing_output_path() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());

    let result = writer.save(
        &fixture.buffer(),
        &OutputFiles::new().with("npz", "audio.npz"),
        &fixture.metadata,
        SAMPLE_RATE,
    );

    assert!(matches!(result, Err(Error::MissingOutputPath)));
    assert!(transcoder.invocations.borrow().is_empty());
}

#[test]
fn invalid_inputs_are_rejected_before_writing_files() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());

    let odd_samples = [0.0; 3];
    let result = writer.save(
        &AudioBuffer::interleaved(&odd_samples, ChannelCount::STEREO),
        &fixture.files(),
        &fixture.metadata,
        SAMPLE_RATE,
    );
    assert!(matches!(result, Err(Error::InvalidAudioBuffer(_))));

    let result = writer.save(
        &fixture.buffer(),
        &fixture.files(),
        &fixture.metadata,
        SampleRateHz::default(),
    );
    assert!(matches!(result, Err(Error::InvalidSampleRate(_))));

    let result = writer.save(
        &fixture.buffer(),
        &fixture.files(),
        &Metadata::try_from(json!({ "seed": 1 })).unwrap(),
        SAMPLE_RATE,
    );
    assert!(matches!(
        result,
        Err(Error::Metadata(MetadataError::MissingPrompt))
    ));

    assert!(transcoder.invocations.borrow().is_empty());
    assert!(!sidecar_path(&fixture.flac_path()).exists());
}

#[test]
fn sidecar_in_missing_directory() {
    let fixture = Fixture::new();
    let transcoder = FakeTranscoder::succeeding();
    let writer = FlacWriter::new(&transcoder, WriterConfig::default());
    let files = OutputFiles::new().with(
        "flac",
        fixture.temp_dir.path().join("missing").join("audio.flac"),
    );

    let result = writer.save(&fixture.buffer(), &files, &fixture.metadata, SAMPLE_RATE);

    assert!(matches!(result, Err(Error::Io(_))));
    assert!(transcoder.invocations.borrow().is_empty());
}
