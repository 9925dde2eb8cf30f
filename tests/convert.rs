use std::fs;
use std::path::Path;

use pcmwrap::wav::{inspect, HEADER_LEN};
use pcmwrap::{convert, convert_with_config, Config, ErrorKind, FormatDescriptor};

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write raw input");
    path
}

#[test]
fn sample_region_is_copied_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    // a ramp across the full byte range, including an odd trailing byte
    let samples: Vec<u8> = (0..=255u8).chain([7]).collect();
    let input = write_raw(dir.path(), "ramp.raw", &samples);
    let output = dir.path().join("ramp.wav");

    let format = FormatDescriptor::new(2, 2, 44_100).expect("valid format");
    let written = convert(&input, &output, &format).expect("convert");
    assert_eq!(written, output);

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(&bytes[HEADER_LEN..], samples.as_slice());
    assert_eq!(read_u32(&bytes, 4) as usize, bytes.len() - 8);
}

#[test]
fn header_fields_for_mono_16bit_48k() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "ten.raw", &[1, 0, 2, 0, 3, 0, 4, 0, 5, 0]);
    let output = dir.path().join("ten.wav");

    let format = FormatDescriptor::new(1, 2, 48_000).expect("valid format");
    convert(&input, &output, &format).expect("convert");

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(read_u32(&bytes, 40), 10);
    assert_eq!(read_u32(&bytes, 28), 96_000);
    assert_eq!(read_u16(&bytes, 32), 2);
    assert_eq!(read_u16(&bytes, 34), 16);
    assert_eq!(read_u16(&bytes, 22), 1);
    assert_eq!(read_u32(&bytes, 24), 48_000);
}

#[test]
fn empty_input_produces_bare_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "empty.raw", &[]);
    let output = dir.path().join("empty.wav");

    let format = FormatDescriptor::new(1, 2, 48_000).expect("valid format");
    convert(&input, &output, &format).expect("convert");

    let bytes = fs::read(&output).expect("read output");
    assert_eq!(bytes.len(), 44);
    assert_eq!(read_u32(&bytes, 4), 36);
    assert_eq!(read_u32(&bytes, 40), 0);

    let header = inspect(&output).expect("inspect");
    assert_eq!(header.data_len, 0);
}

#[test]
fn repeated_conversion_overwrites_identically() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "tone.raw", &[0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
    let output = dir.path().join("tone.wav");
    // stale, longer content must be replaced rather than appended to
    fs::write(&output, vec![0xAA; 512]).expect("seed output");

    let format = FormatDescriptor::new(1, 1, 8_000).expect("valid format");
    convert(&input, &output, &format).expect("first convert");
    let first = fs::read(&output).expect("read first");
    convert(&input, &output, &format).expect("second convert");
    let second = fs::read(&output).expect("read second");

    assert_eq!(first, second);
    assert_eq!(first.len(), HEADER_LEN + 6);
}

fn config_for(input: &Path, output: &Path) -> Config {
    Config {
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn zero_format_fields_never_create_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "in.raw", &[1, 2, 3, 4]);
    let output = dir.path().join("never.wav");

    let base = config_for(&input, &output);
    for config in [
        Config {
            channels: 0,
            ..base.clone()
        },
        Config {
            sample_width: 0,
            ..base.clone()
        },
        Config {
            sample_rate: 0,
            ..base.clone()
        },
    ] {
        let err = convert_with_config(&config, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(!output.exists());
    }

    // same paths, valid fields
    convert_with_config(&base, None, None).expect("valid convert");
    assert!(output.exists());
}

#[test]
fn invalid_configuration_leaves_existing_output_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "in.raw", &[9; 16]);
    let output = dir.path().join("keep.wav");
    fs::write(&output, b"previous").expect("seed output");

    let config = Config {
        sample_width: -2,
        ..config_for(&input, &output)
    };
    let err = convert_with_config(&config, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    assert_eq!(fs::read(&output).expect("read"), b"previous");
}

#[test]
fn explicit_paths_override_configured_ones() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "other.raw", &[5, 6]);
    let output = dir.path().join("other.wav");
    let config = config_for(&dir.path().join("unused.raw"), &dir.path().join("unused.wav"));

    let written = convert_with_config(&config, Some(input.as_path()), Some(output.as_path()))
        .expect("convert");
    assert_eq!(written, output);
    assert!(!dir.path().join("unused.wav").exists());
    assert_eq!(&fs::read(&output).expect("read")[HEADER_LEN..], &[5, 6]);
}

#[test]
fn default_config_keeps_timecode_duration() {
    let dir = tempfile::tempdir().expect("tempdir");
    // one second of 8-bit mono timecode at 48 kHz
    let samples: Vec<u8> = (0..48_000u32)
        .map(|i| if i % 20 < 10 { 0x20 } else { 0xE0 })
        .collect();
    let input = write_raw(dir.path(), "timecode.raw", &samples);
    let output = dir.path().join("timecode.wav");

    convert_with_config(&config_for(&input, &output), None, None).expect("convert");

    let header = inspect(&output).expect("inspect");
    assert_eq!(header.bits_per_sample, 8);
    assert_eq!(header.block_align, 1);
    assert_eq!(header.byte_rate, 48_000);
    assert_eq!(header.data_len / u32::from(header.block_align), header.sample_rate);
}

#[test]
fn missing_input_is_input_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.wav");

    let format = FormatDescriptor::new(1, 2, 48_000).expect("valid format");
    let err = convert(&dir.path().join("nope.raw"), &output, &format).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InputUnreadable);
    assert!(!output.exists());
}

#[test]
fn directory_as_output_is_output_unwritable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_raw(dir.path(), "in.raw", &[0, 0]);

    let format = FormatDescriptor::new(1, 2, 48_000).expect("valid format");
    let err = convert(&input, dir.path(), &format).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutputUnwritable);
}
