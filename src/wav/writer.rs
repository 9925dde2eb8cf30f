use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::format::FormatDescriptor;
use super::header::{WavHeader, HEADER_LEN};
use super::pcm::PcmView;
use crate::config::Config;
use crate::error::{ConvertError, InspectError};
use crate::logging::{record_conversion, ConversionRecord};

/// Reads headerless PCM from `input` and writes it as a WAV file at `output`.
///
/// The whole input is loaded before the output is opened, so a missing or
/// unreadable source never creates or truncates the destination.
pub fn convert(
    input: &Path,
    output: &Path,
    format: &FormatDescriptor,
) -> Result<PathBuf, ConvertError> {
    let samples = fs::read(input).map_err(|err| ConvertError::input(input, err))?;
    debug!("Read {} bytes of raw PCM from {:?}", samples.len(), input);

    write_container(&samples, format, output)?;
    record_conversion(|| {
        ConversionRecord::new(
            Some(input),
            output,
            format,
            &PcmView::new(&samples, *format),
        )
    });

    Ok(output.to_path_buf())
}

/// Writes `samples` verbatim behind a header describing `format`.
pub fn convert_bytes(
    samples: &[u8],
    format: &FormatDescriptor,
    output: &Path,
) -> Result<PathBuf, ConvertError> {
    write_container(samples, format, output)?;
    record_conversion(|| {
        ConversionRecord::new(None, output, format, &PcmView::new(samples, *format))
    });

    Ok(output.to_path_buf())
}

/// Runs one conversion as configured. `input` and `output` override the
/// configured paths. The format is validated before either file is touched.
pub fn convert_with_config(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<PathBuf, ConvertError> {
    let format = config.format()?;
    let input = input.unwrap_or(config.input_path.as_path());
    let output = output.unwrap_or(config.output_path.as_path());

    info!(
        "Converting {:?} as {} ch / {} bytes / {} Hz",
        input,
        format.channels(),
        format.sample_width(),
        format.sample_rate()
    );

    convert(input, output, &format)
}

fn write_container(
    samples: &[u8],
    format: &FormatDescriptor,
    output: &Path,
) -> Result<WavHeader, ConvertError> {
    let header = WavHeader::new(samples.len(), format)?;

    let file = File::create(output).map_err(|err| ConvertError::output(output, err))?;
    write_parts(BufWriter::new(file), &header, samples)
        .map_err(|err| ConvertError::output(output, err))?;

    info!(
        "Wrote {} bytes to {:?} ({} byte header)",
        header.file_len(),
        output,
        HEADER_LEN
    );

    Ok(header)
}

fn write_parts<W: Write>(mut writer: W, header: &WavHeader, samples: &[u8]) -> io::Result<()> {
    writer.write_all(&header.to_bytes())?;
    writer.write_all(samples)?;
    writer.flush()
}

/// Parses the header of an existing WAV file.
pub fn inspect(path: &Path) -> Result<WavHeader, InspectError> {
    let mut prefix = Vec::with_capacity(HEADER_LEN);
    File::open(path)
        .and_then(|file| file.take(HEADER_LEN as u64).read_to_end(&mut prefix))
        .map_err(|source| InspectError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    WavHeader::parse(&prefix).map_err(|source| InspectError::Header {
        path: path.to_path_buf(),
        source,
    })
}
