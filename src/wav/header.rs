use tracing::debug;

use super::format::FormatDescriptor;
use crate::error::{ConvertError, HeaderError};

pub const HEADER_LEN: usize = 44;

const FMT_CHUNK_SIZE: u32 = 16;
const PCM_FORMAT: u16 = 1;
// RIFF size counts everything after its own 8-byte preamble
const RIFF_OVERHEAD: u32 = HEADER_LEN as u32 - 8;

/// Canonical 44-byte RIFF/WAVE header for uncompressed PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Header describing `data_len` bytes of samples laid out as `format`.
    pub fn new(data_len: usize, format: &FormatDescriptor) -> Result<Self, ConvertError> {
        let data_len = u32::try_from(data_len)
            .ok()
            .filter(|len| len.checked_add(RIFF_OVERHEAD).is_some())
            .ok_or(ConvertError::PayloadTooLarge(data_len))?;

        Ok(Self {
            channels: format.channels(),
            sample_rate: format.sample_rate(),
            byte_rate: format.byte_rate(),
            block_align: format.block_align(),
            bits_per_sample: format.bits_per_sample(),
            data_len,
        })
    }

    pub fn riff_len(&self) -> u32 {
        RIFF_OVERHEAD + self.data_len
    }

    /// Size of the complete file this header introduces.
    pub fn file_len(&self) -> u64 {
        HEADER_LEN as u64 + u64::from(self.data_len)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(HEADER_LEN);

        // RIFF header
        buffer.extend_from_slice(b"RIFF");
        buffer.extend_from_slice(&self.riff_len().to_le_bytes());
        buffer.extend_from_slice(b"WAVE");

        // fmt chunk
        buffer.extend_from_slice(b"fmt ");
        buffer.extend_from_slice(&FMT_CHUNK_SIZE.to_le_bytes());
        buffer.extend_from_slice(&PCM_FORMAT.to_le_bytes());
        buffer.extend_from_slice(&self.channels.to_le_bytes());
        buffer.extend_from_slice(&self.sample_rate.to_le_bytes());
        buffer.extend_from_slice(&self.byte_rate.to_le_bytes());
        buffer.extend_from_slice(&self.block_align.to_le_bytes());
        buffer.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        // data chunk
        buffer.extend_from_slice(b"data");
        buffer.extend_from_slice(&self.data_len.to_le_bytes());

        debug!(
            "Built WAV header: channels={} rate={}Hz bits={} data={} bytes",
            self.channels, self.sample_rate, self.bits_per_sample, self.data_len
        );

        buffer
    }

    /// Reads a canonical header back from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_LEN {
            return Err(HeaderError::Truncated(bytes.len()));
        }

        expect_marker(bytes, 0, "RIFF")?;
        expect_marker(bytes, 8, "WAVE")?;
        expect_marker(bytes, 12, "fmt ")?;
        expect_marker(bytes, 36, "data")?;

        let fmt_len = read_u32(bytes, 16);
        if fmt_len != FMT_CHUNK_SIZE {
            return Err(HeaderError::FmtSize(fmt_len));
        }
        let format_code = read_u16(bytes, 20);
        if format_code != PCM_FORMAT {
            return Err(HeaderError::NotPcm(format_code));
        }

        let header = Self {
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_len: read_u32(bytes, 40),
        };

        let expected_align = u32::from(header.channels) * u32::from(header.bits_per_sample / 8);
        check("block align", u32::from(header.block_align), expected_align)?;
        check(
            "byte rate",
            header.byte_rate,
            header
                .sample_rate
                .wrapping_mul(u32::from(header.block_align)),
        )?;
        check(
            "RIFF size",
            read_u32(bytes, 4),
            header.data_len.wrapping_add(RIFF_OVERHEAD),
        )?;

        Ok(header)
    }
}

fn expect_marker(bytes: &[u8], offset: usize, expected: &'static str) -> Result<(), HeaderError> {
    if &bytes[offset..offset + 4] == expected.as_bytes() {
        Ok(())
    } else {
        Err(HeaderError::BadMarker { offset, expected })
    }
}

fn check(field: &'static str, actual: u32, expected: u32) -> Result<(), HeaderError> {
    if actual == expected {
        Ok(())
    } else {
        Err(HeaderError::Inconsistent {
            field,
            actual,
            expected,
        })
    }
}

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
