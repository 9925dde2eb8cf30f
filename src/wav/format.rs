use crate::error::ConvertError;

/// Widest sample for which a signed little-endian interpretation is defined.
pub const MAX_SAMPLE_WIDTH: u16 = 4;

/// Layout of a raw PCM stream: interleaving width, bytes per sample, and rate.
///
/// Construct through [`FormatDescriptor::new`] so every value that reaches the
/// header writer has already been range checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    channels: u16,
    sample_width: u16,
    sample_rate: u32,
}

impl FormatDescriptor {
    /// Accepts the wide integer types config files deserialize into and
    /// narrows them to the header field widths.
    pub fn new(channels: u32, sample_width: u32, sample_rate: u32) -> Result<Self, ConvertError> {
        if channels == 0 {
            return Err(ConvertError::invalid("channel count must be greater than zero"));
        }
        if sample_width == 0 {
            return Err(ConvertError::invalid("sample width must be greater than zero"));
        }
        if sample_rate == 0 {
            return Err(ConvertError::invalid("sample rate must be greater than zero"));
        }

        let channels = u16::try_from(channels).map_err(|_| {
            ConvertError::invalid(format!("channel count {channels} exceeds {}", u16::MAX))
        })?;
        if sample_width > u32::from(MAX_SAMPLE_WIDTH) {
            return Err(ConvertError::invalid(format!(
                "sample width {sample_width} bytes exceeds {MAX_SAMPLE_WIDTH}"
            )));
        }
        let sample_width = sample_width as u16;

        // block_align is a u16 in the header and byte_rate a u32
        let block_align = u32::from(channels) * u32::from(sample_width);
        if block_align > u32::from(u16::MAX) {
            return Err(ConvertError::invalid(format!(
                "frame size {block_align} bytes does not fit the block alignment field"
            )));
        }
        if u64::from(sample_rate) * u64::from(block_align) > u64::from(u32::MAX) {
            return Err(ConvertError::invalid(format!(
                "byte rate for {sample_rate}Hz with {block_align}-byte frames overflows 32 bits"
            )));
        }

        Ok(Self {
            channels,
            sample_width,
            sample_rate,
        })
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// Bytes per frame, one sample for every channel.
    pub fn block_align(&self) -> u16 {
        self.channels * self.sample_width
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}
