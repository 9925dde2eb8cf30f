use super::format::FormatDescriptor;

/// Read-only view of a raw buffer as signed little-endian samples.
///
/// The bytes are never rewritten; this only decodes them for reporting.
pub struct PcmView<'a> {
    bytes: &'a [u8],
    format: FormatDescriptor,
}

impl<'a> PcmView<'a> {
    pub fn new(bytes: &'a [u8], format: FormatDescriptor) -> Self {
        Self { bytes, format }
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn frame_count(&self) -> usize {
        self.bytes.len() / usize::from(self.format.block_align())
    }

    /// Bytes after the last whole frame. Non-zero means a truncated source.
    pub fn trailing_bytes(&self) -> usize {
        self.bytes.len() % usize::from(self.format.block_align())
    }

    /// Samples in file order, channels interleaved. A trailing partial
    /// sample is skipped.
    pub fn samples(&self) -> impl Iterator<Item = i32> + 'a {
        let width = usize::from(self.format.sample_width());
        self.bytes
            .chunks_exact(width)
            .map(move |chunk| decode_sample(chunk, width))
    }

    /// Largest absolute sample value, `None` for an empty buffer.
    pub fn peak(&self) -> Option<u32> {
        self.samples().map(|sample| sample.unsigned_abs()).max()
    }
}

fn decode_sample(chunk: &[u8], width: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw[4 - width..].copy_from_slice(chunk);
    // shift the sign bit of the narrow sample into place, then back down
    i32::from_le_bytes(raw) >> (8 * (4 - width))
}
