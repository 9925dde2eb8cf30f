pub mod format;
pub mod header;
pub mod pcm;
pub mod writer;

pub use format::FormatDescriptor;
pub use header::{WavHeader, HEADER_LEN};
pub use pcm::PcmView;
pub use writer::{convert, convert_bytes, convert_with_config, inspect};
