pub mod config;
pub mod error;
pub mod logging;
pub mod wav;

pub use config::{Config, ConfigManager};
pub use error::{ConvertError, ErrorKind};
pub use wav::{convert, convert_bytes, convert_with_config, FormatDescriptor, WavHeader};
