//! Configuration section definitions.

mod output;
mod source;
mod svg;
mod watch;

pub use output::{MediaBucket, OutputConfig, SplitConfig};
pub use source::SourceConfig;
pub use svg::{MalformedPolicy, SvgConfig};
pub use watch::WatchConfig;
