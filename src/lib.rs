// Tilemark: tiled text watermarks for scanned documents

pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod output;
pub mod watermark;
