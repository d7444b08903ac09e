// Grapemark: tiled text watermarks and batch export

pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod logging;
pub mod preview;
pub mod watermark;
