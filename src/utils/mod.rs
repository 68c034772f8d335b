pub mod log_format;
#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use log_format::preview_imports;
