//! Configuration types and presets
//!
//! - `base`: core configuration structs (Config, Format, Level)
//! - `writer`: writer and display configuration
//! - `fields`: global fields attached to every event
//! - `presets`: pre-configured setups (environment, development, production, test)

mod base;
mod fields;
mod presets;
mod writer;

pub use base::{Config, Format, Level};
pub use fields::Fields;
pub use presets::{COLORS_ENV, FORMAT_ENV, LEVEL_ENV, SOURCE_ENV, TIME_ENV};
pub use writer::{DisplayConfig, WriterConfig};
