//! Reading generation
//!
//! - **types**: `Reading`, `ValueRange`, `TemperatureUnit`
//! - **generator**: `ReadingGenerator`, one synthetic reading per tick
//! - **error**: startup errors for the generator

pub mod error;
pub mod generator;
pub mod types;

pub use error::GeneratorError;
pub use generator::{GeneratorConfig, ReadingGenerator, MAX_DECIMALS};
pub use types::{Reading, TemperatureUnit, ValueRange, TIMESTAMP_FORMAT};
