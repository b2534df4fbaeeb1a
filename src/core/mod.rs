//! Core conversion logic and abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod widget;

// Re-export main types for cleaner imports
pub use conversion::{ConversionOutcome, ConversionRequest, RateResolver};
pub use currency::{CurrencyRateProvider, RateTable};
pub use widget::{ConverterWidget, InputSource, OutputSink};
