//! Loading options

pub mod null_handling;
pub mod tabular_options;

pub use null_handling::*;
pub use tabular_options::*;
