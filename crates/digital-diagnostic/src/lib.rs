pub mod config;
pub mod diagnostic;
pub mod error;
pub mod results;
pub mod telemetry;

pub use error::AppError;
