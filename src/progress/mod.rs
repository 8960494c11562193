//! Progress reporting for bundling runs

mod handler;
mod logging;

pub use handler::{ConsoleHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use logging::LoggingHandler;
