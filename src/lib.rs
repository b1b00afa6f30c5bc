pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod jobs;
pub mod logging;
pub mod wizard;

pub use error::{DocAssistError, Result};
