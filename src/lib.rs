// Library crate exposing modules for integration tests

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod progress;
pub mod report;
pub mod repository;
pub mod resolver;
pub mod util;

pub use error::{SubtreeError, SubtreeResult};
