pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod execute;
pub mod git;
pub mod hosting;
pub mod issues;
pub mod ui;
pub mod warning;

pub use error::{GitTidyError, Result};
