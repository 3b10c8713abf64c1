#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod annotation;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod hook;
pub mod vault;

pub use cli::commands::{Cli, Commands};
pub use config::{Config, Settings};
pub use error::{PlannotatorError, Result};
