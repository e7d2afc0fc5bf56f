//! Core workflow model for buffalo.
//!
//! This crate defines the Work/Project data model, the YAML documents a
//! project is stored in, job selection across projects, the bundled
//! workflow template, and configuration loading.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod project;
pub mod template;
pub mod yaml;

pub use config::Config;
pub use error::{Error, Result};
pub use manager::Buffalo;
pub use model::{Work, WorkStatus};
pub use project::{NextWork, Project, PROJECT_FILE_NAME};
