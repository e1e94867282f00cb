//! Core types and configuration for tagpush.
//!
//! This crate defines the typed compose document ([`ComposeDocument`]),
//! release image naming ([`ImageReference`], [`ProjectName`],
//! [`ReleaseVersion`]), the `tagpush.toml` schema ([`TagpushConfig`]),
//! and shared error types.

pub mod compose;
pub mod config;
pub mod error;
pub mod image;

pub use compose::{
    BuildDirective, ComposeDocument, SUPPORTED_VERSION, ServiceDefinition, default_output_path,
    ensure_distinct_output,
};
pub use config::{ComposeConfig, RegistryConfig, TagpushConfig};
pub use error::{Error, Result};
pub use image::{ImageReference, ProjectName, ReleaseVersion};
