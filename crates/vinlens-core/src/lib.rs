//! VinLens Core - Foundation crate for the VinLens lookup toolkit.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other VinLens crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`Vin`, `ProviderId`)
//!
//! # Example
//!
//! ```rust
//! use vinlens_core::{AppConfig, Vin};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! assert_eq!(config.lookup.timeout_secs, 20);
//!
//! let vin = Vin::parse("1HGCM82633A004352")?;
//! println!("Looking up {vin}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, LookupConfig, ProvidersConfig};
pub use error::{ConfigError, ConfigResult, Result, VinLensError};
pub use types::{ProviderId, Vin, VIN_LENGTH};
