//! `smarttask init`: scaffold `.smarttask/` from templates compiled into
//! the binary. The result loads with [`crate::config::load_config`] and
//! reproduces the built-in agents and routing rules.
//!
//! # Example
//!
//! ```no_run
//! use st_core::init::{generate_smarttask_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//! };
//!
//! let written = generate_smarttask_structure(options).await?;
//! for path in &written {
//!     println!("wrote {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_smarttask_structure, InitOptions};
pub use templates::{get_template, list_templates};
