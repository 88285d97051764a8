//! Shared plumbing for the Eventful workspace.
//!
//! Today this is only the [`observability`] module, which owns the process-wide
//! `tracing` subscriber used by the `eventful` binary and by integration tests.
//!
//! ```rust
//! use eventful_common::observability::{LogConfig, LogFormat};
//!
//! let cfg = LogConfig {
//!     format: LogFormat::Json,
//!     ..LogConfig::default()
//! };
//! assert_eq!(cfg.app_name, "eventful");
//! ```

pub mod observability;
