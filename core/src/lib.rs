//! Core types for parsed disk self-test output.
//!
//! This crate defines the records produced when parsing the text reports of
//! a disk self-test utility:
//!
//! - [`SelfTestLogEntry`]: one historical self-test row, as one of
//!   [`AtaSelfTestEntry`], [`NvmeSelfTestEntry`], or [`ScsiSelfTestEntry`].
//! - [`TestStatus`]: classified outcome of a self-test.
//! - [`ReportFormat`]: which table layout a report used.
//! - [`CurrentSelfTestProgress`]: completion percentage of a running test.
//!
//! Validation ([`validate_entry`], [`validate_progress`]) catches records
//! that break representational invariants, such as a remaining fraction
//! above `1.0`.
//!
//! # Example
//!
//! ```
//! use smart_selftest_core::*;
//!
//! let entry = SelfTestLogEntry::Ata(AtaSelfTestEntry {
//!     num: 1,
//!     description: "Short offline".into(),
//!     status: TestStatus::Success,
//!     status_verbose: "Completed without error".into(),
//!     remaining: 0.0,
//!     lifetime: 16590,
//!     lba_of_first_error: None,
//! });
//!
//! assert_eq!(entry.format(), ReportFormat::Ata);
//! assert!(validate_entry(&entry).is_empty());
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::{ValidationError, validate_entry, validate_progress};
