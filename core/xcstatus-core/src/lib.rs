//! # xcstatus-core
//!
//! Core library for xcstatus: discovers the build state of the frontmost
//! Xcode project and renders it as a one-line terminal status.
//!
//! ## Design Principles
//!
//! - **Synchronous**: one poll pass is a short, timeout-bounded sequence
//!   of filesystem reads and `osascript` queries; no async runtime.
//! - **Graceful degradation**: missing directories, corrupt manifests, and
//!   hung automation queries degrade single fields to their defaults. A
//!   status line must always render something rather than crash its host.
//! - **External formats are not ours**: the DerivedData layout, the build
//!   manifest, and `.xcactivitylog` files are owned by Xcode and parsed
//!   defensively, field by field, with documented defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use xcstatus_core::{OsaScriptProbe, StatusEngine, StorageConfig};
//!
//! let engine = StatusEngine::new(OsaScriptProbe, StorageConfig::default());
//! println!("{}", engine.persist_and_render());
//! ```

pub mod derived_data;
pub mod engine;
pub mod error;
pub mod extract;
pub mod files;
pub mod manifest;
pub mod patterns;
pub mod probe;
pub mod render;
pub mod storage;
pub mod store;
pub mod types;

pub use engine::{split_window_title, StatusEngine};
pub use error::{Result, XcStatusError};
pub use probe::{OsaScriptProbe, XcodeProbe};
pub use render::format_status_line;
pub use storage::StorageConfig;
pub use types::{ProjectHandle, StatusFile, StatusSnapshot};
