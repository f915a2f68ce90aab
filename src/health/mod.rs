//! Collection health: are lossless albums really lossless?
//!
//! Album folders are expected to hold only flac tracks and cover art, unless
//! their name carries the lossy marker. The audit reports folders whose
//! contents disagree with their name, and files of unknown type.
//!
//! # Overview
//!
//! This module provides:
//! - [`AuditFlags`]: Findings for one album (bitflags)
//! - [`AlbumAudit`]: Findings plus the offending files
//! - [`AuditStats`]: Totals for the collection
//! - [`find_lossy_albums`]: The collection-wide audit
//!
//! # Example
//!
//! ```ignore
//! use music_shelf::health::find_lossy_albums;
//!
//! let stats = find_lossy_albums(&config.paths.root)?;
//! for audit in &stats.findings {
//!     println!("{} {}", audit.flags.summary_icon(), audit.path.display());
//! }
//! ```

mod audit;
mod types;

pub use audit::{audit_album, find_lossy_albums};
pub use types::{AlbumAudit, AuditFlags, AuditStats};
