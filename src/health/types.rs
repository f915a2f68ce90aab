//! Audit finding types.
//!
//! - [`AuditFlags`]: what is wrong with an album folder
//! - [`AlbumAudit`]: the findings for one album
//! - [`AuditStats`]: totals for a whole collection

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

bitflags! {
    /// Findings for an album folder.
    ///
    /// Multiple flags can be set simultaneously. Use `.is_empty()` to check
    /// if an album is clean.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AuditFlags: u32 {
        /// Holds files other than flac and cover art
        const NON_LOSSLESS = 1 << 0;
        /// Holds files of unknown type
        const SUSPICIOUS_FILES = 1 << 1;
        /// Not lossless, but the folder name lacks the lossy marker
        const UNFLAGGED = 1 << 2;
        /// Lossy marker present, but no lossy audio in the folder
        const FALSELY_FLAGGED = 1 << 3;
    }
}

impl AuditFlags {
    /// Get human-readable descriptions of all set flags.
    pub fn descriptions(&self) -> Vec<&'static str> {
        let mut descriptions = Vec::new();
        if self.contains(Self::NON_LOSSLESS) {
            descriptions.push("not lossless");
        }
        if self.contains(Self::SUSPICIOUS_FILES) {
            descriptions.push("suspicious files");
        }
        if self.contains(Self::UNFLAGGED) {
            descriptions.push("missing lossy marker");
        }
        if self.contains(Self::FALSELY_FLAGGED) {
            descriptions.push("lossy marker but no lossy audio");
        }
        descriptions
    }

    /// Whether the folder name disagrees with the folder contents.
    pub fn is_mismatch(&self) -> bool {
        self.intersects(Self::UNFLAGGED | Self::FALSELY_FLAGGED)
    }

    /// Icon for terminal output.
    pub fn summary_icon(&self) -> &'static str {
        if self.is_mismatch() {
            "✗"
        } else if self.contains(Self::SUSPICIOUS_FILES) {
            "!"
        } else {
            "✓"
        }
    }
}

fn serialize_flags<S: Serializer>(flags: &AuditFlags, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(flags.descriptions())
}

/// Findings for one album folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumAudit {
    /// Album directory, relative to the root
    pub path: PathBuf,
    #[serde(serialize_with = "serialize_flags")]
    pub flags: AuditFlags,
    /// Files of unknown type, relative to the album directory
    pub suspicious: Vec<PathBuf>,
}

/// Totals for an audit of the whole collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditStats {
    /// Album folders checked
    pub checked: usize,
    pub non_lossless: usize,
    pub unflagged: usize,
    pub falsely_flagged: usize,
    /// Albums with at least one finding
    pub findings: Vec<AlbumAudit>,
}

impl AuditStats {
    pub fn record(&mut self, audit: AlbumAudit) {
        self.checked += 1;
        if audit.flags.contains(AuditFlags::NON_LOSSLESS) {
            self.non_lossless += 1;
        }
        if audit.flags.contains(AuditFlags::UNFLAGGED) {
            self.unflagged += 1;
        }
        if audit.flags.contains(AuditFlags::FALSELY_FLAGGED) {
            self.falsely_flagged += 1;
        }
        if !audit.flags.is_empty() {
            self.findings.push(audit);
        }
    }

    /// Whether any folder name disagrees with its contents.
    pub fn has_mismatches(&self) -> bool {
        self.unflagged > 0 || self.falsely_flagged > 0
    }
}
