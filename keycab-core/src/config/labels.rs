//! CV label table
//!
//! Short descriptions shown under the CV value in programming mode.
//! Only well-known indices are listed; anything else renders blank.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Maximum number of labelled CVs
pub const MAX_CV_LABELS: usize = 16;

/// Maximum label length (one display row minus the leading space)
pub const MAX_CV_LABEL_LEN: usize = 19;

const WELL_KNOWN: [(u8, &str); 11] = [
    (1, "Address number"),
    (2, "Start voltage"),
    (3, "Acceleration rate"),
    (4, "Deceleration rate"),
    (5, "Maximum speed"),
    (6, "Medium speed"),
    (7, "Firmware version"),
    (8, "Manufacturer Id"),
    (29, "Config register"),
    (33, "Front light"),
    (34, "Rear light"),
];

/// One labelled CV
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CvLabel {
    pub cv: u8,
    pub text: String<MAX_CV_LABEL_LEN>,
}

/// Lookup table from CV index to label
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CvLabels {
    entries: Vec<CvLabel, MAX_CV_LABELS>,
}

impl CvLabels {
    /// Table with no labels at all
    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Label for a CV, if one is configured
    pub fn get(&self, cv: u8) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.cv == cv)
            .map(|e| e.text.as_str())
    }

    /// Add or replace the label for a CV
    pub fn set(&mut self, cv: u8, text: &str) -> Result<(), ConfigError> {
        let mut label = String::new();
        label
            .push_str(text)
            .map_err(|_| ConfigError::LabelTooLong)?;

        if let Some(entry) = self.entries.iter_mut().find(|e| e.cv == cv) {
            entry.text = label;
            return Ok(());
        }

        self.entries
            .push(CvLabel { cv, text: label })
            .map_err(|_| ConfigError::TableFull)
    }

    /// Drop the label for a CV, returning true if one existed
    pub fn remove(&mut self, cv: u8) -> bool {
        match self.entries.iter().position(|e| e.cv == cv) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CvLabel> {
        self.entries.iter()
    }
}

impl Default for CvLabels {
    fn default() -> Self {
        let mut labels = Self::empty();
        for (cv, text) in WELL_KNOWN {
            // Every built-in label fits the table
            let _ = labels.set(cv, text);
        }
        labels
    }
}
