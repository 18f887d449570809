//! Reference transcripts keyed by utterance ID

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tsv;
use crate::{Error, Result};

/// One canonical transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: String,
    pub correct_transcript: String,
}

impl ReferenceEntry {
    pub fn new(id: impl Into<String>, correct_transcript: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            correct_transcript: correct_transcript.into(),
        }
    }
}

/// Ordered reference set with unique IDs
///
/// Order is preserved from the source so that the aligned corpus handed to
/// the scorer is deterministic.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    entries: Vec<ReferenceEntry>,
    index: HashMap<String, usize>,
}

impl ReferenceSet {
    /// Build a set, rejecting duplicate IDs
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        let mut duplicates = Vec::new();

        for (pos, entry) in entries.iter().enumerate() {
            if index.insert(entry.id.clone(), pos).is_some() {
                duplicates.push(entry.id.clone());
            }
        }

        if !duplicates.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Reference contains duplicate IDs: {}",
                duplicates.join(", ")
            )));
        }

        Ok(Self { entries, index })
    }

    /// Parse raw file bytes (UTF-8, optional BOM)
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_tsv(tsv::decode(bytes)?)
    }

    /// Parse a header-less `ID<TAB>transcript` file
    ///
    /// A line without a transcript column is an error: unlike uploads, the
    /// reference must define every utterance.
    pub fn parse_tsv(text: &str) -> Result<Self> {
        let entries = tsv::records(text)?
            .into_iter()
            .map(|rec| match rec.text {
                Some(text) => Ok(ReferenceEntry::new(rec.id, text.trim())),
                None => Err(Error::InvalidInput(format!(
                    "Reference line {} has no transcript column",
                    rec.line
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_entries(entries)
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceEntry> {
        self.index.get(id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
