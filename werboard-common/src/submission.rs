//! Uploaded hypothesis files and their alignment onto the reference set

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::reference::ReferenceSet;
use crate::scoring::wer::{corpus_wer, WerBreakdown};
use crate::tsv;
use crate::{Error, Result};

/// One uploaded line: utterance ID and hypothesis text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub id: String,
    /// Empty when the upload left the column out
    pub hypothesis: String,
}

impl SubmissionRow {
    pub fn new(id: impl Into<String>, hypothesis: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hypothesis: hypothesis.into(),
        }
    }
}

/// Parse raw upload bytes (header-less `ID<TAB>hypothesis`)
pub fn parse_submission(bytes: &[u8]) -> Result<Vec<SubmissionRow>> {
    parse_submission_tsv(tsv::decode(bytes)?)
}

/// Parse header-less `ID<TAB>hypothesis` text
///
/// A missing hypothesis becomes an empty string so the utterance is scored as
/// a full miss rather than dropped.
pub fn parse_submission_tsv(text: &str) -> Result<Vec<SubmissionRow>> {
    let rows: Vec<SubmissionRow> = tsv::records(text)?
        .into_iter()
        .map(|rec| SubmissionRow::new(rec.id, rec.text.unwrap_or("")))
        .collect();

    if rows.is_empty() {
        return Err(Error::InvalidInput(
            "Uploaded file contains no rows".to_string(),
        ));
    }

    Ok(rows)
}

/// Reference and hypothesis texts paired in reference order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedCorpus<'a> {
    pub references: Vec<&'a str>,
    pub hypotheses: Vec<&'a str>,
}

/// Left-join `rows` onto every reference ID
///
/// Rejects the whole submission when any reference ID has no hypothesis or any
/// submitted ID is unknown to the reference. Duplicate submitted IDs are
/// rejected before the join.
pub fn align<'a>(
    reference: &'a ReferenceSet,
    rows: &'a [SubmissionRow],
) -> Result<AlignedCorpus<'a>> {
    let mut by_id: HashMap<&str, &str> = HashMap::with_capacity(rows.len());
    let mut duplicates = Vec::new();
    let mut seen_dup = HashSet::new();

    for row in rows {
        if by_id.insert(&row.id, &row.hypothesis).is_some() && seen_dup.insert(row.id.as_str()) {
            duplicates.push(row.id.clone());
        }
    }

    if !duplicates.is_empty() {
        return Err(Error::DuplicateSubmissionId(duplicates));
    }

    let mut references = Vec::with_capacity(reference.len());
    let mut hypotheses = Vec::with_capacity(reference.len());
    let mut missing = Vec::new();

    for entry in reference.entries() {
        match by_id.get(entry.id.as_str()) {
            Some(hyp) => {
                references.push(entry.correct_transcript.as_str());
                hypotheses.push(*hyp);
            }
            None => missing.push(entry.id.clone()),
        }
    }

    let unknown: Vec<String> = rows
        .iter()
        .filter(|row| !reference.contains(&row.id))
        .map(|row| row.id.clone())
        .collect();

    if !missing.is_empty() || !unknown.is_empty() {
        return Err(Error::MissingReferenceEntry { missing, unknown });
    }

    Ok(AlignedCorpus {
        references,
        hypotheses,
    })
}

/// Align `rows` onto `reference` and compute corpus WER
pub fn score_submission(reference: &ReferenceSet, rows: &[SubmissionRow]) -> Result<WerBreakdown> {
    let corpus = align(reference, rows)?;
    corpus_wer(&corpus.references, &corpus.hypotheses)
}
