//! Best-match selection over the knowledge base.
//!
//! Each record is scored against the query on its question, its joined tags
//! and its title; the weighted maximum is the record score. The scan is
//! sequential and only a strictly greater score replaces the current best, so
//! ties resolve to the earlier record.

use crate::knowledge::{Corpus, ProcessRecord};
use crate::similarity::similarity;
use tracing::debug;

/// A record must score strictly above this to be returned.
pub const MIN_SCORE: f64 = 0.2;
pub const TAGS_WEIGHT: f64 = 0.8;
pub const TITLE_WEIGHT: f64 = 0.9;

/// Per-field scores of one record against a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordScore {
    pub question: f64,
    pub tags: f64,
    pub title: f64,
}

impl RecordScore {
    pub fn total(&self) -> f64 {
        self.question.max(self.tags).max(self.title)
    }
}

pub fn score_record(query: &str, record: &ProcessRecord) -> RecordScore {
    RecordScore {
        question: similarity(query, &record.question),
        tags: similarity(query, &record.tags.join(" ")) * TAGS_WEIGHT,
        title: similarity(query, &record.title) * TITLE_WEIGHT,
    }
}

/// Return the best-scoring record above [`MIN_SCORE`], if any.
pub fn find_best_match<'a>(query: &str, corpus: &'a Corpus) -> Option<&'a ProcessRecord> {
    let mut best: Option<&ProcessRecord> = None;
    let mut best_score = 0.0;

    for record in corpus {
        let score = score_record(query, record);
        let total = score.total();
        debug!(
            id = %record.id,
            question = score.question,
            tags = score.tags,
            title = score.title,
            total,
            "scored record"
        );
        if total > best_score && total > MIN_SCORE {
            best_score = total;
            best = Some(record);
        }
    }

    best
}
