//! Batch driver: walks filter-list lines through classification and
//! emission, preserving input order and accumulating per-run statistics.

use std::collections::BTreeMap;

use crate::content_blocking::{emit, CbRule};
use crate::filters::{classify, FilterKind, SkipReason};

/// Counters for one conversion run. Created fresh per run and returned to
/// the caller; runs over several lists are combined with [`merge`].
///
/// [`merge`]: ConversionStats::merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionStats {
    /// Non-blank lines seen.
    pub total: usize,
    pub comments: usize,
    pub network: usize,
    pub exceptions: usize,
    pub cosmetic: usize,
    /// Rules emitted (a single filter can produce several).
    pub converted: usize,
    /// Filters dropped, for any reason.
    pub skipped: usize,
    /// Dropped-filter breakdown, keyed by [`SkipReason::label`].
    pub skip_reasons: BTreeMap<&'static str, usize>,
}

impl ConversionStats {
    fn skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason.label()).or_insert(0) += 1;
    }

    /// Fold another run's counters into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.total += other.total;
        self.comments += other.comments;
        self.network += other.network;
        self.exceptions += other.exceptions;
        self.cosmetic += other.cosmetic;
        self.converted += other.converted;
        self.skipped += other.skipped;
        for (reason, count) in &other.skip_reasons {
            *self.skip_reasons.entry(reason).or_insert(0) += count;
        }
    }
}

/// Convert a whole filter list. Lines are trimmed, blank lines ignored.
pub fn convert_list(text: &str) -> (Vec<CbRule>, ConversionStats) {
    convert_lines(text.lines())
}

/// Convert an ordered sequence of filter lines. Output rules preserve input
/// order so repeated runs over the same list diff cleanly.
pub fn convert_lines<'a, I>(lines: I) -> (Vec<CbRule>, ConversionStats)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut rules = Vec::new();
    let mut stats = ConversionStats::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.total += 1;

        let filter = classify(line);
        match filter.kind {
            FilterKind::Comment => {
                stats.comments += 1;
                continue;
            }
            FilterKind::Unsupported => {
                if let Some(reason) = filter.skip {
                    stats.skip(reason);
                }
                continue;
            }
            FilterKind::Network => stats.network += 1,
            FilterKind::Exception => stats.exceptions += 1,
            FilterKind::Cosmetic | FilterKind::CosmeticException => stats.cosmetic += 1,
        }

        match emit(&filter) {
            Ok(emitted) => {
                stats.converted += emitted.len();
                rules.extend(emitted);
            }
            Err(reason) => stats.skip(reason),
        }
    }

    (rules, stats)
}

#[cfg(test)]
#[path = "../tests/unit/convert.rs"]
mod unit_tests;
