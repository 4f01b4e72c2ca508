//! Partitioning of rule sequences into size-bounded output files, and
//! deduplication of rules across combined lists.

use std::collections::HashSet;

use crate::content_blocking::{CbRule, CbType};

/// WebKit refuses to compile a content blocker with more rules than this.
pub const MAX_RULES_PER_FILE: usize = 50_000;

/// Partition `rules` into output chunks of at most `max_rules` each,
/// preserving order. A sequence that fits yields a single chunk named
/// `base`; larger sequences yield `base-part1`, `base-part2`, …
pub fn split_rules(rules: &[CbRule], base: &str, max_rules: usize) -> Vec<(String, Vec<CbRule>)> {
    let max_rules = if max_rules == 0 {
        MAX_RULES_PER_FILE
    } else {
        max_rules
    };

    if rules.len() <= max_rules {
        return vec![(base.to_string(), rules.to_vec())];
    }

    rules
        .chunks(max_rules)
        .enumerate()
        .map(|(i, chunk)| (format!("{base}-part{}", i + 1), chunk.to_vec()))
        .collect()
}

/// Drop duplicate rules, keeping the first occurrence. Identity is the
/// `(url-filter, action type, selector)` triple; trigger scoping fields are
/// deliberately not part of the key so a rule repeated across source lists
/// collapses to one.
pub fn dedup_rules(rules: Vec<CbRule>) -> Vec<CbRule> {
    let mut seen: HashSet<(String, CbType, Option<String>)> = HashSet::new();

    rules
        .into_iter()
        .filter(|rule| {
            seen.insert((
                rule.trigger.url_filter.clone(),
                rule.action.typ,
                rule.action.selector.clone(),
            ))
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/split.rs"]
mod unit_tests;
