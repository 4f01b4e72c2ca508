//! Translation of ABP/uBlock URL patterns into the restricted regular
//! expression dialect accepted by WebKit's content blocker engine, and
//! validation of candidate regexes against that dialect.
//!
//! WebKit compiles every `url-filter` into a finite state machine and
//! therefore accepts only a small regex subset: character classes, grouping,
//! `*`/`+`/`?`, and `^`/`$` anchors. Shorthand classes, word boundaries,
//! numeric quantifiers, lookaround, named groups, disjunctions outside
//! character classes, and non-ASCII text are all rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// The uBlock separator `^` rewritten as a character class. The original
/// token also matches end-of-string, which a class cannot express; see
/// [`pattern_to_regex_end_anchor`] for the second half of that semantic.
const SEPARATOR_CLASS: &str = "[^%.0-9a-z_-]";
/// Hostname anchor for `||` patterns.
const HOSTNAME_ANCHOR: &str = r"^[a-z-]+://(?:[^/?#]+\.)?";
/// Hostname anchor used when the remaining pattern already starts with an
/// escaped dot, to avoid matching two consecutive dots.
const HOSTNAME_ANCHOR_DOT: &str = r"^[a-z-]+://(?:[^/?#]+)?";

/// Regex metacharacters to escape in plain patterns, except `*` and `^`
/// which carry uBlock-specific meaning.
static PLAIN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.+?${}()|\[\]\\]").unwrap());
/// Runs of `*` at either end of a pattern carry no information.
static DANGLING_ASTERISKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*+|\*+$").unwrap());
static ASTERISKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());
/// Open-ended numeric quantifier `{n,}`, approximated by `+` during
/// translation.
static OPEN_QUANTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[0-9]+,\}").unwrap());
/// Any numeric quantifier still present at validation time: `{n}`, `{n,}`
/// or `{n,m}`.
static NUMERIC_QUANTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[0-9]+(,[0-9]*)?\}").unwrap());

/// Convert an ABP/uBlock URL pattern into a candidate WebKit regex.
///
/// This always produces a string; the result may still be rejected by
/// [`validate_regex`], e.g. for regex-literal patterns using features the
/// dialect cannot express.
pub fn pattern_to_regex(pattern: &str) -> String {
    if pattern.is_empty() || pattern == "*" {
        return ".*".to_string();
    }

    let mut s = pattern;
    let mut hostname_anchor = false;
    let mut left_anchor = false;
    let mut right_anchor = false;

    if let Some(rest) = s.strip_prefix("||") {
        hostname_anchor = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('|') {
        left_anchor = true;
        s = rest;
    }
    if let Some(rest) = s.strip_suffix('|') {
        right_anchor = true;
        s = rest;
    }

    // A `/.../` pattern is already a regex. Expand the shorthand classes
    // WebKit lacks and return it as-is; anchors are not applied to regex
    // literals.
    if s.len() > 2 && s.starts_with('/') && s.ends_with('/') {
        return expand_character_classes(&s[1..s.len() - 1]);
    }

    let escaped = PLAIN_CHARS.replace_all(s, r"\$0");
    let with_separators = escaped.replace('^', SEPARATOR_CLASS);
    let trimmed = DANGLING_ASTERISKS.replace_all(&with_separators, "");
    let mut re = ASTERISKS.replace_all(&trimmed, ".*").into_owned();

    if hostname_anchor {
        if re.starts_with(r"\.") {
            re.insert_str(0, HOSTNAME_ANCHOR_DOT);
        } else {
            re.insert_str(0, HOSTNAME_ANCHOR);
        }
    } else if left_anchor {
        re.insert(0, '^');
    }
    if right_anchor {
        re.push('$');
    }

    re
}

/// Whether the pattern ends in the `^` separator token, ignoring a trailing
/// right anchor `|`. Such patterns are ambiguous under WebKit's dialect and
/// need an additional end-anchored rule.
pub fn pattern_ends_with_separator(pattern: &str) -> bool {
    pattern.strip_suffix('|').unwrap_or(pattern).ends_with('^')
}

/// Variant of [`pattern_to_regex`] for patterns ending in `^`, covering the
/// "separator matches end of string" case: the trailing `^` (and `|`) are
/// stripped and a `$` anchor is appended instead.
pub fn pattern_to_regex_end_anchor(pattern: &str) -> String {
    let s = pattern.strip_suffix('|').unwrap_or(pattern);
    let s = s.strip_suffix('^').unwrap_or(s);

    let mut re = pattern_to_regex(s);
    if !re.ends_with('$') {
        re.push('$');
    }
    re
}

/// Check whether a candidate regex uses only constructs WebKit's content
/// blocker engine supports.
pub fn validate_regex(candidate: &str) -> bool {
    // Rules out syntactically malformed translator output.
    if Regex::new(candidate).is_err() {
        return false;
    }

    // Lookaround, named groups and unicode property escapes.
    const UNSUPPORTED: &[&str] = &["(?<!", "(?<=", "(?=", "(?!", r"\p{", r"\P{", "(?P<", "(?<"];
    if UNSUPPORTED.iter().any(|u| candidate.contains(u)) {
        return false;
    }

    if contains_disjunction(candidate) {
        return false;
    }

    // Any numeric quantifier is fatal here; the translator already rewrote
    // the approximable `{n,}` form to `+`.
    if NUMERIC_QUANTIFIER.is_match(candidate) {
        return false;
    }

    if !candidate.is_ascii() {
        return false;
    }

    // Residual shorthand classes or word boundaries indicate a translator
    // defect and are rejected rather than silently fixed.
    const SHORTHAND: &[&str] = &[r"\b", r"\B", r"\w", r"\W", r"\d", r"\D", r"\s", r"\S"];
    if SHORTHAND.iter().any(|c| candidate.contains(c)) {
        return false;
    }

    true
}

/// Detect a `|` disjunction outside of any character class. A single
/// left-to-right scan tracking escape and in-class state is enough; the
/// dialect's legality rules don't need a full regex parser.
fn contains_disjunction(candidate: &str) -> bool {
    let mut in_class = false;
    let mut escaped = false;

    for ch in candidate.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '|' if !in_class => return true,
            _ => {}
        }
    }
    false
}

/// Replace shorthand character classes with explicit equivalents and
/// approximate `{n,}` with `+`.
///
/// Negated forms are expanded before their positive counterparts so that
/// `\W` is never re-read as `\` followed by an already-substituted `w`. The
/// `{n,}` rewrite deliberately drops the minimum repeat count; WebKit has no
/// way to express it and over-matching is preferred over dropping the
/// filter.
fn expand_character_classes(pattern: &str) -> String {
    let expanded = pattern
        .replace(r"\W", "[^a-zA-Z0-9_]")
        .replace(r"\w", "[a-zA-Z0-9_]")
        .replace(r"\D", "[^0-9]")
        .replace(r"\d", "[0-9]")
        .replace(r"\S", r"[^ \t\n\r\f\v]")
        .replace(r"\s", r"[ \t\n\r\f\v]");

    OPEN_QUANTIFIER.replace_all(&expanded, "+").into_owned()
}

#[cfg(test)]
#[path = "../tests/unit/pattern.rs"]
mod unit_tests;
