//! Lexical classification of raw filter-list lines into typed [`Filter`]
//! records, including network filter option parsing.
//!
//! Classification runs as an explicit ordered chain of recognizers; the
//! first step to claim a line wins. The order matters because syntactic
//! markers can co-occur (e.g. a scriptlet rule also contains `##`).

use memchr::memrchr;

/// The kind of directive a source line was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Comment,
    Network,
    Exception,
    Cosmetic,
    CosmeticException,
    Unsupported,
}

/// Why a filter was dropped instead of converted. Labels are stable; they
/// key the per-run statistics and appear in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    Scriptlet,
    HtmlFilter,
    Procedural,
    UnsupportedOption,
    InvalidRegex,
    CosmeticException,
    EmptySelector,
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Scriptlet => "scriptlet",
            SkipReason::HtmlFilter => "html-filter",
            SkipReason::Procedural => "procedural",
            SkipReason::UnsupportedOption => "unsupported-option",
            SkipReason::InvalidRegex => "invalid-regex",
            SkipReason::CosmeticException => "cosmetic-exception",
            SkipReason::EmptySelector => "empty-selector",
        }
    }
}

/// Modifiers parsed from the `$...` suffix of a network filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// `None` means the filter applies regardless of request party.
    pub third_party: Option<bool>,
    /// WebKit resource-type names, in first-seen order without duplicates.
    pub resource_types: Vec<&'static str>,
    /// Domains from `domain=` without a `~` prefix.
    pub include_domains: Vec<String>,
    /// Domains from `domain=` carrying a `~` prefix (prefix stripped).
    pub exclude_domains: Vec<String>,
    pub match_case: bool,
    pub important: bool,
}

impl FilterOptions {
    pub fn is_empty(&self) -> bool {
        self.third_party.is_none()
            && self.resource_types.is_empty()
            && self.include_domains.is_empty()
            && self.exclude_domains.is_empty()
            && !self.match_case
            && !self.important
    }
}

/// One parsed source line. For non-comment, supported filters exactly one of
/// `pattern` (network kinds) or `selector` (cosmetic kinds) is non-empty.
#[derive(Debug, Clone)]
pub struct Filter {
    pub kind: FilterKind,
    /// Original line, retained for diagnostics.
    pub raw: String,
    /// URL pattern, network/exception kinds only.
    pub pattern: String,
    /// CSS selector, cosmetic kinds only.
    pub selector: String,
    /// Domain tokens from a cosmetic filter's domain prefix. A leading `~`
    /// marks exclusion; routing happens at emission.
    pub domains: Vec<String>,
    pub options: FilterOptions,
    /// Set iff `kind` is [`FilterKind::Unsupported`].
    pub skip: Option<SkipReason>,
}

impl Filter {
    fn unsupported(line: &str, reason: SkipReason) -> Filter {
        Filter {
            kind: FilterKind::Unsupported,
            raw: line.to_string(),
            pattern: String::new(),
            selector: String::new(),
            domains: vec![],
            options: FilterOptions::default(),
            skip: Some(reason),
        }
    }

    fn comment(line: &str) -> Filter {
        Filter {
            kind: FilterKind::Comment,
            raw: line.to_string(),
            pattern: String::new(),
            selector: String::new(),
            domains: vec![],
            options: FilterOptions::default(),
            skip: None,
        }
    }
}

/// Procedural cosmetic operators uBlock supports but WebKit cannot express.
const PROCEDURAL_MARKERS: &[&str] = &[
    ":has(",
    ":has-text(",
    ":xpath(",
    ":matches-css(",
    ":matches-attr(",
    ":min-text-length(",
    ":not(",
    ":upward(",
    ":remove(",
    ":style(",
];

/// Option keywords that cannot be honored by a content blocker. A filter
/// carrying any of these is dropped whole; partial honoring would change
/// its meaning.
const UNSUPPORTED_OPTIONS: &[&str] = &[
    "redirect=",
    "redirect-rule=",
    "csp=",
    "removeparam=",
    "replace=",
    "header=",
    "method=",
    "to=",
    "permissions=",
    "uritransform=",
];

/// Classify one raw filter line. Total: every line resolves to a `Filter`,
/// however malformed; unsupported constructs come back as
/// [`FilterKind::Unsupported`] with a reason rather than an error.
pub fn classify(line: &str) -> Filter {
    // Ordered recognizer chain; first match wins.
    const STEPS: &[fn(&str) -> Option<Filter>] = &[
        match_comment,
        match_scriptlet,
        match_html_filter,
        match_procedural,
        match_cosmetic,
        match_cosmetic_exception,
        match_exception,
    ];

    for step in STEPS {
        if let Some(filter) = step(line) {
            return filter;
        }
    }

    parse_network(line, line, false)
}

fn match_comment(line: &str) -> Option<Filter> {
    if line.starts_with('!') || line.starts_with('[') {
        Some(Filter::comment(line))
    } else {
        None
    }
}

fn match_scriptlet(line: &str) -> Option<Filter> {
    if line.contains("##+js(") || line.contains("#@#+js(") {
        Some(Filter::unsupported(line, SkipReason::Scriptlet))
    } else {
        None
    }
}

fn match_html_filter(line: &str) -> Option<Filter> {
    if line.contains("##^") || line.contains("#@#^") {
        Some(Filter::unsupported(line, SkipReason::HtmlFilter))
    } else {
        None
    }
}

fn match_procedural(line: &str) -> Option<Filter> {
    if PROCEDURAL_MARKERS.iter().any(|m| line.contains(m)) {
        Some(Filter::unsupported(line, SkipReason::Procedural))
    } else {
        None
    }
}

fn match_cosmetic(line: &str) -> Option<Filter> {
    match line.find("##") {
        Some(idx) if !line.contains("#@#") => {
            Some(parse_cosmetic(line, idx, 2, FilterKind::Cosmetic))
        }
        _ => None,
    }
}

fn match_cosmetic_exception(line: &str) -> Option<Filter> {
    line.find("#@#")
        .map(|idx| parse_cosmetic(line, idx, 3, FilterKind::CosmeticException))
}

fn match_exception(line: &str) -> Option<Filter> {
    line.strip_prefix("@@")
        .map(|rest| parse_network(line, rest, true))
}

fn parse_cosmetic(line: &str, sep_idx: usize, sep_len: usize, kind: FilterKind) -> Filter {
    let domains = if sep_idx > 0 {
        line[..sep_idx]
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![]
    };

    Filter {
        kind,
        raw: line.to_string(),
        pattern: String::new(),
        selector: line[sep_idx + sep_len..].to_string(),
        domains,
        options: FilterOptions::default(),
        skip: None,
    }
}

fn parse_network(line: &str, body: &str, exception: bool) -> Filter {
    let mut pattern = body;
    let mut options = FilterOptions::default();

    // Options begin at the last `$` that is neither escaped nor immediately
    // followed by `/` (which would be a regex literal's trailing anchor).
    if let Some(idx) = memrchr(b'$', body.as_bytes()) {
        let escaped = idx > 0 && body.as_bytes()[idx - 1] == b'\\';
        if !escaped && !body[idx + 1..].starts_with('/') {
            match parse_options(&body[idx + 1..]) {
                Ok(parsed) => {
                    pattern = &body[..idx];
                    options = parsed;
                }
                Err(reason) => return Filter::unsupported(line, reason),
            }
        }
    }

    Filter {
        kind: if exception {
            FilterKind::Exception
        } else {
            FilterKind::Network
        },
        raw: line.to_string(),
        pattern: pattern.to_string(),
        selector: String::new(),
        domains: vec![],
        options,
        skip: None,
    }
}

fn parse_options(raw: &str) -> Result<FilterOptions, SkipReason> {
    let mut opts = FilterOptions::default();

    for token in raw.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        if UNSUPPORTED_OPTIONS.iter().any(|u| token.starts_with(u)) {
            return Err(SkipReason::UnsupportedOption);
        }

        match token {
            "third-party" | "3p" => opts.third_party = Some(true),
            "~third-party" | "~3p" | "first-party" | "1p" => opts.third_party = Some(false),
            "match-case" => opts.match_case = true,
            "important" => opts.important = true,
            _ => {
                if let Some(list) = token.strip_prefix("domain=") {
                    parse_domain_option(list, &mut opts);
                } else if let Some(rt) = map_resource_type(token) {
                    if !opts.resource_types.contains(&rt) {
                        opts.resource_types.push(rt);
                    }
                }
                // Anything else is an option we don't recognize but can
                // safely ignore without changing the filter's meaning.
            }
        }
    }

    Ok(opts)
}

/// Route `domain=a|~b|c` tokens into include/exclude sets. A token never
/// lands in both.
fn parse_domain_option(list: &str, opts: &mut FilterOptions) {
    for domain in list.split('|').map(str::trim) {
        if domain.is_empty() {
            continue;
        }
        if let Some(negated) = domain.strip_prefix('~') {
            opts.exclude_domains.push(negated.to_string());
        } else {
            opts.include_domains.push(domain.to_string());
        }
    }
}

/// Map an ABP resource-type token to its WebKit `resource-type` name.
/// Negated tokens collapse to their positive mapping; unrecognized tokens
/// map to `None` and are dropped by the caller.
fn map_resource_type(token: &str) -> Option<&'static str> {
    use crate::content_blocking::resource_type;

    let token = token.strip_prefix('~').unwrap_or(token);
    match token {
        "script" => Some(resource_type::SCRIPT),
        "image" | "img" => Some(resource_type::IMAGE),
        "stylesheet" | "css" => Some(resource_type::STYLE_SHEET),
        "font" => Some(resource_type::FONT),
        "media" => Some(resource_type::MEDIA),
        "subdocument" | "frame" | "document" | "doc" => Some(resource_type::DOCUMENT),
        "popup" => Some(resource_type::POPUP),
        "xmlhttprequest" | "xhr" | "object" | "object-subrequest" | "ping" | "beacon"
        | "websocket" | "other" => Some(resource_type::RAW),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/filters.rs"]
mod unit_tests;
