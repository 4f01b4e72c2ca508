//! WebKit content blocker rule model and the emitter that lowers parsed
//! [`Filter`]s into it.
//!
//! The target schema is narrow: one regex per trigger, at most one of
//! `if-domain`/`unless-domain`, and a separator class that cannot match
//! end-of-string. Where the source model is richer, a single filter is
//! split into several rules that together cover the original semantics.

use serde::{Deserialize, Serialize};

use crate::filters::{Filter, FilterKind, SkipReason};
use crate::pattern::{
    pattern_ends_with_separator, pattern_to_regex, pattern_to_regex_end_anchor, validate_regex,
};

/// WebKit `resource-type` names.
pub mod resource_type {
    pub const DOCUMENT: &str = "document";
    pub const IMAGE: &str = "image";
    pub const STYLE_SHEET: &str = "style-sheet";
    pub const SCRIPT: &str = "script";
    pub const FONT: &str = "font";
    pub const RAW: &str = "raw";
    pub const SVG_DOCUMENT: &str = "svg-document";
    pub const MEDIA: &str = "media";
    pub const POPUP: &str = "popup";
}

pub const LOAD_FIRST_PARTY: &str = "first-party";
pub const LOAD_THIRD_PARTY: &str = "third-party";

/// A single rule in a WebKit content blocker list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbRule {
    pub trigger: CbRuleTrigger,
    pub action: CbRuleAction,
}

/// Matching condition of a [`CbRule`]. `if_domain` and `unless_domain` are
/// mutually exclusive; WebKit rejects rules carrying both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbRuleTrigger {
    #[serde(rename = "url-filter")]
    pub url_filter: String,
    #[serde(
        rename = "url-filter-is-case-sensitive",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub case_sensitive: Option<bool>,
    #[serde(
        rename = "resource-type",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub resource_type: Option<Vec<String>>,
    #[serde(rename = "load-type", skip_serializing_if = "Option::is_none", default)]
    pub load_type: Option<Vec<String>>,
    #[serde(rename = "if-domain", skip_serializing_if = "Option::is_none", default)]
    pub if_domain: Option<Vec<String>>,
    #[serde(
        rename = "unless-domain",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub unless_domain: Option<Vec<String>>,
}

/// Effect of a [`CbRule`]. `selector` is only present for
/// [`CbType::CssDisplayNone`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CbRuleAction {
    #[serde(rename = "type")]
    pub typ: CbType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selector: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CbType {
    Block,
    IgnorePreviousRules,
    CssDisplayNone,
}

/// Lower one filter into zero or more content blocker rules.
///
/// Comment and unsupported filters are not the emitter's business and
/// produce no rules. Everything else either converts or comes back with the
/// reason it could not.
pub fn emit(filter: &Filter) -> Result<Vec<CbRule>, SkipReason> {
    match filter.kind {
        FilterKind::Network => emit_network(filter, false),
        FilterKind::Exception => emit_network(filter, true),
        FilterKind::Cosmetic | FilterKind::CosmeticException => emit_cosmetic(filter),
        FilterKind::Comment | FilterKind::Unsupported => Ok(vec![]),
    }
}

fn emit_network(filter: &Filter, exception: bool) -> Result<Vec<CbRule>, SkipReason> {
    let regex = pattern_to_regex(&filter.pattern);
    if !validate_regex(&regex) {
        return Err(SkipReason::InvalidRegex);
    }

    // Patterns ending in `^` need a second, end-anchored regex to cover the
    // "separator matches end of string" half of the token's meaning. If that
    // variant is dialect-invalid it is dropped; the class variant alone
    // still covers the common case.
    let end_anchor = if pattern_ends_with_separator(&filter.pattern) {
        let variant = pattern_to_regex_end_anchor(&filter.pattern);
        validate_regex(&variant).then_some(variant)
    } else {
        None
    };

    let typ = if exception {
        CbType::IgnorePreviousRules
    } else {
        CbType::Block
    };

    let case_sensitive = filter.options.match_case.then_some(true);
    let resource_type = (!filter.options.resource_types.is_empty()).then(|| {
        filter
            .options
            .resource_types
            .iter()
            .map(|rt| rt.to_string())
            .collect()
    });
    let load_type = filter.options.third_party.map(|third| {
        vec![if third {
            LOAD_THIRD_PARTY.to_string()
        } else {
            LOAD_FIRST_PARTY.to_string()
        }]
    });

    let include = normalize_domains(&filter.options.include_domains);
    let exclude = normalize_domains(&filter.options.exclude_domains);

    let mut rules = Vec::new();
    for (if_domain, unless_domain) in domain_scopes(include, exclude) {
        for url_filter in std::iter::once(&regex).chain(end_anchor.iter()) {
            rules.push(CbRule {
                trigger: CbRuleTrigger {
                    url_filter: url_filter.clone(),
                    case_sensitive,
                    resource_type: resource_type.clone(),
                    load_type: load_type.clone(),
                    if_domain: if_domain.clone(),
                    unless_domain: unless_domain.clone(),
                },
                action: CbRuleAction {
                    typ,
                    selector: None,
                },
            });
        }
    }

    Ok(rules)
}

fn emit_cosmetic(filter: &Filter) -> Result<Vec<CbRule>, SkipReason> {
    if filter.selector.is_empty() {
        return Err(SkipReason::EmptySelector);
    }
    // WebKit has no construct for "undo this cosmetic rule on these pages".
    if filter.kind == FilterKind::CosmeticException {
        return Err(SkipReason::CosmeticException);
    }

    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for domain in &filter.domains {
        if let Some(negated) = domain.strip_prefix('~') {
            exclude.push(normalize_domain(negated));
        } else {
            include.push(normalize_domain(domain));
        }
    }

    // Cosmetic triggers always use the universal matcher, so no end-anchor
    // variants arise here.
    let rules = domain_scopes(include, exclude)
        .into_iter()
        .map(|(if_domain, unless_domain)| CbRule {
            trigger: CbRuleTrigger {
                url_filter: ".*".to_string(),
                case_sensitive: None,
                resource_type: None,
                load_type: None,
                if_domain,
                unless_domain,
            },
            action: CbRuleAction {
                typ: CbType::CssDisplayNone,
                selector: Some(filter.selector.clone()),
            },
        })
        .collect();

    Ok(rules)
}

/// Resolve the include/exclude domain sets into per-rule scopes. A trigger
/// may carry `if-domain` or `unless-domain` but never both, so a filter with
/// both sets becomes two rules: one scoped to the included domains, one
/// applying everywhere except the excluded ones.
fn domain_scopes(
    include: Vec<String>,
    exclude: Vec<String>,
) -> Vec<(Option<Vec<String>>, Option<Vec<String>>)> {
    match (include.is_empty(), exclude.is_empty()) {
        (false, false) => vec![(Some(include), None), (None, Some(exclude))],
        (false, true) => vec![(Some(include), None)],
        (true, false) => vec![(None, Some(exclude))],
        (true, true) => vec![(None, None)],
    }
}

fn normalize_domains(domains: &[String]) -> Vec<String> {
    domains.iter().map(|d| normalize_domain(d)).collect()
}

/// Lower-case and trim a domain, and prefix `*` so a bare domain also
/// matches its subdomains under WebKit's domain semantics.
fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    if domain.starts_with('*') || domain.starts_with('.') {
        domain
    } else {
        format!("*{domain}")
    }
}

#[cfg(test)]
#[path = "../tests/unit/content_blocking.rs"]
mod unit_tests;
