use super::*;
use crate::content_blocking::CbType;

#[test]
fn network_rule_end_to_end() {
    let (rules, stats) = convert_list("||ads.example.com^$script,third-party\n");

    // Separator-class rule plus its end-anchor duplicate.
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].action.typ, CbType::Block);
    assert_eq!(
        rules[0].trigger.resource_type.as_deref(),
        Some(&["script".to_string()][..])
    );
    assert_eq!(
        rules[0].trigger.load_type.as_deref(),
        Some(&["third-party".to_string()][..])
    );

    assert_eq!(stats.total, 1);
    assert_eq!(stats.network, 1);
    assert_eq!(stats.converted, 2);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn exception_rule_end_to_end() {
    let (rules, stats) = convert_list("@@||safe.com^");
    assert!(!rules.is_empty());
    assert!(rules
        .iter()
        .all(|rule| rule.action.typ == CbType::IgnorePreviousRules));
    assert_eq!(stats.exceptions, 1);
}

#[test]
fn cosmetic_rule_end_to_end() {
    let (rules, stats) = convert_list("example.com##.ad-banner");
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].trigger.url_filter, ".*");
    assert_eq!(
        rules[0].trigger.if_domain.as_deref(),
        Some(&["*example.com".to_string()][..])
    );
    assert_eq!(rules[0].action.typ, CbType::CssDisplayNone);
    assert_eq!(rules[0].action.selector.as_deref(), Some(".ad-banner"));
    assert_eq!(stats.cosmetic, 1);
}

#[test]
fn scriptlet_counts_one_skip_and_no_rules() {
    let (rules, stats) = convert_list("##+js(scriptlet)");
    assert!(rules.is_empty());
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.skip_reasons.get("scriptlet"), Some(&1));
}

#[test]
fn comments_and_blank_lines_are_not_converted() {
    let (rules, stats) = convert_list("! title\n\n[Adblock Plus 2.0]\n||x.com^\n");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.comments, 2);
    assert_eq!(stats.network, 1);
    assert_eq!(rules.len(), 2);
}

#[test]
fn invalid_regex_skips_the_filter_but_not_the_run() {
    let (rules, stats) = convert_list("/foo|bar/\n||ok.com^\n");
    assert_eq!(stats.skip_reasons.get("invalid-regex"), Some(&1));
    assert_eq!(rules.len(), 2);
    assert!(rules
        .iter()
        .all(|rule| rule.trigger.url_filter.contains("ok\\.com")));
}

#[test]
fn output_preserves_input_order() {
    let (rules, _) = convert_list("first.com/a\nsecond.com/b\n");
    assert_eq!(rules[0].trigger.url_filter, r"first\.com/a");
    assert_eq!(rules[1].trigger.url_filter, r"second\.com/b");
}

#[test]
fn stats_merge_accumulates_counters_and_reasons() {
    let (_, a) = convert_list("||x.com^$script\n##+js(x)\n");
    let (_, b) = convert_list("/foo|bar/\n");

    let mut total = a.clone();
    total.merge(&b);

    assert_eq!(total.total, 3);
    assert_eq!(total.skipped, 2);
    assert_eq!(total.skip_reasons.get("scriptlet"), Some(&1));
    assert_eq!(total.skip_reasons.get("invalid-regex"), Some(&1));
    assert_eq!(total.converted, a.converted);
}

#[test]
fn repeated_runs_are_deterministic() {
    let list = "||ads.example.com^$script\nexample.com##.ad\n/foo|bar/\n";
    let (rules_a, stats_a) = convert_list(list);
    let (rules_b, stats_b) = convert_list(list);
    assert_eq!(rules_a, rules_b);
    assert_eq!(stats_a, stats_b);
}
