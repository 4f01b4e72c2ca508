use super::*;
use crate::content_blocking::{CbRuleAction, CbRuleTrigger};

fn block_rule(url_filter: &str) -> CbRule {
    CbRule {
        trigger: CbRuleTrigger {
            url_filter: url_filter.to_string(),
            case_sensitive: None,
            resource_type: None,
            load_type: None,
            if_domain: None,
            unless_domain: None,
        },
        action: CbRuleAction {
            typ: CbType::Block,
            selector: None,
        },
    }
}

#[test]
fn no_split_under_the_limit() {
    let rules: Vec<_> = (0..3).map(|i| block_rule(&format!("r{i}"))).collect();
    let parts = split_rules(&rules, "easylist", 10);

    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].0, "easylist");
    assert_eq!(parts[0].1, rules);
}

#[test]
fn splits_into_numbered_parts_preserving_order() {
    let rules: Vec<_> = (0..5).map(|i| block_rule(&format!("r{i}"))).collect();
    let parts = split_rules(&rules, "combined", 2);

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].0, "combined-part1");
    assert_eq!(parts[1].0, "combined-part2");
    assert_eq!(parts[2].0, "combined-part3");
    assert_eq!(parts[0].1.len(), 2);
    assert_eq!(parts[2].1.len(), 1);
    assert_eq!(parts[0].1[0].trigger.url_filter, "r0");
    assert_eq!(parts[2].1[0].trigger.url_filter, "r4");
}

#[test]
fn zero_limit_falls_back_to_the_webkit_maximum() {
    let parts = split_rules(&[block_rule("a")], "x", 0);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].0, "x");
}

#[test]
fn dedup_keeps_the_first_occurrence() {
    let deduped = dedup_rules(vec![block_rule("a"), block_rule("b"), block_rule("a")]);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].trigger.url_filter, "a");
    assert_eq!(deduped[1].trigger.url_filter, "b");
}

#[test]
fn dedup_key_includes_action_type_and_selector() {
    let mut ignore = block_rule("a");
    ignore.action.typ = CbType::IgnorePreviousRules;

    let mut hide = block_rule(".*");
    hide.action.typ = CbType::CssDisplayNone;
    hide.action.selector = Some(".ad".to_string());

    let mut hide_other = hide.clone();
    hide_other.action.selector = Some(".banner".to_string());

    let deduped = dedup_rules(vec![block_rule("a"), ignore, hide, hide_other]);
    assert_eq!(deduped.len(), 4);
}

#[test]
fn dedup_key_ignores_trigger_scoping() {
    let mut scoped = block_rule("a");
    scoped.trigger.if_domain = Some(vec!["*x.com".to_string()]);

    let deduped = dedup_rules(vec![block_rule("a"), scoped]);
    assert_eq!(deduped.len(), 1);
    assert!(deduped[0].trigger.if_domain.is_none());
}
