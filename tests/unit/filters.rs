use super::*;

#[test]
fn comments() {
    assert_eq!(classify("! EasyList title line").kind, FilterKind::Comment);
    assert_eq!(classify("[Adblock Plus 2.0]").kind, FilterKind::Comment);
}

#[test]
fn scriptlets_are_unsupported() {
    let filter = classify("##+js(nowebrtc)");
    assert_eq!(filter.kind, FilterKind::Unsupported);
    assert_eq!(filter.skip, Some(SkipReason::Scriptlet));
    assert_eq!(
        classify("example.com#@#+js(nostif)").skip,
        Some(SkipReason::Scriptlet)
    );
}

#[test]
fn html_filters_are_unsupported() {
    assert_eq!(
        classify("example.com##^script").skip,
        Some(SkipReason::HtmlFilter)
    );
    assert_eq!(
        classify("example.com#@#^script").skip,
        Some(SkipReason::HtmlFilter)
    );
}

#[test]
fn procedural_selectors_are_unsupported() {
    for line in [
        "example.com##div:has(.ad)",
        "example.com##p:has-text(Sponsored)",
        "example.com##div:upward(2)",
        "example.com##.box:style(height: 0)",
        "example.com##div:matches-css(opacity: 0)",
    ] {
        assert_eq!(classify(line).skip, Some(SkipReason::Procedural), "{line}");
    }
}

#[test]
fn html_filter_wins_over_procedural_marker() {
    // `##^` takes precedence even when a procedural token co-occurs.
    assert_eq!(
        classify("example.com##^script:has-text(ads)").skip,
        Some(SkipReason::HtmlFilter)
    );
}

#[test]
fn cosmetic_filters_split_domains_and_selector() {
    let filter = classify("example.com,~shop.example.com##.ad-banner");
    assert_eq!(filter.kind, FilterKind::Cosmetic);
    assert_eq!(filter.domains, ["example.com", "~shop.example.com"]);
    assert_eq!(filter.selector, ".ad-banner");

    let generic = classify("##.ad-640x480");
    assert!(generic.domains.is_empty());
    assert_eq!(generic.selector, ".ad-640x480");
}

#[test]
fn cosmetic_exception_filters() {
    let filter = classify("example.com#@#.ad");
    assert_eq!(filter.kind, FilterKind::CosmeticException);
    assert_eq!(filter.domains, ["example.com"]);
    assert_eq!(filter.selector, ".ad");
}

#[test]
fn network_and_exception_filters() {
    let filter = classify("||ads.example.com^");
    assert_eq!(filter.kind, FilterKind::Network);
    assert_eq!(filter.pattern, "||ads.example.com^");
    assert!(filter.options.is_empty());

    let exception = classify("@@||safe.com^");
    assert_eq!(exception.kind, FilterKind::Exception);
    assert_eq!(exception.pattern, "||safe.com^");
}

#[test]
fn options_are_split_from_the_pattern() {
    let filter = classify("||ads.example.com^$script,third-party");
    assert_eq!(filter.pattern, "||ads.example.com^");
    assert_eq!(filter.options.resource_types, ["script"]);
    assert_eq!(filter.options.third_party, Some(true));
}

#[test]
fn regex_trailing_dollar_is_not_an_option_separator() {
    let filter = classify(r"/banner\d+$/");
    assert_eq!(filter.pattern, r"/banner\d+$/");
    assert!(filter.options.is_empty());
}

#[test]
fn escaped_dollar_is_not_an_option_separator() {
    let filter = classify(r"foo\$bar");
    assert_eq!(filter.pattern, r"foo\$bar");
    assert!(filter.options.is_empty());
}

#[test]
fn party_and_flag_options() {
    let filter = classify("||x.com^$~third-party,match-case,important");
    assert_eq!(filter.options.third_party, Some(false));
    assert!(filter.options.match_case);
    assert!(filter.options.important);

    assert_eq!(classify("||x.com^$3p").options.third_party, Some(true));
    assert_eq!(classify("||x.com^$1p").options.third_party, Some(false));
    assert_eq!(classify("||x.com^$first-party").options.third_party, Some(false));
    assert_eq!(classify("||x.com^$~3p").options.third_party, Some(false));
}

#[test]
fn domain_option_routes_negated_tokens_to_exclude() {
    let filter = classify("||x.com^$domain=a.com|~b.com|c.com");
    assert_eq!(filter.options.include_domains, ["a.com", "c.com"]);
    assert_eq!(filter.options.exclude_domains, ["b.com"]);
}

#[test]
fn resource_type_aliases_map_to_webkit_names() {
    let filter = classify("||x.com^$script,img,css,xhr,frame,ping");
    assert_eq!(
        filter.options.resource_types,
        ["script", "image", "style-sheet", "raw", "document"]
    );
}

#[test]
fn negated_resource_types_collapse_to_their_mapping() {
    let filter = classify("||x.com^$~image");
    assert_eq!(filter.options.resource_types, ["image"]);
}

#[test]
fn unrecognized_option_tokens_are_ignored() {
    let filter = classify("||x.com^$script,ghide");
    assert_eq!(filter.kind, FilterKind::Network);
    assert_eq!(filter.options.resource_types, ["script"]);
}

#[test]
fn unsupported_options_discard_the_whole_filter() {
    for line in [
        "||x.com^$redirect=noop.js",
        "||x.com^$redirect-rule=noop.js",
        "||x.com^$script,csp=script-src 'none'",
        "||x.com^$removeparam=utm_source",
        "||x.com^$header=via",
    ] {
        let filter = classify(line);
        assert_eq!(filter.kind, FilterKind::Unsupported, "{line}");
        assert_eq!(filter.skip, Some(SkipReason::UnsupportedOption), "{line}");
    }
}

#[test]
fn skip_reason_labels_are_stable() {
    assert_eq!(SkipReason::Scriptlet.label(), "scriptlet");
    assert_eq!(SkipReason::HtmlFilter.label(), "html-filter");
    assert_eq!(SkipReason::Procedural.label(), "procedural");
    assert_eq!(SkipReason::UnsupportedOption.label(), "unsupported-option");
    assert_eq!(SkipReason::InvalidRegex.label(), "invalid-regex");
    assert_eq!(SkipReason::CosmeticException.label(), "cosmetic-exception");
    assert_eq!(SkipReason::EmptySelector.label(), "empty-selector");
}
