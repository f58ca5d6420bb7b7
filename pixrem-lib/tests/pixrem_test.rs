use pixrem_lib::{process, Error, Options};
use pretty_assertions::assert_eq;

fn process_with(css: &str, options: Options) -> String {
    process(css, &options).expect("processing failed").css
}

fn process_default(css: &str) -> String {
    process_with(css, Options::default())
}

fn with_root(root: &str) -> Options {
    Options {
        root_value: root.to_string(),
        ..Options::default()
    }
}

fn with_browsers(browsers: &str) -> Options {
    Options {
        browsers: browsers.to_string(),
        ..Options::default()
    }
}

#[test]
fn generates_fallbacks_using_default_settings() {
    assert_eq!(
        process_default(".rule { font-size: 2rem }"),
        ".rule { font-size: 32px; font-size: 2rem }"
    );
}

#[test]
fn generates_fallbacks_with_a_pixel_root_value() {
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("20px")),
        ".rule { font-size: 40px; font-size: 2rem }"
    );
}

#[test]
fn generates_fallbacks_with_relative_root_values() {
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("1.5em")),
        ".rule { font-size: 48px; font-size: 2rem }"
    );
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("1.75rem")),
        ".rule { font-size: 56px; font-size: 2rem }"
    );
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("150%")),
        ".rule { font-size: 48px; font-size: 2rem }"
    );
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("18")),
        ".rule { font-size: 36px; font-size: 2rem }"
    );
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root(".5em")),
        ".rule { font-size: 16px; font-size: 2rem }"
    );
}

#[test]
fn warns_and_uses_16px_for_browser_dependent_root_units() {
    let result = process(".rule { font-size: 2rem }", &with_root("1vw")).unwrap();
    assert_eq!(result.css, ".rule { font-size: 32px; font-size: 2rem }");
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(
        result.warnings[0].message,
        "Unit cannot be used for conversion, so 16px is used."
    );
    assert_eq!(result.warnings[0].plugin, "pixrem");

    // Same fallback without inspecting warnings.
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root(".625vw")),
        ".rule { font-size: 32px; font-size: 2rem }"
    );
}

#[test]
fn emits_a_single_warning_per_run() {
    let result = process(
        ".a { width: 1rem } .b { width: 2rem }",
        &with_root("2vw"),
    )
    .unwrap();
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn replace_mode_overwrites_declarations() {
    let options = Options {
        replace: true,
        ..with_root("20px")
    };
    assert_eq!(
        process_with(".rule { font-size: 2rem }", options),
        ".rule { font-size: 40px }"
    );
}

#[test]
fn replace_mode_keeps_the_declaration_count() {
    let css = ".rule{\n\tcolor:red;\n\n\tfont-size:2rem;\n}";
    let options = Options {
        replace: true,
        ..Options::default()
    };
    let output = process_with(css, options);
    assert_eq!(output, ".rule{\n\tcolor:red;\n\n\tfont-size:32px;\n}");

    let before = pixrem_lib::parser::css::parse(css).unwrap();
    let after = pixrem_lib::parser::css::parse(&output).unwrap();
    assert_eq!(
        before.rules[0].declarations.len(),
        after.rules[0].declarations.len()
    );
}

#[test]
fn rounds_values_based_on_precision() {
    assert_eq!(
        process_with(".rule { font-size: 2rem }", with_root("1.126em")),
        ".rule { font-size: 36.032px; font-size: 2rem }"
    );

    let precision_zero = Options {
        unit_precision: 0,
        ..with_root("1.126em")
    };
    assert_eq!(
        process_with(".rule { font-size: 2rem }", precision_zero),
        ".rule { font-size: 36px; font-size: 2rem }"
    );

    // 1.156em resolves to an 18.49..px base; flooring never rounds up.
    let floored = Options {
        unit_precision: 0,
        ..with_root("1.156em")
    };
    assert_eq!(
        process_with(".rule { font-size: 2rem }", floored),
        ".rule { font-size: 36px; font-size: 2rem }"
    );
}

#[test]
fn handles_sub_one_and_negative_values() {
    assert_eq!(
        process_default(".rule { margin: 0.5rem .5rem 0rem -2rem }"),
        ".rule { margin: 8px 8px 0px -32px; margin: 0.5rem .5rem 0rem -2rem }"
    );
}

#[test]
fn does_not_convert_rem_in_at_rules_by_default() {
    let css =
        "@media screen { .rule { font-size: 2rem } } @keyframes name { from { font-size: 2rem } }";
    assert_eq!(process_default(css), css);
}

#[test]
fn converts_rem_in_at_rules_when_enabled() {
    let options = Options {
        atrules: true,
        ..Options::default()
    };
    assert_eq!(
        process_with("@media screen { .rule { font-size: 2rem } }", options),
        "@media screen { .rule { font-size: 32px; font-size: 2rem } }"
    );
}

#[test]
fn converts_rem_in_at_rules_for_ie9_hacks() {
    let css = "@media screen { .rule { font-size: 2rem } .rule::after { font-size: 2rem } }";
    let expected =
        "@media screen { .rule { font-size: 2rem } .rule::after { font-size: 32px; font-size: 2rem } }";
    assert_eq!(process_with(css, with_browsers("ie 9")), expected);
}

#[test]
fn never_converts_rem_in_nested_at_rules() {
    let css = "@media screen { .rule { font-size: 2rem } @media screen { .rule { font-size: 2rem } @media screen { .rule { font-size: 2rem } } } }";
    assert_eq!(process_default(css), css);

    // Even with at-rule conversion on, only one nesting level is in scope.
    let options = Options {
        atrules: true,
        ..Options::default()
    };
    let expected = "@media screen { .rule { font-size: 32px; font-size: 2rem } @media screen { .rule { font-size: 2rem } @media screen { .rule { font-size: 2rem } } } }";
    assert_eq!(process_with(css, options), expected);
}

#[test]
fn does_not_convert_statically_incompatible_values() {
    let css = ".rule { width: calc(100% - 2rem); background: linear-gradient(red 2rem, blue) }";
    assert_eq!(process_default(css), css);
}

#[test]
fn does_not_convert_excluded_properties() {
    let css = ".rule { transform: translate(2rem) }";
    assert_eq!(process_default(css), css);
}

#[test]
fn does_not_convert_excluded_features_behind_vendor_prefixes() {
    let css =
        ".rule { width: -webkit-calc(100% - 2rem); width: calc(100% - 2rem); -ms-transform: translate(2rem) }";
    assert_eq!(process_default(css), css);
}

#[test]
fn uses_root_font_size_defined_in_css() {
    assert_eq!(
        process_default("html { font-size: 62.5% } .rule { font-size: 2rem; }"),
        "html { font-size: 62.5% } .rule { font-size: 20px; font-size: 2rem; }"
    );
}

#[test]
fn uses_root_font_size_from_font_shorthand() {
    assert_eq!(
        process_default(".rule { font-size: 2rem; } :root { font: italic 100 20px/24px sans-serif }"),
        ".rule { font-size: 40px; font-size: 2rem; } :root { font: italic 100 20px/24px sans-serif }"
    );
}

#[test]
fn detects_root_font_size_only_for_exact_selectors() {
    assert_eq!(
        process_default(":root a { font-size: 10px } .rule { font-size: 2rem; }"),
        ":root a { font-size: 10px } .rule { font-size: 32px; font-size: 2rem; }"
    );
}

#[test]
fn uses_root_font_size_defined_with_calc() {
    assert_eq!(
        process_default("html { font-size: calc(.625em * 1) } .rule { font-size: 2rem; }"),
        "html { font-size: calc(.625em * 1) } .rule { font-size: 20px; font-size: 2rem; }"
    );
}

#[test]
fn ignores_root_font_size_in_media_queries() {
    let css =
        "html { font-size: 10px } @media screen { html { font-size: 20px } } .rule { font-size: 2rem; }";
    let expected =
        "html { font-size: 10px } @media screen { html { font-size: 20px } } .rule { font-size: 20px; font-size: 2rem; }";
    assert_eq!(process_default(css), expected);
}

#[test]
fn runs_through_font_shorthand_without_a_size() {
    assert_eq!(
        process_default("html { font: inherit } .rule { font-size: 2rem; }"),
        "html { font: inherit } .rule { font-size: 32px; font-size: 2rem; }"
    );
}

#[test]
fn ignores_detected_root_font_size_when_disabled() {
    let options = Options {
        html: false,
        ..Options::default()
    };
    assert_eq!(
        process_with("html { font-size: 10px } .rule { font-size: 2rem; }", options),
        "html { font-size: 10px } .rule { font-size: 32px; font-size: 2rem; }"
    );
}

#[test]
fn fails_when_root_font_size_is_invalid() {
    let err = process(
        "html { font-size: calc(1em + 2px) } .rule { font-size: 2rem; }",
        &Options::default(),
    )
    .unwrap_err();
    assert_eq!(err.reason(), "Root font-size is invalid");
    assert!(matches!(&err, Error::InvalidRootSize { .. }));
    assert_eq!(err.position().0, 1);
}

#[test]
fn reduces_line_breaks_when_inserting() {
    assert_eq!(
        process_default(".rule{\n\tcolor:red;\n\n\tfont-size:2rem;\n}"),
        ".rule{\n\tcolor:red;\n\n\tfont-size:32px;\n\tfont-size:2rem;\n}"
    );
}

#[test]
fn reduces_and_keeps_windows_line_breaks() {
    assert_eq!(
        process_default(".rule{\r\n\tcolor:red;\r\n\r\n\tfont-size:2rem;\r\n}"),
        ".rule{\r\n\tcolor:red;\r\n\r\n\tfont-size:32px;\r\n\tfont-size:2rem;\r\n}"
    );
}

#[test]
fn reduces_and_keeps_carriage_return_line_breaks() {
    assert_eq!(
        process_default(".rule{\r\tcolor:red;\r\r\tfont-size:2rem;\r}"),
        ".rule{\r\tcolor:red;\r\r\tfont-size:32px;\r\tfont-size:2rem;\r}"
    );
}

#[test]
fn is_a_strict_noop_when_no_target_needs_fallbacks() {
    let css = ".rule{width: 2rem}";
    let result = process(css, &with_browsers("firefox 28")).unwrap();
    assert_eq!(result.css, css);
    assert!(result.warnings.is_empty());

    // Even an unconvertible root value must not surface.
    let options = Options {
        browsers: "chrome >= 50".to_string(),
        root_value: "calc(1em + 2px)".to_string(),
        ..Options::default()
    };
    let result = process(css, &options).unwrap();
    assert_eq!(result.css, css);
    assert!(result.warnings.is_empty());
}

#[test]
fn adds_fallbacks_for_legacy_browser_scopes() {
    let css = ".rule{width: 2rem}";
    let expected = ".rule{width: 32px;width: 2rem}";
    for browsers in ["ie 8", "ie >= 8", "ie <= 8", "ie 6"] {
        assert_eq!(process_with(css, with_browsers(browsers)), expected);
    }
}

#[test]
fn ie9_scope_converts_only_font_and_pseudo_elements() {
    let css = ".rule{width: 2rem;font: bold 2rem sans-serif}.rule::after{width: 2rem}";
    let expected = ".rule{width: 2rem;font: bold 32px sans-serif;font: bold 2rem sans-serif}.rule::after{width: 32px;width: 2rem}";
    assert_eq!(process_with(css, with_browsers("ie 9")), expected);
}

#[test]
fn repeated_properties_are_not_given_a_second_fallback() {
    assert_eq!(
        process_default(".rule { font-size: 1rem; font-size: 2rem }"),
        ".rule { font-size: 16px; font-size: 1rem; font-size: 2rem }"
    );
}

#[test]
fn processing_is_idempotent() {
    let css = ".rule{\n\tcolor:red;\n\n\tfont-size:2rem;\n}";
    let once = process_default(css);
    let twice = process_default(&once);
    assert_eq!(twice, once);
}
