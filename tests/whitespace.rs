//
// Whitespace-control tests: explicit `~` strip markers, implicit
// standalone-tag trimming, and strip markers on inverse delimiters.
//

use hbars::Template;
use rstest::rstest;
use serde_json::json;

fn render(input: &str, data: serde_json::Value) -> String {
    Template::parse(input)
        .unwrap_or_else(|e| panic!("failed to parse '{}': {}", input, e))
        .render(data)
        .unwrap_or_else(|e| panic!("failed to render '{}': {}", input, e))
}

#[rstest]
#[case(" {{~foo~}} ", "bar&lt;")]
#[case(" {{~foo}} ", "bar&lt; ")]
#[case(" {{foo~}} ", " bar&lt;")]
#[case(" {{~&foo~}} ", "bar<")]
#[case(" {{~{foo}~}} ", "bar<")]
fn strips_whitespace_around_mustache_calls(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, json!({"foo": "bar<"})), expected);
}

#[test]
fn strip_reaches_through_blank_lines() {
    assert_eq!(
        render("1\n{{foo~}} \n\n 23\n{{bar}}4", json!({})),
        "1\n23\n4"
    );
}

#[rstest]
#[case(" {{~#if foo~}} bar {{~/if~}} ", "bar")]
#[case(" {{#if foo~}} bar {{/if~}} ", " bar ")]
#[case(" {{~#if foo}} bar {{~/if}} ", " bar ")]
#[case(" {{#if foo}} bar {{/if}} ", "  bar  ")]
#[case(" \n\n{{~#if foo~}} \n\nbar \n\n{{~/if~}}\n\n ", "bar")]
#[case(" a\n\n{{~#if foo~}} \n\nbar \n\n{{~/if~}}\n\na ", " abara ")]
fn strips_whitespace_around_simple_block_calls(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, json!({"foo": "bar<"})), expected);
}

#[rstest]
#[case(" {{~^if foo~}} bar {{~/if~}} ", "bar")]
#[case(" {{^if foo~}} bar {{/if~}} ", " bar ")]
#[case(" {{~^if foo}} bar {{~/if}} ", " bar ")]
#[case(" {{^if foo}} bar {{/if}} ", "  bar  ")]
#[case(" \n\n{{~^if foo~}} \n\nbar \n\n{{~/if~}}\n\n ", "bar")]
fn strips_whitespace_around_inverse_block_calls(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(render(input, json!(null)), expected);
}

// Strip markers on the inverse delimiter itself ({{~^~}}, {{~else~}}).
#[rstest]
#[case("{{#if foo~}} bar {{~^~}} baz {{~/if}}", json!({"foo": 1}), "bar")]
#[case("{{#if foo~}} bar {{^~}} baz {{/if}}", json!({"foo": 1}), "bar ")]
#[case("{{#if foo}} bar {{~^~}} baz {{~/if}}", json!({"foo": 1}), " bar")]
#[case("{{#if foo}} bar {{^~}} baz {{/if}}", json!({"foo": 1}), " bar ")]
#[case("{{#if foo~}} bar {{~else~}} baz {{~/if}}", json!({"foo": 1}), "bar")]
#[case("{{#if foo~}} bar {{~^~}} baz {{~/if}}", json!(null), "baz")]
#[case("{{#if foo}} bar {{~^~}} baz {{/if}}", json!(null), "baz ")]
#[case("{{#if foo~}} bar {{~^}} baz {{~/if}}", json!(null), " baz")]
#[case("{{#if foo~}} bar {{~^}} baz {{/if}}", json!(null), " baz ")]
#[case("{{#if foo~}} bar {{~else~}} baz {{~/if}}", json!(null), "baz")]
fn strips_whitespace_around_inverse_delimiters(
    #[case] input: &str,
    #[case] data: serde_json::Value,
    #[case] expected: &str,
) {
    assert_eq!(render(input, data), expected);
}

#[test]
fn standalone_block_lines_are_trimmed() {
    assert_eq!(
        render("a\n{{#if x}}\nb\n{{/if}}\nc", json!({"x": 1})),
        "a\nb\nc"
    );
    assert_eq!(render("a\n{{#if x}}\nb\n{{/if}}\nc", json!({})), "a\nc");
}

#[test]
fn standalone_else_line_is_trimmed() {
    let input = "{{#if x}}\na\n{{else}}\nb\n{{/if}}";
    assert_eq!(render(input, json!({"x": 1})), "a\n");
    assert_eq!(render(input, json!({})), "b\n");
}

#[test]
fn standalone_comment_line_is_trimmed() {
    assert_eq!(
        render("a\n  {{! a comment }}  \nb", json!({})),
        "a\nb"
    );
    assert_eq!(
        render("a\n  {{!-- a -- comment --}}  \nb", json!({})),
        "a\nb"
    );
}

#[test]
fn plain_mustaches_never_trim_standalone_lines() {
    assert_eq!(
        render("a\n  {{foo}}  \nb", json!({"foo": "x"})),
        "a\n  x  \nb"
    );
}

#[test]
fn comments_render_nothing() {
    assert_eq!(render("a{{! inline }}b", json!({})), "ab");
    assert_eq!(render("a{{!-- has {{tags}} --}}b", json!({})), "ab");
}
