//
// Partial tests: registry lookup, explicit contexts, hash data, computed
// names, and the recursion guard.
//

use hbars::{HelperContext, Template, Value};
use serde_json::json;

#[test]
fn renders_a_partial_with_the_current_context() {
    let mut tpl = Template::parse("Hello {{> who}}!").unwrap();
    tpl.register_partial("who", "{{name}}").unwrap();

    assert_eq!(tpl.render(json!({"name": "world"})).unwrap(), "Hello world!");
}

#[test]
fn renders_a_partial_with_an_explicit_context() {
    let mut tpl = Template::parse("{{> person author}}").unwrap();
    tpl.register_partial("person", "{{first}} {{last}}").unwrap();

    assert_eq!(
        tpl.render(json!({"author": {"first": "Alan", "last": "Johnson"}}))
            .unwrap(),
        "Alan Johnson"
    );
}

#[test]
fn partial_hash_rides_on_the_data_frame() {
    let mut tpl = Template::parse("{{> greeting word=\"Hi\"}}").unwrap();
    tpl.register_partial("greeting", "{{@word}}, {{name}}!").unwrap();

    assert_eq!(tpl.render(json!({"name": "Ada"})).unwrap(), "Hi, Ada!");
}

#[test]
fn partial_hash_does_not_leak_out() {
    let mut tpl = Template::parse("{{> p word=\"x\"}}{{@word}}").unwrap();
    tpl.register_partial("p", "{{@word}}").unwrap();

    assert_eq!(tpl.render(json!({})).unwrap(), "x");
}

#[test]
fn partials_nest() {
    let mut tpl = Template::parse("{{> outer}}").unwrap();
    tpl.register_partials([("outer", "[{{> inner}}]"), ("inner", "{{v}}")])
        .unwrap();

    assert_eq!(tpl.render(json!({"v": "x"})).unwrap(), "[x]");
}

#[test]
fn string_literal_partial_names() {
    let mut tpl = Template::parse("{{> \"the name\"}}").unwrap();
    tpl.register_partial("the name", "ok").unwrap();

    assert_eq!(tpl.render(json!({})).unwrap(), "ok");
}

#[test]
fn computed_partial_names() {
    let mut tpl = Template::parse("{{> (which) }}").unwrap();
    tpl.register_partial("a", "picked a").unwrap();
    tpl.register_partial("b", "picked b").unwrap();
    tpl.register_helper("which", |_: &mut HelperContext| {
        Ok(Value::Str("b".into()))
    })
    .unwrap();

    assert_eq!(tpl.render(json!({})).unwrap(), "picked b");
}

#[test]
fn partials_in_blocks() {
    let mut tpl =
        Template::parse("{{#each people}}{{> row}}{{/each}}").unwrap();
    tpl.register_partial("row", "{{@index}}:{{name}};").unwrap();

    assert_eq!(
        tpl.render(json!({"people": [{"name": "a"}, {"name": "b"}]}))
            .unwrap(),
        "0:a;1:b;"
    );
}

#[test]
fn standalone_partial_lines_are_trimmed() {
    let mut tpl = Template::parse("a\n{{> p}}\nb").unwrap();
    tpl.register_partial("p", "X").unwrap();

    assert_eq!(tpl.render(json!({})).unwrap(), "a\nXb");
}

#[test]
fn missing_partial_is_a_hard_error() {
    let tpl = Template::parse("{{> missing}}").unwrap();

    let err = tpl.render(json!({})).unwrap_err();
    assert_eq!(err.code, "E_PARTIAL");
    assert!(err.message.contains("missing"));
}

#[test]
fn malformed_partials_fail_at_registration() {
    let mut tpl = Template::parse("{{> p}}").unwrap();

    let err = tpl.register_partial("p", "{{#if x}}").unwrap_err();
    assert!(err.is_parse_error());
}

#[test]
fn cyclic_partials_hit_the_recursion_guard() {
    let mut tpl = Template::parse("{{> a}}").unwrap();
    tpl.register_partial("a", "{{> b}}").unwrap();
    tpl.register_partial("b", "{{> a}}").unwrap();

    let err = tpl.render(json!({})).unwrap_err();
    assert_eq!(err.code, "E_PARTIAL");
    assert!(err.message.contains("recursion"));
}
