//
// Sub-expression tests: parenthesized helper calls as parameters, nesting,
// and mixing with plain paths.
//

use hbars::{HelperContext, Result, Template, Value};
use serde_json::json;

fn blog(h: &mut HelperContext) -> Result<Value> {
    Ok(Value::Str(format!("val is {}", h.param_str(0))))
}

fn equal(h: &mut HelperContext) -> Result<Value> {
    let result = h.param_str(0) == h.param_str(1);
    Ok(Value::Str(result.to_string()))
}

fn concat(h: &mut HelperContext) -> Result<Value> {
    Ok(Value::Str(format!("{}{}", h.param_str(0), h.param_str(1))))
}

fn dash(h: &mut HelperContext) -> Result<Value> {
    Ok(Value::Str(format!("{}-{}", h.param_str(0), h.param_str(1))))
}

fn render_with(
    input: &str,
    data: serde_json::Value,
    helpers: &[(&str, fn(&mut HelperContext) -> Result<Value>)],
) -> String {
    let mut tpl = Template::parse(input).unwrap();
    for (name, helper) in helpers {
        tpl.register_helper(name, *helper).unwrap();
    }
    tpl.render(data).unwrap()
}

#[test]
fn arg_less_helper() {
    let mut tpl = Template::parse("{{foo (bar)}}!").unwrap();
    tpl.register_helper("foo", |h: &mut HelperContext| {
        Ok(Value::Str(format!("{}{}", h.param_str(0), h.param_str(0))))
    })
    .unwrap();
    tpl.register_helper("bar", |_: &mut HelperContext| Ok(Value::Str("LOL".into())))
        .unwrap();

    assert_eq!(tpl.render(json!({})).unwrap(), "LOLLOL!");
}

#[test]
fn helper_with_args() {
    let output = render_with(
        "{{blog (equal a b)}}",
        json!({"bar": "LOL"}),
        &[("blog", blog), ("equal", equal)],
    );
    assert_eq!(output, "val is true");
}

#[test]
fn mixed_paths_and_helpers() {
    let mut tpl = Template::parse("{{blog baz.bat (equal a b) baz.bar}}").unwrap();
    tpl.register_helper("blog", |h: &mut HelperContext| {
        Ok(Value::Str(format!(
            "val is {}, {} and {}",
            h.param_str(0),
            h.param_str(1),
            h.param_str(2)
        )))
    })
    .unwrap();
    tpl.register_helper("equal", equal).unwrap();

    let output = tpl
        .render(json!({"bar": "LOL", "baz": {"bat": "foo!", "bar": "bar!"}}))
        .unwrap();
    assert_eq!(output, "val is foo!, true and bar!");
}

#[test]
fn supports_nesting() {
    let output = render_with(
        "{{blog (equal (equal true true) true)}}",
        json!({}),
        &[("blog", blog), ("equal", equal)],
    );
    assert_eq!(output, "val is true");
}

#[test]
fn complex_subexpressions() {
    let data = json!({
        "a": "a", "b": "b", "c": {"c": "c"}, "d": "d", "e": {"e": "e"}
    });
    let helpers: &[(&str, fn(&mut HelperContext) -> Result<Value>)] =
        &[("dash", dash), ("concat", concat)];

    for (input, expected) in [
        ("{{dash 'abc' (concat a b)}}", "abc-ab"),
        ("{{dash d (concat a b)}}", "d-ab"),
        ("{{dash c.c (concat a b)}}", "c-ab"),
        ("{{dash (concat a b) c.c}}", "ab-c"),
        ("{{dash (concat a e.e) c.c}}", "ae-c"),
    ] {
        assert_eq!(render_with(input, data.clone(), helpers), expected, "{}", input);
    }
}

#[test]
fn subexpressions_in_hash_values() {
    let mut tpl = Template::parse("{{blog title=(concat a b)}}").unwrap();
    tpl.register_helper("blog", |h: &mut HelperContext| {
        Ok(Value::Str(format!("title: {}", h.option("title").stringify())))
    })
    .unwrap();
    tpl.register_helper("concat", concat).unwrap();

    assert_eq!(
        tpl.render(json!({"a": "x", "b": "y"})).unwrap(),
        "title: xy"
    );
}

#[test]
fn subexpressions_in_block_helpers() {
    let output = render_with(
        "{{#if (equal mode \"draft\")}}draft{{else}}live{{/if}}",
        json!({"mode": "draft"}),
        &[("equal", equal)],
    );
    assert_eq!(output, "draft");
}

#[test]
fn unknown_helper_in_subexpression_fails() {
    let mut tpl = Template::parse("{{blog (nope 1 2)}}").unwrap();
    tpl.register_helper("blog", blog).unwrap();

    let err = tpl.render(json!({})).unwrap_err();
    assert_eq!(err.code, "E_HELPER");
}
