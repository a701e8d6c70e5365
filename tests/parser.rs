//
// Parser tests: AST shape via the stable tree printer, plus grammar
// failure modes.
//

use hbars::Template;

struct ParserTest {
    name: &'static str,
    input: &'static str,
    output: &'static str,
}

fn launch(tests: &[ParserTest]) {
    for test in tests {
        let tpl = Template::parse(test.input)
            .unwrap_or_else(|e| panic!("test '{}' failed to parse: {}", test.name, e));
        assert_eq!(tpl.print_ast(), test.output, "test '{}'", test.name);
    }
}

#[test]
fn parses_simple_mustaches() {
    launch(&[
        ParserTest { name: "number", input: "{{123}}", output: "{{ NUMBER{123} [] }}\n" },
        ParserTest { name: "string", input: "{{\"foo\"}}", output: "{{ \"foo\" [] }}\n" },
        ParserTest { name: "false", input: "{{false}}", output: "{{ BOOLEAN{false} [] }}\n" },
        ParserTest { name: "true", input: "{{true}}", output: "{{ BOOLEAN{true} [] }}\n" },
        ParserTest { name: "path", input: "{{foo}}", output: "{{ PATH:foo [] }}\n" },
        ParserTest { name: "path ?", input: "{{foo?}}", output: "{{ PATH:foo? [] }}\n" },
        ParserTest { name: "path _", input: "{{foo_}}", output: "{{ PATH:foo_ [] }}\n" },
        ParserTest { name: "path -", input: "{{foo-}}", output: "{{ PATH:foo- [] }}\n" },
        ParserTest { name: "path :", input: "{{foo:}}", output: "{{ PATH:foo: [] }}\n" },
    ]);
}

#[test]
fn parses_paths() {
    launch(&[
        ParserTest { name: "data", input: "{{@foo}}", output: "{{ @PATH:foo [] }}\n" },
        ParserTest { name: "data with depth", input: "{{@../foo}}", output: "{{ @PATH:foo [] }}\n" },
        ParserTest { name: "slashes", input: "{{foo/bar}}", output: "{{ PATH:foo/bar [] }}\n" },
        ParserTest { name: "this prefix", input: "{{this/foo}}", output: "{{ PATH:foo [] }}\n" },
        ParserTest { name: "dash", input: "{{foo-bar}}", output: "{{ PATH:foo-bar [] }}\n" },
    ]);
}

#[test]
fn parses_params() {
    launch(&[
        ParserTest {
            name: "one param",
            input: "{{foo bar}}",
            output: "{{ PATH:foo [PATH:bar] }}\n",
        },
        ParserTest {
            name: "string param",
            input: "{{foo bar \"baz\" }}",
            output: "{{ PATH:foo [PATH:bar, \"baz\"] }}\n",
        },
        ParserTest {
            name: "number param",
            input: "{{foo 1}}",
            output: "{{ PATH:foo [NUMBER{1}] }}\n",
        },
        ParserTest {
            name: "boolean params",
            input: "{{foo true false}}",
            output: "{{ PATH:foo [BOOLEAN{true}, BOOLEAN{false}] }}\n",
        },
        ParserTest {
            name: "data param",
            input: "{{foo @bar}}",
            output: "{{ PATH:foo [@PATH:bar] }}\n",
        },
    ]);
}

#[test]
fn parses_hashes() {
    launch(&[
        ParserTest {
            name: "path value",
            input: "{{foo bar=baz}}",
            output: "{{ PATH:foo [] HASH{bar=PATH:baz} }}\n",
        },
        ParserTest {
            name: "several pairs",
            input: "{{foo bar=baz bat=\"bam\"}}",
            output: "{{ PATH:foo [] HASH{bar=PATH:baz, bat=\"bam\"} }}\n",
        },
        ParserTest {
            name: "single quotes",
            input: "{{foo bat='bam'}}",
            output: "{{ PATH:foo [] HASH{bat=\"bam\"} }}\n",
        },
        ParserTest {
            name: "params then hash",
            input: "{{foo omg bar=baz bat=\"bam\" baz=1}}",
            output: "{{ PATH:foo [PATH:omg] HASH{bar=PATH:baz, bat=\"bam\", baz=NUMBER{1}} }}\n",
        },
    ]);
}

#[test]
fn parses_content_and_comments() {
    launch(&[
        ParserTest {
            name: "content then mustache",
            input: "foo bar {{baz}}",
            output: "CONTENT[ 'foo bar ' ]\n{{ PATH:baz [] }}\n",
        },
        ParserTest {
            name: "comment",
            input: "{{! this is a comment }}",
            output: "{{! ' this is a comment ' }}\n",
        },
        ParserTest {
            name: "multi-line comment",
            input: "{{!\nthis is a multi-line comment\n}}",
            output: "{{! '\nthis is a multi-line comment\n' }}\n",
        },
    ]);
}

#[test]
fn parses_partials() {
    launch(&[
        ParserTest { name: "simple", input: "{{> foo }}", output: "{{> PARTIAL:foo }}\n" },
        ParserTest { name: "string name", input: "{{> \"foo\" }}", output: "{{> PARTIAL:foo }}\n" },
        ParserTest { name: "number name", input: "{{> 1 }}", output: "{{> PARTIAL:1 }}\n" },
        ParserTest {
            name: "with context",
            input: "{{> foo bar}}",
            output: "{{> PARTIAL:foo PATH:bar }}\n",
        },
        ParserTest {
            name: "with hash",
            input: "{{> foo bar=bat}}",
            output: "{{> PARTIAL:foo HASH{bar=PATH:bat} }}\n",
        },
        ParserTest {
            name: "with context and hash",
            input: "{{> foo bar bat=baz}}",
            output: "{{> PARTIAL:foo PATH:bar HASH{bat=PATH:baz} }}\n",
        },
        ParserTest {
            name: "complex name",
            input: "{{> shared/partial?.bar}}",
            output: "{{> PARTIAL:shared/partial?.bar }}\n",
        },
    ]);
}

#[test]
fn parses_blocks() {
    launch(&[
        ParserTest {
            name: "inverse section",
            input: "{{#foo}} bar {{^}} baz {{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n    CONTENT[ ' bar ' ]\n  {{^}}\n    CONTENT[ ' baz ' ]\n",
        },
        ParserTest {
            name: "else-style inverse",
            input: "{{#foo}} bar {{else}} baz {{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n    CONTENT[ ' bar ' ]\n  {{^}}\n    CONTENT[ ' baz ' ]\n",
        },
        ParserTest {
            name: "chained inverse",
            input: "{{#foo}} bar {{else if bar}}{{else}} baz {{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n    CONTENT[ ' bar ' ]\n  {{^}}\n    BLOCK:\n      PATH:if [PATH:bar]\n      PROGRAM:\n      {{^}}\n        CONTENT[ ' baz ' ]\n",
        },
        ParserTest {
            name: "empty block",
            input: "{{#foo}}{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n",
        },
        ParserTest {
            name: "empty inverse",
            input: "{{#foo}}{{^}}{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n  {{^}}\n",
        },
        ParserTest {
            name: "standalone inverse block",
            input: "{{^foo}}bar{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  {{^}}\n    CONTENT[ 'bar' ]\n",
        },
        ParserTest {
            name: "block params",
            input: "{{#foo as |bar baz|}}content{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n    BLOCK PARAMS: [ bar baz ]\n    CONTENT[ 'content' ]\n",
        },
        ParserTest {
            name: "inverse block params",
            input: "{{^foo as |bar baz|}}content{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  {{^}}\n    BLOCK PARAMS: [ bar baz ]\n    CONTENT[ 'content' ]\n",
        },
        ParserTest {
            name: "chained block params",
            input: "{{#foo}}{{else foo as |bar baz|}}content{{/foo}}",
            output: "BLOCK:\n  PATH:foo []\n  PROGRAM:\n  {{^}}\n    BLOCK:\n      PATH:foo []\n      PROGRAM:\n        BLOCK PARAMS: [ bar baz ]\n        CONTENT[ 'content' ]\n",
        },
    ]);
}

#[test]
fn rejects_invalid_grammar() {
    for input in [
        "{{foo}",
        "{{foo &}}",
        "{{#goodbyes}}{{/hellos}}",
        "{{else foo}}bar{{/foo}}",
        "foo{{^}}bar",
        "{{#foo}}bar",
        "{{foo/../bar}}",
        "{{foo bar=1 bar=2}}",
        "{{#foo as ||}}x{{/foo}}",
    ] {
        let err = Template::parse(input)
            .err()
            .unwrap_or_else(|| panic!("expected '{}' to fail parsing", input));
        assert!(err.is_parse_error(), "'{}' gave {}", input, err.code);
    }
}

#[test]
fn reports_line_numbers() {
    let err = Template::parse("hello\nmy\n{{foo}").unwrap_err();
    assert_eq!(err.span.line, 3);

    let err = Template::parse("\n\nhello\n\nmy\n\n{{foo}").unwrap_err();
    assert_eq!(err.span.line, 7);
}
