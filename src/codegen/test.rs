use super::*;
use crate::driver::compile;
use crate::error::Stage;

use pretty_assertions::assert_eq;

fn js(input: &str) -> String {
    compile(input).unwrap().code
}

fn generate_error(input: &str) -> CompileError {
    compile(input).expect_err("expected compilation to fail")
}

#[test]
fn test_binding_keywords() {
    assert_eq!(
        js("assign a = 1; all assign b = 2; fix assign c = 3;"),
        "let a = 1;\nvar b = 2;\nconst c = 3;"
    );
}

#[test]
fn test_typed_declarations_register() {
    let generated = compile("assign n as int = 5; assign total as double;").unwrap();
    assert_eq!(
        generated.code,
        "let n = __epx_register(\"n\", \"int\", 5);\nlet total = __epx_register(\"total\", \"double\");"
    );
    assert!(generated.features.type_shim);
    assert!(!generated.features.input);
}

#[test]
fn test_call_result_needs_declared_type() {
    let error = generate_error("assign r = call add[2, 3];");
    assert_eq!(error.stage, Stage::Generate);
    assert_eq!(
        error.message,
        "`r` is assigned the result of `add` and needs a declared type"
    );

    assert_eq!(
        js("assign r as int = call add[2, 3];"),
        "let r = __epx_register(\"r\", \"int\", add(2, 3));"
    );
}

#[test]
fn test_array_literal_needs_array_type() {
    let error = generate_error("assign xs = {1, 2};");
    assert_eq!(
        error.message,
        "`xs` is assigned an array literal and must be declared `as array`"
    );
    let error = generate_error("assign xs as int = {1, 2};");
    assert_eq!(error.stage, Stage::Generate);

    assert_eq!(
        js("assign xs as array = {1, 2};"),
        "let xs = __epx_register(\"xs\", \"array\", [1, 2]);"
    );
}

#[test]
fn test_untyped_values_are_not_checked() {
    let generated = compile("assign name = \"epoxy\";").unwrap();
    assert_eq!(generated.code, "let name = \"epoxy\";");
    assert_eq!(generated.features, Features::default());
}

#[test]
fn test_untyped_redeclaration_forgets_registered_type() {
    let generated =
        compile("make f[] { assign x as int = 1; give x; } call f[]; assign x = \"a\"; assign y = 2;")
            .unwrap();
    assert_eq!(
        generated.code,
        "function f() {\nlet x = __epx_register(\"x\", \"int\", 1);\nreturn x;\n}\n\
         f();\n\
         let x = __epx_forget(\"x\", \"a\");\n\
         let y = 2;"
    );
    assert!(generated.features.type_shim);

    // later typed declarations count too
    assert_eq!(
        js("assign n = 0; repeat [i in 1 to 2] { assign n as int = i; }"),
        "let n = __epx_forget(\"n\", 0);\n\
         for (let i = (1 <= 2) ? 1 : 1; (1 <= 2) ? i <= 2 : i >= 2; \
         i += (1 <= 2) ? Math.abs(1) : -Math.abs(1)) {\n\
         let n = __epx_register(\"n\", \"int\", i);\n}"
    );
}

#[test]
fn test_mutations() {
    let generated = compile("update x = x + 1; update grid{i}{0} = 2;").unwrap();
    assert_eq!(
        generated.code,
        "x = __epx_validate(\"x\", (x + 1));\ngrid[i][0] = 2;"
    );
    assert!(generated.features.type_shim);

    let indexed_only = compile("update xs{0} = 1;").unwrap();
    assert!(!indexed_only.features.type_shim);
}

#[test]
fn test_store_interpolation() {
    assert_eq!(
        js("store name = \"World\"; store x = `Hello, [name]!`;"),
        "let name = \"World\";\nlet x = `Hello, ${name}!`;"
    );
}

#[test]
fn test_store_without_backticks_is_literal() {
    assert_eq!(js("store x = 'a [b] c';"), "let x = \"a [b] c\";");
}

#[test]
fn test_each_region_compiled_independently() {
    let code = js("store s = `[a] and [b + 1] or [call f[x]]`;");
    assert_eq!(code, "let s = `${a} and ${(b + 1)} or ${f(x)}`;");
    assert_eq!(code.matches("${").count(), 3);
}

#[test]
fn test_nested_brackets_in_region() {
    assert_eq!(
        js("store s = `item: [xs{[i + 1]}]`;"),
        "let s = `item: ${xs[(i + 1)]}`;"
    );
    assert_eq!(
        js("store s = `[call pick[[a], b]]`;"),
        "let s = `${pick(a, b)}`;"
    );
}

#[test]
fn test_template_text_is_escaped() {
    assert_eq!(js("store s = `cost ${x}`;"), "let s = `cost \\${x}`;");
    assert_eq!(js("store t = `trail\\`;"), "let t = `trail\\\\`;");
    assert_eq!(
        js("store p = `C:\\dir\\[name]`;"),
        "let p = `C:\\\\dir\\\\${name}`;"
    );
}

#[test]
fn test_unbalanced_region() {
    let error = generate_error("store s = `Hello [name`;");
    assert_eq!(error.stage, Stage::Generate);
    assert_eq!(error.message, "unmatched '[' in interpolated string");
    assert_eq!(error.span, 17..18);
}

#[test]
fn test_bare_call_in_template() {
    let error = generate_error("store s = `value: call f[x]`;");
    assert_eq!(
        error.message,
        "function calls in a template string must be inside [ ] interpolation"
    );
    assert_eq!(error.span, 18..22);

    // `recall` is not the keyword
    assert_eq!(js("store s = `recall`;"), "let s = `recall`;");
}

#[test]
fn test_region_errors_point_into_source() {
    let error = generate_error("store s = `[1 +]`;");
    assert_eq!(error.stage, Stage::Syntax);
    assert_eq!(error.message, "expected an expression but found end of file");
    assert_eq!(error.span, 15..15);
}

#[test]
fn test_printed_strings() {
    assert_eq!(
        js("show \"total: [a + b]\";"),
        "console.log(`total: ${(a + b)}`);"
    );
    assert_eq!(js("show \"plain\";"), "console.log(\"plain\");");
    assert_eq!(js("error x;"), "console.error(x);");
    assert_eq!(js("panic \"boom\";"), "throw new Error(String(\"boom\"));");
}

#[test]
fn test_check_chain() {
    assert_eq!(
        js("check [x > 1] { show 1; } or check [x < 0] { show 2; } alt { show 3; }"),
        "if ((x > 1)) {\nconsole.log(1);\n} else if ((x < 0)) {\nconsole.log(2);\n} else {\nconsole.log(3);\n}"
    );
}

#[test]
fn test_logical_operators_map_to_host() {
    assert_eq!(js("show a or b and c;"), "console.log((a || (b && c)));");
    assert_eq!(js("show a === b;"), "console.log((a === b));");
}

#[test]
fn test_range_loop_direction_test_in_every_clause() {
    let code = js("repeat [i in 1 to 3] { show i; }");
    assert_eq!(
        code,
        "for (let i = (1 <= 3) ? 1 : 1; (1 <= 3) ? i <= 3 : i >= 3; \
         i += (1 <= 3) ? Math.abs(1) : -Math.abs(1)) {\nconsole.log(i);\n}"
    );
    assert_eq!(code.matches("(1 <= 3)").count(), 3);

    let code = js("repeat [i in hi to lo, 2] { skip; }");
    assert_eq!(code.matches("(hi <= lo)").count(), 3);
    assert!(code.contains("-Math.abs(2)"));
}

#[test]
fn test_other_loops() {
    assert_eq!(
        js("repeat [x in items] { halt; }"),
        "for (const x of items) {\nbreak;\n}"
    );
    assert_eq!(
        js("repeat until [done] { skip; }"),
        "do {\ncontinue;\n} while (!(done));"
    );
    assert_eq!(
        js("for [assign i = 0; i < 3; update i = i + 1] { show i; }"),
        "for (let i = 0; (i < 3); i = __epx_validate(\"i\", (i + 1))) {\nconsole.log(i);\n}"
    );
}

#[test]
fn test_functions() {
    assert_eq!(
        js("make hello[] { show 1; }"),
        "function hello() {\nconsole.log(1);\n}"
    );

    let generated = compile("make add[a, b] as int { give a + b; }").unwrap();
    assert_eq!(
        generated.code,
        "function add(a, b) {\nreturn __epx_returns(\"add\", \"int\", (() => {\nreturn (a + b);\n})());\n}"
    );
    assert!(generated.features.type_shim);
}

#[test]
fn test_filter_and_map_need_one_lambda() {
    assert_eq!(
        js("assign ys as array = method:array xs.filter[[x] -> x > 1];"),
        "let ys = __epx_register(\"ys\", \"array\", xs.filter(((x) => (x > 1))));"
    );
    assert_eq!(
        js("method:array xs.map[x -> x * 2];"),
        "xs.map(((x) => (x * 2)));"
    );

    let error = generate_error("method:array xs.filter[];");
    assert_eq!(
        error.message,
        "method `filter` on `array` takes 1 argument but 0 were given"
    );
    let error = generate_error("method:array xs.map[[x] -> x, [y] -> y];");
    assert_eq!(
        error.message,
        "method `map` on `array` takes 1 argument but 2 were given"
    );
    let error = generate_error("method:array xs.map[f];");
    assert_eq!(error.message, "method `map` on `array` expects a lambda argument");
}

#[test]
fn test_slice_notation() {
    assert_eq!(js("method:array xs.slice[\"2:5\"];"), "xs.slice(2, 5);");
    assert_eq!(
        js("method:array xs.slice[\"::2\"];"),
        "[...xs].filter((_, i) => i % 2 === 0);"
    );
    assert_eq!(
        js("method:array xs.slice[\"::-1\"];"),
        "[...xs].reverse();"
    );
    assert_eq!(
        js("method:string s.slice[\"::-1\"];"),
        "[...s].reverse().join(\"\");"
    );
    assert_eq!(js("method:string s.slice[\"2:\"];"), "s.slice(2);");

    let error = generate_error("method:array xs.slice[\"a:b\"];");
    assert_eq!(error.message, "malformed slice notation for `slice` on `array`");
    let error = generate_error("method:array xs.slice[n];");
    assert_eq!(error.stage, Stage::Generate);
}

#[test]
fn test_string_methods() {
    assert_eq!(js("method:string s.upper[];"), "s.toUpperCase();");
    assert_eq!(
        js("method:string s.replace_all[\"a\", \"b\"];"),
        "s.replaceAll(\"a\", \"b\");"
    );
}

#[test]
fn test_unknown_method() {
    let error = generate_error("method:array xs.explode[];");
    assert_eq!(error.message, "unknown method `explode` for target type `array`");
    assert!(error.note.unwrap().contains("append"));
    assert_eq!(error.span, 16..23);

    let error = generate_error("method:int n.upper[];");
    assert_eq!(error.message, "unknown method `upper` for target type `int`");
}

#[test]
fn test_input_feature() {
    let generated = compile("assign line = :input;").unwrap();
    assert_eq!(generated.code, "let line = __epx_input();");
    assert!(generated.features.input);
    assert!(!generated.features.type_shim);

    let generated = compile("show \"got [:input]\";").unwrap();
    assert!(generated.features.input);
}

#[test]
fn test_raw_passthrough() {
    let code = js("show 1;\n@js :~ let q = [1, 2]; ~:;\nshow q;");
    assert!(code.starts_with("console.log(1);\n"));
    assert!(code.contains("let q = [1, 2];"));
    assert!(code.ends_with("\nconsole.log(q);"));
}

#[test]
fn test_literal_rendering() {
    assert_eq!(js("show 2.5;"), "console.log(2.5);");
    assert_eq!(js("show -x;"), "console.log((-x));");
    assert_eq!(js("show null;"), "console.log(null);");
    assert_eq!(js("show 'it\"s';"), "console.log(\"it\\\"s\");");
}
