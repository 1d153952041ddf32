use epoxy::config::Config;
use epoxy::error::EpoxyError;
use epoxy::runtime::host::Host;
use epoxy::translate;

use pretty_assertions::assert_eq;

use std::process::Output;

fn host() -> Option<Host> {
    let host = Host::new(Config::from_env().host);
    if host.available() {
        Some(host)
    } else {
        eprintln!("skipping: `{}` is not installed", host.command());
        None
    }
}

fn execute(host: &Host, source: &str, stdin: &str) -> Output {
    let script = translate(source).unwrap();
    host.run_captured(&script, stdin).unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_hello_world() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "store name = \"World\";\nstore x = `Hello, [name]!`;\nshow x;",
        "",
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hello, World!\n");
}

#[test]
fn test_typed_function_result() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "make add[a, b] as int { give a + b; }\n\
         assign r as int = call add[2, 3];\n\
         show r == 5;",
        "",
    );
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["true"]);
}

#[test]
fn test_declared_type_mismatch_raises() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "make add[a, b] as int { give a + b; }\n\
         assign r as string = call add[2, 3];\n\
         show \"unreachable\";",
        "",
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("EpoxyTypeError"));
}

#[test]
fn test_mutation_is_validated() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "assign count as int = 1;\nupdate count = \"many\";",
        "",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("EpoxyTypeError"));
}

#[test]
fn test_unannotated_variable_is_never_checked() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "make f[] { assign x as int = 1; give x; } call f[]; assign x = \"a\"; update x = \"b\"; show x;",
        "",
    );
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["b"]);
}

#[test]
fn test_backslashes_in_templates() {
    let Some(host) = host() else { return };
    let output = execute(&host, "store t = `trail\\`;\nshow t;", "");
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["trail\\"]);
}

#[test]
fn test_range_loop_directions() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "assign lo = 1;\nassign hi = 3;\n\
         repeat [i in lo to hi] { show i; }\n\
         repeat [i in hi to lo] { show i; }\n\
         repeat [i in 10 to 0, 5] { show i; }",
        "",
    );
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["1", "2", "3", "3", "2", "1", "10", "5", "0"]
    );
}

#[test]
fn test_methods_and_loops() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "assign xs as array = {1, 2, 3, 4};\n\
         assign big as array = method:array xs.filter[[x] -> x > 2];\n\
         show method:array big.join[\"-\"];\n\
         show method:array xs.slice[\"::-1\"];\n\
         assign total as int = 0;\n\
         repeat [x in xs] { check [x == 3] { skip; } update total = total + x; }\n\
         show \"total: [total]\";",
        "",
    );
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["3-4", "[ 4, 3, 2, 1 ]", "total: 7"]);
}

#[test]
fn test_input_adapter() {
    let Some(host) = host() else { return };
    let output = execute(
        &host,
        "assign n = :input;\nassign word = :input;\nshow n + 1;\nshow word;",
        "41\nhello\n",
    );
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["42", "hello"]);
}

#[test]
fn test_failed_program_reports_status() {
    let Some(host) = host() else { return };
    let config = Config {
        host: host.command().to_string(),
        emit: false,
    };
    let result = epoxy::run("panic \"boom\";", &config);
    assert!(matches!(result, Err(EpoxyError::Failed(status)) if !status.success()));
}

#[test]
fn test_compile_error_stops_before_execution() {
    let result = epoxy::run("assign xs = {1};", &Config::default());
    assert!(matches!(result, Err(EpoxyError::Compile(_))));
}
