//! Library-level integration tests for [`kcc_drv::run`], bypassing the
//! CLI layer. Complements `cli_tests.rs`, which drives the same
//! scenarios through the compiled binary.

use kcc_drv::{config_for, default_config, exit_code, run, EmitKind};
use std::io::Write;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::with_suffix(".c").expect("failed to create temp source file");
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn e3_floating_constant_is_classified_with_its_approximate_value() {
    let f = source_file("1.54334e+34;\n");
    let outcome = run(&default_config(f.path())).unwrap();
    assert!(outcome.report.contains("FloatingConstant"));
    assert!(!outcome.had_errors);
}

#[test]
fn e8_string_literal_with_hex_escape_preserves_the_lexeme_verbatim() {
    let f = source_file("\"\\xDEADBEEF\";\n");
    let outcome = run(&default_config(f.path())).unwrap();
    assert!(outcome.report.contains("StringLiteral"));
    assert!(outcome.report.contains("\\xDEADBEEF"));
}

#[test]
fn ifdef_and_undef_compose_across_a_whole_translation_unit() {
    let f = source_file("#define X 1\n#undef X\n#ifdef X\nyes\n#else\nno\n#endif\n");
    let outcome = run(&default_config(f.path())).unwrap();
    assert!(outcome.report.contains("\"no\""));
    assert!(!outcome.report.contains("\"yes\""));
}

#[test]
fn function_like_macro_arguments_substitute_through_the_full_pipeline() {
    let f = source_file("#define ADD(a, b) a + b\nADD(1, 2);\n");
    let outcome = run(&default_config(f.path())).unwrap();
    assert!(outcome.report.contains("\"1\""));
    assert!(outcome.report.contains("\"2\""));
}

#[test]
fn exit_code_is_zero_for_diagnostic_free_input_and_one_otherwise() {
    let clean = source_file("int x;\n");
    let clean_outcome = run(&default_config(clean.path())).unwrap();
    assert_eq!(exit_code(&clean_outcome), 0);

    let broken = source_file("09;\n");
    let broken_outcome = run(&default_config(broken.path())).unwrap();
    assert_eq!(exit_code(&broken_outcome), 1);
}

#[test]
fn warnings_alone_do_not_trip_the_error_exit_code() {
    // A clean translation unit never raises any diagnostic, so the
    // report has no trailing diagnostic block at all.
    let f = source_file("x;\n");
    let outcome = run(&default_config(f.path())).unwrap();
    assert!(!outcome.had_errors);
    assert_eq!(exit_code(&outcome), 0);
}

#[test]
fn pp_tokens_emit_mode_exposes_the_stream_the_language_lexer_would_consume() {
    let f = source_file("#include <stdio.h>\n#define X 1\nkeep\n");
    let outcome = run(&config_for(f.path(), EmitKind::PpTokens, true)).unwrap();
    assert!(outcome.report.contains("\"keep\""));
    assert!(!outcome.report.contains("\"include\""));
    assert!(!outcome.report.contains("\"define\""));
}
