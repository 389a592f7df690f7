//! kcc-drv - the driver: wires the preprocessor (`kcc-pp`) and the
//! language lexer (`kcc-lex`) together into one callable pipeline and
//! renders their combined output, matching the external contract in
//! spec.md §6 ("Input: a contiguous byte buffer ...; Output: a sequence
//! of language tokens terminated by `END_OF_FILE`, and the diagnostic
//! bookkeeper populated in emission order").
//!
//! This is deliberately thin. Every actual rule the core enforces lives
//! in `kcc-pp`/`kcc-lex`/`kcc-util`; this crate only reads a file,
//! threads one `LexemaPool` and one `Handler` through the two stages, and
//! formats the result for a terminal.

use kcc_lex::Token;
use kcc_util::{Handler, LexemaPool, PreprocessingToken};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

/// What the driver prints: either the classified language-token stream
/// (the default) or the preprocessor's flattened pp-token stream before
/// language classification, for inspecting macro expansion in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitKind {
    Tokens,
    PpTokens,
}

impl Default for EmitKind {
    fn default() -> Self {
        EmitKind::Tokens
    }
}

/// One invocation's configuration. Kept as a plain struct, independent of
/// `clap`, so `run` is testable without going through argument parsing.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub emit: EmitKind,
    pub color: bool,
}

/// Driver-level failures: problems with the driver's own operation (the
/// file can't be read), never problems with the C source it was asked to
/// process — those are [`kcc_util::Diagnostic`]s, not `Result` errors
/// (see SPEC_FULL.md §3.1).
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The result of running the pipeline over one translation unit: the
/// rendered report (token listing, or pp-token listing, plus diagnostics)
/// and whether any diagnostic of kind `Error` was raised.
pub struct RunOutcome {
    pub report: String,
    pub had_errors: bool,
}

/// Runs the full pipeline (§4.9 "Driver"): read the file, preprocess,
/// lex (unless `config.emit == PpTokens`), and render. This is the one
/// function both the CLI binary and the integration tests call.
pub fn run(config: &Config) -> Result<RunOutcome, DriverError> {
    let source = std::fs::read_to_string(&config.input).map_err(|source| DriverError::Io {
        path: config.input.clone(),
        source,
    })?;
    let file_name: Rc<str> = Rc::from(config.input.to_string_lossy().as_ref());

    let mut pool = LexemaPool::new();
    let handler = Handler::new();

    let pp_span = tracing::debug_span!("preprocess", file = %file_name);
    let pp_out = pp_span.in_scope(|| kcc_pp::preprocess(&source, Rc::clone(&file_name), &mut pool, &handler));

    let mut report = String::new();
    match config.emit {
        EmitKind::PpTokens => {
            for tok in &pp_out.tokens {
                report.push_str(&render_pp_token(tok, &pool));
                report.push('\n');
            }
        }
        EmitKind::Tokens => {
            let lex_span = tracing::debug_span!("lex");
            let tokens = lex_span.in_scope(|| kcc_lex::lex(&pp_out.tokens, &mut pool, &handler));
            for tok in &tokens {
                report.push_str(&render_token(tok, &pool));
                report.push('\n');
            }
        }
    }

    let had_errors = handler.has_errors();
    if had_errors || handler.warning_count() > 0 {
        if !report.is_empty() {
            report.push('\n');
        }
        let rendered = handler.render_all();
        report.push_str(&if config.color { rendered } else { strip_ansi(&rendered) });
        report.push('\n');
    }

    Ok(RunOutcome { report, had_errors })
}

/// Renders one classified language token as `NAME(form) "lexeme"[=value]
/// @file:line:col`.
fn render_token(tok: &Token, pool: &LexemaPool) -> String {
    let lexeme = pool.resolve(tok.lexeme);
    let value = match tok.value {
        Some(kcc_lex::Value::Int(v)) => format!("={v}"),
        Some(kcc_lex::Value::Float(v)) => format!("={v}"),
        None => String::new(),
    };
    format!(
        "{:?}({:?}) \"{}\"{} @{}",
        tok.name, tok.form, lexeme, value, tok.location
    )
}

/// Renders one pp-token as `PPNAME "lexeme" @file:line:col`.
fn render_pp_token(tok: &PreprocessingToken, pool: &LexemaPool) -> String {
    if tok.is_eof() {
        return format!("{:?} @{}", tok.ppname, tok.location);
    }
    let lexeme = pool.resolve(tok.lexeme);
    format!("{:?} \"{}\" @{}", tok.ppname, lexeme, tok.location)
}

/// Strips the three ANSI colour escapes `kcc_util::diagnostic` emits
/// (red/green/yellow) plus the reset, for `--no-color`/`NO_COLOR`. Not a
/// general ANSI stripper: the diagnostic renderer only ever emits these
/// four fixed sequences (§6), so a literal replace is exact and avoids
/// pulling in a regex dependency for four known strings.
fn strip_ansi(s: &str) -> String {
    s.replace("\x1B[31m", "")
        .replace("\x1B[32m", "")
        .replace("\x1B[33m", "")
        .replace("\x1B[0m", "")
}

/// Whether colour should be used: explicit `--no-color` wins, then the
/// conventional `NO_COLOR` environment variable, defaulting to on.
pub fn color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    std::env::var_os("NO_COLOR").is_none()
}

/// The driver's own exit-code convention (SPEC_FULL.md §7): 0 on a clean
/// compile, 1 if the source produced at least one diagnostic error, 2 if
/// the driver itself could not run.
pub fn exit_code(outcome: &RunOutcome) -> i32 {
    if outcome.had_errors {
        1
    } else {
        0
    }
}

pub const DRIVER_IO_EXIT_CODE: i32 = 2;

/// Convenience for callers that just want a `Path`, not a full `Config`
/// (used by tests below and by `main`'s argument wiring).
pub fn config_for(input: impl Into<PathBuf>, emit: EmitKind, color: bool) -> Config {
    Config {
        input: input.into(),
        emit,
        color,
    }
}

pub fn default_config(input: impl AsRef<Path>) -> Config {
    config_for(input.as_ref().to_path_buf(), EmitKind::default(), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn e1_hex_integer_constant_end_to_end() {
        let f = write_temp("int x = 0xDEADBEEF;\n");
        let config = default_config(f.path());
        let outcome = run(&config).unwrap();
        assert!(outcome.report.contains("Keyword"));
        assert!(outcome.report.contains("3735928559"));
        assert!(!outcome.had_errors);
        assert_eq!(exit_code(&outcome), 0);
    }

    #[test]
    fn e6_conditional_exclusion_survives_to_token_stream() {
        let f = write_temp("#if 0\nA\n#else\nB\n#endif\n");
        let config = default_config(f.path());
        let outcome = run(&config).unwrap();
        assert!(outcome.report.contains("\"B\""));
        assert!(!outcome.report.contains("\"A\""));
    }

    #[test]
    fn e4_invalid_octal_constant_is_reported_as_an_error() {
        let f = write_temp("09;\n");
        let config = default_config(f.path());
        let outcome = run(&config).unwrap();
        assert!(outcome.had_errors);
        assert_eq!(exit_code(&outcome), 1);
    }

    #[test]
    fn missing_file_is_a_driver_error_not_a_diagnostic() {
        let config = default_config("/nonexistent/path/does-not-exist.c");
        let err = run(&config).unwrap_err();
        assert!(matches!(err, DriverError::Io { .. }));
    }

    #[test]
    fn emit_pp_tokens_reports_the_flattened_stream_before_classification() {
        let f = write_temp("#define N 42\nN+N\n");
        let config = config_for(f.path(), EmitKind::PpTokens, true);
        let outcome = run(&config).unwrap();
        assert!(outcome.report.contains("\"42\""));
        assert!(outcome.report.contains("EndOfFile"));
    }

    #[test]
    fn no_color_strips_ansi_escapes_from_diagnostics() {
        let f = write_temp("09;\n");
        let config = config_for(f.path(), EmitKind::Tokens, false);
        let outcome = run(&config).unwrap();
        assert!(!outcome.report.contains("\x1B["));
    }

    #[test]
    fn color_enabled_honours_no_color_flag_over_environment() {
        assert!(!color_enabled(true));
    }
}
