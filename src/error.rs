use std::cell::Cell;

use crate::token::{Token, Type};

/// Every error type must implement this trait.
///
/// `throw` prints the message in the format the driver's exit code depends
/// on and marks the shared reporter so the driver knows to exit non-zero
/// once the whole pipeline stage has run.
pub trait Error {
    fn throw(&self, reporter: &ErrorReporter);
}

/// Tracks whether a compile-time or runtime error occurred during a single
/// `run` call, so `run_file`/`run_prompt` can choose the right exit code.
///
/// Replaces a `static mut` pair with a plain struct threaded by reference;
/// nothing here needs to survive past one interpreter instance, and nothing
/// needs `unsafe`.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    had_error: Cell<bool>,
    had_runtime_error: Cell<bool>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        self.had_error.get()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error.get()
    }

    /// Clears both flags; used between REPL lines.
    pub fn reset(&self) {
        self.had_error.set(false);
        self.had_runtime_error.set(false);
    }

    pub(crate) fn mark_error(&self) {
        self.had_error.set(true);
    }

    pub(crate) fn mark_runtime_error(&self) {
        self.had_runtime_error.set(true);
    }
}

/// Represents an error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self, reporter: &ErrorReporter) {
        eprintln!("[line {}] Error: {}", self.line, self.message);
        reporter.mark_error();
    }
}

/// Represents an error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self, reporter: &ErrorReporter) {
        report_at_token(&self.token, &self.message);
        reporter.mark_error();
    }
}

/// Represents an error that occurs during resolution.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self, reporter: &ErrorReporter) {
        report_at_token(&self.token, &self.message);
        reporter.mark_error();
    }
}

/// Parse and resolve errors share the same `[line L] Error<where>: <message>`
/// shape; `<where>` is " at end", " at '<lexeme>'", or empty.
fn report_at_token(token: &Token, message: &str) {
    if token.r#type == Type::EOF {
        eprintln!("[line {}] Error at end: {}", token.line, message);
    } else {
        eprintln!("[line {}] Error at '{}': {}", token.line, token.lexeme, message);
    }
}

/// Represents an error that occurs during runtime.
///
/// Runtime errors print as `<message>\n[line L]`, with no "Error" prefix and
/// no token lexeme, matching the driver's runtime-error output exactly.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Error for RuntimeError {
    fn throw(&self, reporter: &ErrorReporter) {
        eprintln!("{}\n[line {}]", self.message, self.token.line);
        reporter.mark_runtime_error();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::literal::Literal;

    #[test]
    fn reporter_starts_clean() {
        let reporter = ErrorReporter::new();
        assert!(!reporter.had_error());
        assert!(!reporter.had_runtime_error());
    }

    #[test]
    fn reset_clears_both_flags() {
        let reporter = ErrorReporter::new();
        reporter.mark_error();
        reporter.mark_runtime_error();
        reporter.reset();
        assert!(!reporter.had_error());
        assert!(!reporter.had_runtime_error());
    }

    #[test]
    fn scan_error_marks_compile_error_only() {
        let reporter = ErrorReporter::new();
        (ScanError { line: 1, message: "Unexpected character.".into() }).throw(&reporter);
        assert!(reporter.had_error());
        assert!(!reporter.had_runtime_error());
    }

    #[test]
    fn runtime_error_marks_runtime_error_only() {
        let reporter = ErrorReporter::new();
        let token = Token::new(Type::Identifier, "a".into(), Some(Literal::Nil), 3);
        (RuntimeError { token, message: "Undefined variable 'a'.".into() }).throw(&reporter);
        assert!(!reporter.had_error());
        assert!(reporter.had_runtime_error());
    }
}
