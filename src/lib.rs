//! Wisp is a programming language written in Rust. It is a dynamically typed language with
//! lexical scoping and first-class functions. Wisp is a tree-walk interpreter with a hand-written
//! recursive descent parser. Wisp is a hobby project and is not intended for production use.
//!
//! Wisp is a dynamically typed language. This means that the type of a variable is determined at
//! runtime. This is in contrast to statically typed languages, where the type of a variable is
//! determined at compile time. Dynamically typed languages are often easier to use, but are
//! generally slower than statically typed languages.
//!
//! Wisp is a tree-walk interpreter. This means that the interpreter walks the abstract syntax tree
//! (AST) and evaluates each node. This is in contrast to a compiler, which would convert the AST
//! into bytecode or machine code. Tree-walk interpreters are generally easier to implement than
//! compilers, but are generally slower than compilers.
//!
//! Wisp is a hobby project and is not intended for production use. The goal of this project is to
//! learn more about programming languages and interpreters. This project is inspired by the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by Bob Nystrom.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a string of
//! characters into a list of tokens. A token is a single unit of a programming language. For
//! example, the string `1 + 2` would be converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`](scanner) module as an iterator over the characters
//! in the source code. It is a simple state machine that returns the next token in the source code
//! when called.
//!
//! The scanner reports syntax errors in the source code as a [`ScanError`](error::ScanError).
//! These errors are trivial problems like an unterminated string literal or an unexpected character.
//! Scan errors are reported as soon as they are encountered. This means that the scanner will
//! continue scanning the source code even if it has already encountered a syntax error. This is
//! useful because it allows the user to fix multiple syntax errors at once.
//!
//! ## Parsing
//! The second step in the interpreter is parsing. Parsing is the process of converting a list of
//! tokens into an abstract syntax tree (AST). The parser is implemented in the [`parser`](parser)
//! module as a recursive descent parser. The parser transforms the list of tokens into expressions
//! and statements. [`Expressions`](expr::Expr) are pieces of code that produce a value, specifically
//! an [`Object`](object::Object). Objects are an umbrella term for all types of values in Wisp
//! including literals, functions, classes and instances. [`Statements`](stmt::Stmt) are pieces of
//! code that do not produce a value but instead perform some action. These actions modify the state
//! of the program and thus, are called side-effects. For example, a variable decleration or an if
//! clause would be classified as statements.
//!
//! Every expression node is also assigned a stable [`NodeId`](expr::NodeId) as it is parsed, which
//! the resolver and interpreter use to key per-reference state instead of the token itself.
//!
//! For example, the string `print 1 + 2;` would be converted into the following AST:
//! ```text
//! PrintStatement {
//!     BinaryExpression {
//!         left: Number(1),
//!         operator: Plus,
//!         right: Number(2),
//!     }
//! }
//! ```
//! The parser reports syntax errors in the source code as a [`ParseError`](error::ParseError).
//! Unlike the scanner, the parser catches errors that span multiple tokens. For example, the
//! following expression is invalid because it is missing the right-hand operand:
//! ```text
//! 1 !=
//! ```
//! However, much like the scanner, the parser will continue parsing the source code even if it
//! has already encountered a syntax error using a technique called synchronization. This is useful
//! because it allows the user to fix multiple syntax errors at once.
//!
//! ## Resolving
//! The third step in the interpreter is resolving. Resolving is the process of statically analyzing
//! the AST to determine the scope of each variable. While this requires a pre-pass of the AST, it
//! is necessary to construct robust lexical scoping. The resolver is implemented in the
//! [`resolver`](resolver) module as a tree-walk interpreter. The resolver is run after the parser
//! because it requires the AST to be fully constructed. The resolver reports errors as a
//! [`ResolveError`](error::ResolveError). These errors are syntactically valid but semantically
//! invalid, and therefore, cannot be caught by the scanner or the parser. For example, the following
//! expression is valid Wisp syntax but it is semantically invalid because the variable `a` is
//! defined twice in the same scope:
//! ```text
//! {
//!    var a = 1;
//!    var a = 2;
//! }
//! ```
//!
//! ## Interpreting
//! The final step in the interpreter is _interpreting_. Interpreting is the process of evaluating the
//! AST. The interpreter is implemented in the [`interpreter`](interpreter) module as a tree-walk
//! interpreter. Thanks to all the previous steps, the interpreter is able to evaluate the AST and
//! produce a result. The interpreter reports errors as a [`RuntimeError`](error::RuntimeError). While
//! the scanner, the parser and the resolver try to catch as many errors as possible before running
//! the code, most errors can only be caught at runtime. For example, the following expression is
//! valid Wisp syntax but it is semantically invalid because it tries to add a string and a number:
//! ```text
//! var a = "123";
//! var b = a + 123;
//! ```
//! The interpreter is also responsible for managing the environment. The environment is a mapping of
//! variable names to their values. The environment is implemented in the [`environment`](environment)
//! module as a chain of scopes, each an owner of the scope enclosing it. This allows the interpreter
//! to implement lexical scoping, including closures that outlive the block that created them.
//!
//! Classes and their instances are implemented in the [`class`](class) module, and user-defined
//! functions (including bound methods) in the [`function`](function) module. Both, along with the
//! handful of native functions in [`function::NativeFunction`], implement the
//! [`Callable`](object::Callable) trait the interpreter dispatches calls through.
//!
//! Every stage above shares one [`ErrorReporter`](error::ErrorReporter) rather than throwing; this
//! lets the [`Wisp`] driver decide after each stage whether to continue, and pick the process exit
//! code the shell sees.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::ErrorReporter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// A clone-cheap in-memory sink implementing [`Write`], used to capture an
/// interpreter's `print` output for inspection instead of writing it to stdout.
///
/// Every clone shares the same underlying buffer, so a test can hand one
/// clone to an [`Interpreter`] and read the contents back through another.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything written so far, decoded as UTF-8.
    ///
    /// Panics if the interpreter ever writes non-UTF-8 bytes, which it never
    /// does; all output here comes from `Display`-formatted values.
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("interpreter output is always UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Process exit codes.
pub mod exit_code {
    /// Bad command-line usage: anything other than `wisp` or `wisp <script>`.
    pub const USAGE: i32 = 64;
    /// A scan, parse, or resolve error was reported.
    pub const DATA_ERROR: i32 = 65;
    /// An uncaught runtime error occurred while executing the script.
    pub const RUNTIME_ERROR: i32 = 70;
    /// The input script could not be read from disk.
    pub const NO_INPUT: i32 = 2;
}

/// Drives the scan/parse/resolve/interpret pipeline for one program run.
///
/// Owns the [`Interpreter`] so a REPL session keeps its variables across
/// lines, and an [`ErrorReporter`] that is reset between REPL lines but not
/// between statements within a single `run_file` call.
pub struct Wisp {
    interpreter: Interpreter,
    reporter: ErrorReporter,
}

impl Wisp {
    /// Builds a driver whose `print` statements write to `output`.
    pub fn new(output: Box<dyn Write>) -> Self {
        Wisp {
            interpreter: Interpreter::new(output),
            reporter: ErrorReporter::new(),
        }
    }

    /// Reads and runs the script at `path`, returning the process exit code
    /// the caller should exit with.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let source = match fs::read_to_string(Path::new(path)) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Failed to read '{}': {}", path, err);
                return exit_code::NO_INPUT;
            }
        };

        self.run(&source);

        if self.reporter.had_error() {
            exit_code::DATA_ERROR
        } else if self.reporter.had_runtime_error() {
            exit_code::RUNTIME_ERROR
        } else {
            0
        }
    }

    /// Runs an interactive read-eval-print loop on stdin/stdout, keeping a
    /// history file under the user's home directory across sessions.
    pub fn run_prompt(&mut self) -> i32 {
        let mut editor = DefaultEditor::new().expect("failed to initialize line editor");

        let history_path = home::home_dir().map(|mut home| {
            home.push(".wisp_history");
            home
        });

        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    self.reporter.reset();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Readline error: {}", err);
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        0
    }

    /// Runs one chunk of source through every pipeline stage, stopping early
    /// if an earlier stage reported a compile error.
    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source, &self.reporter).scan_tokens();
        let statements = Parser::new(tokens, &self.reporter).parse();

        if self.reporter.had_error() {
            return;
        }

        Resolver::new(&mut self.interpreter, &self.reporter).resolve(&statements);

        if self.reporter.had_error() {
            return;
        }

        self.interpreter.interpret(&statements, &self.reporter);
    }
}

/// Parses CLI arguments and exits the process with the appropriate code.
/// Lives here rather than in `main.rs` so it can be reused without spawning
/// a subprocess.
pub fn run_cli(args: &[String]) -> ! {
    let mut wisp = Wisp::new(Box::new(io::stdout()));

    let code = match args {
        [] => wisp.run_prompt(),
        [script] => wisp.run_file(script),
        _ => {
            eprintln!("Usage: wisp [script]");
            exit_code::USAGE
        }
    };

    process::exit(code);
}
