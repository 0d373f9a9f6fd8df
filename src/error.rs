/// Error types for the thicket interpreter.
///
/// Every stage of the pipeline (lexer, parser, evaluator, `@load` I/O) reports
/// through this single enum so the CLI driver has exactly one place to turn
/// a failure into a diagnostic and a process exit code.
use std::fmt;

/// A source position for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("{pos}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, pos: Pos },

    #[error("{pos}: unterminated string literal")]
    UnterminatedString { pos: Pos },

    #[error("{pos}: {message} (found {found:?})")]
    ParseError {
        message: String,
        found: String,
        pos: Pos,
    },

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("undefined function: {0}")]
    UndefinedFunction(String),

    #[error("value is not callable: {0}")]
    NotCallable(String),

    #[error("invalid operands for {op}: {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("expected {expected}, found {found}")]
    ShapeError { expected: String, found: String },

    #[error("array index must be a non-negative integer, found {0}")]
    NegativeIndex(i64),

    #[error("division by zero")]
    DivisionByZero,

    #[error("function {name} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("{name} requires {expected} argument(s), got {found}")]
    BuiltinArity {
        name: String,
        expected: String,
        found: usize,
    },

    #[error("@load path argument must be a string")]
    LoadPathNotString,

    #[error("unknown builtin function: {0}")]
    UnknownBuiltin(String),

    #[error("break outside of a loop")]
    BreakOutsideLoop,

    #[error("continue outside of a loop")]
    ContinueOutsideLoop,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EvalResult<T> = Result<T, EvalError>;
