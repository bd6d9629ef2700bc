use crate::rule::Rule;
use thiserror::Error;

/// The three ways a session line can fail; none of them is fatal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    Syntax,
    Mismatch,
    Reference,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("That is not a well-formed formula.")]
pub struct SyntaxError {
    /// The normalized input that failed to parse.
    pub input: String,
    /// Index of the token where parsing failed.
    pub position: usize,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("A truth-value assignment can only appear at the top of a formula.")]
    NestedAssignment,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RuleError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    // malformed invocations
    #[error("That is not an acceptable inference rule.")]
    UnknownRule(String),
    #[error("You can only assume a single formula.")]
    AssumeArity,
    #[error("Rule {rule} takes {expected} line number(s), but {found} were given.")]
    Arity {
        rule: Rule,
        expected: &'static str,
        found: usize,
    },
    #[error("Rule {0} needs a formula.")]
    MissingFormula(Rule),
    #[error("Rule {0} does not take a formula.")]
    UnexpectedFormula(Rule),

    // references
    #[error("{0:?} is not a line number.")]
    InvalidIndex(String),
    #[error("There is no line {index}; the proof has {len} line(s).")]
    OutOfRange { index: usize, len: usize },
    #[error("That line is no longer part of the proof.")]
    StaleLine,
    #[error("Line {0} must be the last line of the subproof.")]
    NotLastLine(usize),
    #[error("There is nothing to delete.")]
    EmptyProof,

    // rule preconditions
    #[error("That formula is not a conjunction.")]
    NotConjunction,
    #[error("That is not a double negation.")]
    NotDoubleNegation,
    #[error("That is not a contradiction.")]
    NotContradiction,
    #[error("You must first close the current subproof.")]
    OpenSubproof,
    #[error("Line {0} is a closed subproof, not a formula.")]
    ClosedSubproof(usize),
    #[error("That is not an acceptable use of {0}.")]
    Unacceptable(Rule),
}

impl RuleError {
    pub fn kind(&self) -> ErrorKind {
        use RuleError::*;
        match self {
            Syntax(_) => ErrorKind::Syntax,
            InvalidIndex(_) | OutOfRange { .. } | StaleLine | NotLastLine(_) | EmptyProof => {
                ErrorKind::Reference
            }
            UnknownRule(_) | AssumeArity | Arity { .. } | MissingFormula(_)
            | UnexpectedFormula(_) | NotConjunction | NotDoubleNegation | NotContradiction
            | OpenSubproof | ClosedSubproof(_) | Unacceptable(_) => {
                ErrorKind::Mismatch
            }
        }
    }
}
