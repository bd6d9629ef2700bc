mod display;
pub mod error;
pub mod eval;
pub mod formula;
pub mod parser;
pub mod proof;
pub mod rule;
mod token;

pub use display::NumberedProof;
pub use error::{ErrorKind, EvalError, RuleError, SyntaxError};
pub use eval::{Env, Evaluation, Value};
pub use formula::Formula;
pub use parser::{parse_formula, split_list};
pub use proof::{Change, LineId, Proof, ProofEntry};
pub use rule::{Rule, RuleCall};
