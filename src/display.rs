use crate::eval::{Env, Value};
use crate::formula::Formula;
use crate::proof::{Proof, ProofEntry};
use itertools::Itertools;
use std::fmt;

impl fmt::Display for Formula {
    /// Canonical rendering: every binary connective fully parenthesized.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Formula::*;
        match self {
            Atom(name) => write!(f, "{name}"),
            Const(b) => write!(f, "{}", truth_str(*b)),
            Not(p) => write!(f, "~{p}"),
            And(p, q) => write!(f, "({p} ^ {q})"),
            Or(p, q) => write!(f, "({p} v {q})"),
            Implies(p, q) => write!(f, "({p} > {q})"),
            Iff(p, q) => write!(f, "({p} = {q})"),
            Assign(name, p) => write!(f, "({name} : {p})"),
        }
    }
}

impl fmt::Display for ProofEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofEntry::Justified(p) => write!(f, "{p}"),
            ProofEntry::OpenAssumption(p) => write!(f, "[{p}]"),
            ProofEntry::ClosedSubproof(entries) => write!(f, "[{}]", entries.iter().join(", ")),
        }
    }
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.entries().join(", "))
    }
}

pub struct NumberedProof<'a> {
    proof: &'a Proof,
}

impl fmt::Display for NumberedProof<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.proof.len().saturating_sub(1).to_string().len();
        for (i, entry) in self.proof.entries().enumerate() {
            writeln!(f, "{i:>width$}  {entry}")?;
        }
        Ok(())
    }
}

impl Proof {
    /// One line per top-level entry, prefixed with the number rules refer to it by.
    pub fn numbered(&self) -> NumberedProof<'_> {
        NumberedProof { proof: self }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.iter()
                .map(|(name, b)| format!("{name}: {}", truth_str(b)))
                .join(", ")
        )
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", truth_str(*b)),
            Value::Undefined => write!(f, "undefined"),
            Value::Assigned { name, value } => match value {
                Some(b) => write!(f, "{name} := {}", truth_str(*b)),
                None => write!(f, "{name} := undefined"),
            },
        }
    }
}

fn truth_str(b: bool) -> &'static str {
    if b {
        "T"
    } else {
        "F"
    }
}
