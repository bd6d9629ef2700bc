use crate::error::EvalError;
use crate::formula::Formula;
use crate::parser::parse_formula;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Truth-value assignments of one evaluator session, in assignment order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Env {
    vars: FxIndexMap<String, bool>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Some atomic formula the value depends on is unassigned.
    Undefined,
    /// The line was an assignment; `value` is what was assigned.
    Assigned { name: String, value: Option<bool> },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Evaluation {
    pub value: Value,
    /// Unassigned atomic formulas met during evaluation, in order of first occurrence.
    pub unassigned: Vec<String>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.vars.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.vars.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Binds `name`, or unbinds it when the value is undefined.
    pub fn assign(&mut self, name: &str, value: Option<bool>) {
        match value {
            Some(value) => {
                self.vars.insert(name.into(), value);
            }
            None => {
                self.vars.shift_remove(name);
            }
        }
    }

    /// Parses and evaluates one session line.
    pub fn eval_line(&mut self, s: &str) -> Result<Evaluation, EvalError> {
        let fml = parse_formula(s)?;
        self.eval(&fml)
    }

    /// Evaluates a formula; a top-level assignment updates the environment.
    ///
    /// Fails without touching the environment if an assignment is nested.
    pub fn eval(&mut self, fml: &Formula) -> Result<Evaluation, EvalError> {
        if fml.has_nested_assign() {
            return Err(EvalError::NestedAssignment);
        }
        let mut unassigned = vec![];
        let value = match fml {
            Formula::Assign(name, p) => {
                let value = self.truth(p, &mut unassigned);
                self.assign(name, value);
                Value::Assigned {
                    name: name.clone(),
                    value,
                }
            }
            _ => match self.truth(fml, &mut unassigned) {
                Some(b) => Value::Bool(b),
                None => Value::Undefined,
            },
        };
        Ok(Evaluation { value, unassigned })
    }

    /// Strong Kleene valuation; `None` is the undefined value.
    fn truth(&self, fml: &Formula, unassigned: &mut Vec<String>) -> Option<bool> {
        use Formula::*;
        match fml {
            Const(b) => Some(*b),
            Atom(name) => {
                let value = self.get(name);
                if value.is_none() && !unassigned.contains(name) {
                    tracing::warn!(%name, "atomic formula has not been assigned a truth-value");
                    unassigned.push(name.clone());
                }
                value
            }
            Not(p) => self.truth(p, unassigned).map(|b| !b),
            And(p, q) => and(self.truth(p, unassigned), self.truth(q, unassigned)),
            Or(p, q) => or(self.truth(p, unassigned), self.truth(q, unassigned)),
            Implies(p, q) => {
                let (p, q) = (self.truth(p, unassigned), self.truth(q, unassigned));
                not(and(p, not(q)))
            }
            Iff(p, q) => {
                let (p, q) = (self.truth(p, unassigned), self.truth(q, unassigned));
                or(and(p, q), and(not(p), not(q)))
            }
            // rejected by `has_nested_assign` before evaluation starts
            Assign(..) => None,
        }
    }
}

fn not(p: Option<bool>) -> Option<bool> {
    p.map(|b| !b)
}

fn and(p: Option<bool>, q: Option<bool>) -> Option<bool> {
    match (p, q) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}

fn or(p: Option<bool>, q: Option<bool>) -> Option<bool> {
    not(and(not(p), not(q)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{FALSE, TRUE};
    use maplit::hashmap;
    use std::collections::HashMap;

    fn value(env: &mut Env, s: &str) -> Value {
        env.eval_line(s).unwrap().value
    }

    fn snapshot(env: &Env) -> HashMap<&str, bool> {
        env.iter().collect()
    }

    #[test]
    fn test_truth_tables() {
        let mut env = Env::new();
        for (s, expected) in [
            ("T", true),
            ("F", false),
            ("~T", false),
            ("~F", true),
            ("(T ^ T)", true),
            ("(T ^ F)", false),
            ("(F ^ T)", false),
            ("(F ^ F)", false),
            ("(T v T)", true),
            ("(T v F)", true),
            ("(F v T)", true),
            ("(F v F)", false),
            ("(T > T)", true),
            ("(T > F)", false),
            ("(F > T)", true),
            ("(F > F)", true),
            ("(T = T)", true),
            ("(T = F)", false),
            ("(F = T)", false),
            ("(F = F)", true),
            ("((T > F) v ~(F ^ T))", true),
        ] {
            assert_eq!(value(&mut env, s), Value::Bool(expected), "{s}");
        }
        assert!(env.is_empty());
    }

    #[test]
    fn test_eval_formula() {
        let mut env = Env::new();
        let fml = Formula::implies(TRUE, FALSE);
        assert_eq!(env.eval(&fml).unwrap().value, Value::Bool(false));
        let fml = Formula::iff(TRUE, TRUE);
        assert_eq!(env.eval(&fml).unwrap().value, Value::Bool(true));
    }

    #[test]
    fn test_assign_persists() {
        let mut env = Env::new();
        assert_eq!(
            value(&mut env, "(p : T)"),
            Value::Assigned {
                name: "p".into(),
                value: Some(true)
            }
        );
        assert_eq!(value(&mut env, "p"), Value::Bool(true));
        value(&mut env, "(q : (p ^ F))");
        assert_eq!(snapshot(&env), hashmap! {"p" => true, "q" => false});
        assert_eq!(value(&mut env, "(p > q)"), Value::Bool(false));
        value(&mut env, "(p : q)");
        assert_eq!(snapshot(&env), hashmap! {"p" => false, "q" => false});
    }

    #[test]
    fn test_unassigned() {
        let mut env = Env::new();
        let evaluation = env.eval_line("((p ^ q) v ~p)").unwrap();
        assert_eq!(evaluation.value, Value::Undefined);
        assert_eq!(evaluation.unassigned, vec!["p", "q"]);
        assert_eq!(value(&mut env, "~r"), Value::Undefined);
    }

    #[test]
    fn test_kleene() {
        let mut env = Env::new();
        assert_eq!(value(&mut env, "(F ^ p)"), Value::Bool(false));
        assert_eq!(value(&mut env, "(p ^ F)"), Value::Bool(false));
        assert_eq!(value(&mut env, "(p ^ T)"), Value::Undefined);
        assert_eq!(value(&mut env, "(p v T)"), Value::Bool(true));
        assert_eq!(value(&mut env, "(p v F)"), Value::Undefined);
        assert_eq!(value(&mut env, "(F > p)"), Value::Bool(true));
        assert_eq!(value(&mut env, "(p > T)"), Value::Bool(true));
        assert_eq!(value(&mut env, "(T > p)"), Value::Undefined);
        assert_eq!(value(&mut env, "(p = T)"), Value::Undefined);
    }

    #[test]
    fn test_assign_undefined_unbinds() {
        let mut env = Env::new();
        value(&mut env, "(p : T)");
        let evaluation = env.eval_line("(p : r)").unwrap();
        assert_eq!(
            evaluation.value,
            Value::Assigned {
                name: "p".into(),
                value: None
            }
        );
        assert_eq!(evaluation.unassigned, vec!["r"]);
        assert!(env.is_empty());
    }

    #[test]
    fn test_eval_err() {
        let mut env = Env::new();
        value(&mut env, "(p : T)");
        assert_eq!(
            env.eval_line("~(q : F)"),
            Err(EvalError::NestedAssignment)
        );
        assert_eq!(
            env.eval_line("(q : (r : F))"),
            Err(EvalError::NestedAssignment)
        );
        assert!(matches!(env.eval_line("(p ^"), Err(EvalError::Syntax(_))));
        assert_eq!(snapshot(&env), hashmap! {"p" => true});
    }
}
