/// Formula of sentential logic.
///
/// Two formulas are the same for rule matching iff their canonical renderings coincide,
/// which for trees built by the parser is exactly structural equality.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Formula {
    Atom(String),
    Const(bool),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Iff(Box<Formula>, Box<Formula>),
    /// Truth-value assignment `(p : q)`, only meaningful at the top of an evaluated line.
    Assign(String, Box<Formula>),
}

pub const TRUE: Formula = Formula::Const(true);
pub const FALSE: Formula = Formula::Const(false);

impl Formula {
    pub fn atom(name: impl Into<String>) -> Self {
        Formula::Atom(name.into())
    }

    pub fn not(p: Self) -> Self {
        Formula::Not(Box::new(p))
    }

    pub fn and(p: Self, q: Self) -> Self {
        Formula::And(Box::new(p), Box::new(q))
    }

    pub fn or(p: Self, q: Self) -> Self {
        Formula::Or(Box::new(p), Box::new(q))
    }

    pub fn implies(p: Self, q: Self) -> Self {
        Formula::Implies(Box::new(p), Box::new(q))
    }

    pub fn iff(p: Self, q: Self) -> Self {
        Formula::Iff(Box::new(p), Box::new(q))
    }

    pub fn assign(name: impl Into<String>, value: Self) -> Self {
        Formula::Assign(name.into(), Box::new(value))
    }

    /// Returns true if `self` is `~other`.
    pub fn is_negation_of(&self, other: &Self) -> bool {
        matches!(self, Formula::Not(p) if **p == *other)
    }

    pub fn is_falsum(&self) -> bool {
        *self == FALSE
    }

    /// Returns true if an assignment occurs anywhere below the top of the formula.
    pub fn has_nested_assign(&self) -> bool {
        use Formula::*;
        match self {
            Atom(_) | Const(_) => false,
            Assign(_, p) | Not(p) => p.contains_assign(),
            And(p, q) | Or(p, q) | Implies(p, q) | Iff(p, q) => {
                p.contains_assign() || q.contains_assign()
            }
        }
    }

    fn contains_assign(&self) -> bool {
        matches!(self, Formula::Assign(..)) || self.has_nested_assign()
    }

    /// Checks that a name can stand for an atomic formula: letters and digits only,
    /// never `v`, `T` or `F`.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() && !matches!(c, 'v' | 'T' | 'F'))
    }
}
