use crate::error::RuleError;
use crate::formula::Formula;
use crate::parser::{parse_formula, split_list};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Inference rules of the natural deduction system, plus `delete`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Rule {
    AndElim1,
    AndElim2,
    AndIntro,
    NotElim,
    ImpliesElim,
    IffElim1,
    IffElim2,
    Assume,
    FalsumIntro,
    FalsumElim,
    NotIntro,
    ImpliesIntro,
    TruthIntro,
    IffIntro,
    OrIntro1,
    OrIntro2,
    OrElim,
    Reiterate,
    Delete,
}

impl Rule {
    pub const ALL: [Rule; 19] = {
        use Rule::*;
        [
            AndElim1,
            AndElim2,
            AndIntro,
            NotElim,
            ImpliesElim,
            IffElim1,
            IffElim2,
            Assume,
            FalsumIntro,
            FalsumElim,
            NotIntro,
            ImpliesIntro,
            TruthIntro,
            IffIntro,
            OrIntro1,
            OrIntro2,
            OrElim,
            Reiterate,
            Delete,
        ]
    };

    pub fn symbol(self) -> &'static str {
        use Rule::*;
        match self {
            AndElim1 => "^E1",
            AndElim2 => "^E2",
            AndIntro => "^I",
            NotElim => "~E",
            ImpliesElim => ">E",
            IffElim1 => "=E1",
            IffElim2 => "=E2",
            Assume => "Assume",
            FalsumIntro => "FI",
            FalsumElim => "FE",
            NotIntro => "~I",
            ImpliesIntro => ">I",
            TruthIntro => "TI",
            IffIntro => "=I",
            OrIntro1 => "vI1",
            OrIntro2 => "vI2",
            OrElim => "vE",
            Reiterate => "R",
            Delete => "delete",
        }
    }

    /// Number of line references the rule accepts.
    pub fn arity(self) -> RangeInclusive<usize> {
        use Rule::*;
        match self {
            Assume | TruthIntro | Delete => 0..=0,
            AndElim1 | AndElim2 | NotElim | FalsumElim | Reiterate | OrIntro1 | OrIntro2 => 1..=1,
            AndIntro | ImpliesElim | IffElim1 | IffElim2 | FalsumIntro | NotIntro | IffIntro => {
                2..=2
            }
            ImpliesIntro => 1..=2,
            OrElim => 3..=3,
        }
    }

    /// Whether the rule consumes a formula supplied by the caller rather than computing one.
    pub fn needs_formula(self) -> bool {
        matches!(
            self,
            Rule::Assume | Rule::FalsumElim | Rule::OrIntro1 | Rule::OrIntro2
        )
    }

    /// Whether a shell has to ask for that formula separately. `Assume` carries its formula
    /// in the invocation line itself.
    pub fn prompts_formula(self) -> bool {
        self.needs_formula() && self != Rule::Assume
    }

    pub(crate) fn check_arity(self, found: usize) -> Result<(), RuleError> {
        let arity = self.arity();
        if arity.contains(&found) {
            return Ok(());
        }
        if self == Rule::Assume {
            return Err(RuleError::AssumeArity);
        }
        let expected = match (arity.start(), arity.end()) {
            (0, 0) => "no",
            (1, 1) => "1",
            (2, 2) => "2",
            (1, 2) => "1 or 2",
            _ => "3",
        };
        Err(RuleError::Arity {
            rule: self,
            expected,
            found,
        })
    }

    pub(crate) fn check_formula(self, formula: Option<&Formula>) -> Result<(), RuleError> {
        match (self.needs_formula(), formula.is_some()) {
            (true, false) => Err(RuleError::MissingFormula(self)),
            (false, true) => Err(RuleError::UnexpectedFormula(self)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::ALL
            .into_iter()
            .find(|rule| rule.symbol() == s)
            .ok_or_else(|| RuleError::UnknownRule(s.into()))
    }
}

/// A parsed rule invocation such as `>E, 0, 2` or `Assume, (p ^ q)`.
///
/// Line numbers are positions in the proof as displayed at the time of the call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleCall {
    pub rule: Rule,
    pub lines: Vec<usize>,
    /// The assumed formula of `Assume`.
    pub formula: Option<Formula>,
}

impl RuleCall {
    pub fn parse(s: &str) -> Result<Self, RuleError> {
        let items = split_list(s);
        let Some((name, args)) = items.split_first() else {
            return Err(RuleError::UnknownRule(String::new()));
        };
        let rule: Rule = name.trim().parse()?;

        if rule == Rule::Assume {
            let [arg] = args else {
                return Err(RuleError::AssumeArity);
            };
            return Ok(Self {
                rule,
                lines: vec![],
                formula: Some(parse_formula(arg)?),
            });
        }

        let lines = args
            .iter()
            .map(|arg| {
                let arg = arg.trim();
                arg.parse()
                    .map_err(|_| RuleError::InvalidIndex(arg.into()))
            })
            .collect::<Result<Vec<usize>, _>>()?;
        rule.check_arity(lines.len())?;
        Ok(Self {
            rule,
            lines,
            formula: None,
        })
    }
}
