use crate::error::{RuleError, SyntaxError};
use crate::formula::{Formula, FALSE, TRUE};
use crate::parser::{parse_formula, split_list};
use crate::rule::{Rule, RuleCall};

/// Stable identity of a proof line, unaffected by later lines being folded into subproofs.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LineId(usize);

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProofEntry {
    Justified(Formula),
    /// Premise or first line of a subproof that has not been discharged yet.
    OpenAssumption(Formula),
    ClosedSubproof(Vec<ProofEntry>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Line {
    id: LineId,
    entry: ProofEntry,
}

/// Proof under construction: premises followed by the lines derived from them.
#[derive(Clone, Debug, Default)]
pub struct Proof {
    lines: Vec<Line>,
    next_id: usize,
}

/// What a successful rule application did to the proof.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Change {
    Appended(LineId),
    /// A subproof was folded into one line and its conclusion appended after it.
    Discharged {
        subproof: LineId,
        conclusion: LineId,
    },
    Removed(ProofEntry),
}

/// Mutation computed by a rule before anything is written.
enum Step {
    Append(ProofEntry),
    Discharge { start: usize, conclusion: Formula },
    Remove,
}

impl ProofEntry {
    /// The formula of a line, looking through the assumption wrapper.
    pub fn formula(&self) -> Option<&Formula> {
        match self {
            ProofEntry::Justified(p) | ProofEntry::OpenAssumption(p) => Some(p),
            ProofEntry::ClosedSubproof(_) => None,
        }
    }

    pub fn is_open_assumption(&self) -> bool {
        matches!(self, ProofEntry::OpenAssumption(_))
    }
}

impl Proof {
    /// Starts a proof whose premises are available as open assumptions.
    pub fn start(premises: impl IntoIterator<Item = Formula>) -> Self {
        let mut proof = Self::default();
        for p in premises {
            proof.push(ProofEntry::OpenAssumption(p));
        }
        proof
    }

    /// Starts a proof from a comma separated premise line. A blank line has no premises.
    pub fn start_line(s: &str) -> Result<Self, SyntaxError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let premises = split_list(s)
            .into_iter()
            .map(parse_formula)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::start(premises))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProofEntry> {
        self.lines.iter().map(|line| &line.entry)
    }

    pub fn last(&self) -> Option<&ProofEntry> {
        self.lines.last().map(|line| &line.entry)
    }

    pub fn entry(&self, id: LineId) -> Option<&ProofEntry> {
        self.position(id).map(|i| &self.lines[i].entry)
    }

    /// Current position of a line, if it is still a top-level line.
    pub fn position(&self, id: LineId) -> Option<usize> {
        self.lines.binary_search_by_key(&id, |line| line.id).ok()
    }

    /// Id of the line currently displayed at `index`.
    pub fn id_at(&self, index: usize) -> Result<LineId, RuleError> {
        self.lines
            .get(index)
            .map(|line| line.id)
            .ok_or(RuleError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Applies an invocation whose line numbers refer to the proof as it is now.
    pub fn apply_call(
        &mut self,
        call: RuleCall,
        formula: Option<Formula>,
    ) -> Result<Change, RuleError> {
        let ids = call
            .lines
            .iter()
            .map(|&i| self.id_at(i))
            .collect::<Result<Vec<_>, _>>()?;
        let formula = match (call.formula, formula) {
            (Some(_), Some(_)) => return Err(RuleError::UnexpectedFormula(call.rule)),
            (inline, given) => inline.or(given),
        };
        self.apply(call.rule, &ids, formula)
    }

    /// Applies a rule to the given lines.
    ///
    /// On success exactly one line is appended (after folding a subproof for `~I` and `>I`)
    /// or, for `delete`, the last line is removed. On failure the proof is left as it was.
    pub fn apply(
        &mut self,
        rule: Rule,
        operands: &[LineId],
        formula: Option<Formula>,
    ) -> Result<Change, RuleError> {
        match self.step(rule, operands, formula) {
            Ok(step) => {
                let change = self.commit(step);
                tracing::debug!(%rule, ?change, "rule applied");
                Ok(change)
            }
            Err(e) => {
                tracing::debug!(%rule, error = %e, "rule rejected");
                Err(e)
            }
        }
    }

    fn step(
        &self,
        rule: Rule,
        operands: &[LineId],
        formula: Option<Formula>,
    ) -> Result<Step, RuleError> {
        rule.check_arity(operands.len())?;
        rule.check_formula(formula.as_ref())?;
        let positions = operands
            .iter()
            .map(|&id| self.position(id).ok_or(RuleError::StaleLine))
            .collect::<Result<Vec<_>, _>>()?;
        let extra = || formula.clone().ok_or(RuleError::MissingFormula(rule));

        use Formula::*;
        use Rule::*;
        let derived = match rule {
            AndElim1 | AndElim2 => match self.formula_at(positions[0])? {
                And(p, q) => {
                    let conjunct = if rule == AndElim1 { p } else { q };
                    (**conjunct).clone()
                }
                _ => return Err(RuleError::NotConjunction),
            },
            AndIntro => Formula::and(
                self.formula_at(positions[0])?.clone(),
                self.formula_at(positions[1])?.clone(),
            ),
            NotElim => match self.formula_at(positions[0])? {
                Not(p) => match &**p {
                    Not(q) => (**q).clone(),
                    _ => return Err(RuleError::NotDoubleNegation),
                },
                _ => return Err(RuleError::NotDoubleNegation),
            },
            ImpliesElim => {
                let p = self.formula_at(positions[0])?;
                match self.formula_at(positions[1])? {
                    Implies(q, r) if **q == *p => (**r).clone(),
                    _ => return Err(RuleError::Unacceptable(rule)),
                }
            }
            IffElim1 | IffElim2 => {
                let p = self.formula_at(positions[0])?;
                match self.formula_at(positions[1])? {
                    Iff(l, r) if rule == IffElim1 && **l == *p => (**r).clone(),
                    Iff(l, r) if rule == IffElim2 && **r == *p => (**l).clone(),
                    _ => return Err(RuleError::Unacceptable(rule)),
                }
            }
            Assume => return Ok(Step::Append(ProofEntry::OpenAssumption(extra()?))),
            FalsumIntro => {
                let p = self.formula_at(positions[0])?;
                let q = self.formula_at(positions[1])?;
                if !(p.is_negation_of(q) || q.is_negation_of(p)) {
                    return Err(RuleError::NotContradiction);
                }
                FALSE
            }
            FalsumElim => {
                if !self.formula_at(positions[0])?.is_falsum() {
                    return Err(RuleError::NotContradiction);
                }
                extra()?
            }
            NotIntro => {
                let (start, end) = (positions[0], positions[1]);
                let assumption = self.discharged_assumption(rule, start)?;
                if end < start || !self.formula_at(end)?.is_falsum() {
                    return Err(RuleError::Unacceptable(rule));
                }
                if end + 1 != self.len() {
                    return Err(RuleError::NotLastLine(end));
                }
                return Ok(Step::Discharge {
                    start,
                    conclusion: Formula::not(assumption.clone()),
                });
            }
            ImpliesIntro => {
                let start = positions[0];
                let assumption = self.discharged_assumption(rule, start)?;
                let end = self.len() - 1;
                if let Some(&given) = positions.get(1) {
                    if given < start {
                        return Err(RuleError::Unacceptable(rule));
                    }
                    if given != end {
                        return Err(RuleError::NotLastLine(given));
                    }
                }
                let consequent = self.formula_at(end)?;
                return Ok(Step::Discharge {
                    start,
                    conclusion: Formula::implies(assumption.clone(), consequent.clone()),
                });
            }
            TruthIntro => TRUE,
            IffIntro => match (
                self.formula_at(positions[0])?,
                self.formula_at(positions[1])?,
            ) {
                (Implies(p, q), Implies(r, s)) if p == s && q == r => {
                    Formula::Iff(p.clone(), q.clone())
                }
                _ => return Err(RuleError::Unacceptable(rule)),
            },
            OrIntro1 => Formula::or(self.formula_at(positions[0])?.clone(), extra()?),
            OrIntro2 => Formula::or(extra()?, self.formula_at(positions[0])?.clone()),
            OrElim => match (
                self.formula_at(positions[0])?,
                self.formula_at(positions[1])?,
                self.formula_at(positions[2])?,
            ) {
                (Or(p, q), Implies(p1, r), Implies(q1, r1)) if p == p1 && q == q1 && r == r1 => {
                    (**r).clone()
                }
                _ => return Err(RuleError::Unacceptable(rule)),
            },
            Reiterate => self.formula_at(positions[0])?.clone(),
            Delete => {
                if self.is_empty() {
                    return Err(RuleError::EmptyProof);
                }
                return Ok(Step::Remove);
            }
        };
        Ok(Step::Append(ProofEntry::Justified(derived)))
    }

    fn formula_at(&self, i: usize) -> Result<&Formula, RuleError> {
        self.lines[i]
            .entry
            .formula()
            .ok_or(RuleError::ClosedSubproof(i))
    }

    /// Assumption opened at `start`, provided every subproof opened after it is closed.
    fn discharged_assumption(&self, rule: Rule, start: usize) -> Result<&Formula, RuleError> {
        let ProofEntry::OpenAssumption(assumption) = &self.lines[start].entry else {
            return Err(RuleError::Unacceptable(rule));
        };
        if self.lines[start + 1..]
            .iter()
            .any(|line| line.entry.is_open_assumption())
        {
            return Err(RuleError::OpenSubproof);
        }
        Ok(assumption)
    }

    fn commit(&mut self, step: Step) -> Change {
        match step {
            Step::Append(entry) => Change::Appended(self.push(entry)),
            Step::Discharge { start, conclusion } => {
                let entries = self.lines.drain(start..).map(|line| line.entry).collect();
                let subproof = self.push(ProofEntry::ClosedSubproof(entries));
                let conclusion = self.push(ProofEntry::Justified(conclusion));
                Change::Discharged {
                    subproof,
                    conclusion,
                }
            }
            Step::Remove => match self.lines.pop() {
                Some(line) => Change::Removed(line.entry),
                None => unreachable!("delete is rejected on an empty proof"),
            },
        }
    }

    fn push(&mut self, entry: ProofEntry) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push(Line { id, entry });
        id
    }
}
