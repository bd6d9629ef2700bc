use sentential_logic_rs::{parse_formula, Change, Env, Proof, RuleCall, RuleError};
use std::io::{self, BufRead, Write};

const EXIT: &str = "exit";

/// Line-oriented session over any reader and writer. Errors are printed and the
/// session goes on; only `exit` or the end of input stops it.
pub struct Repl<R, W> {
    input: R,
    output: W,
    prompts: bool,
    numbered: bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W, prompts: bool) -> Self {
        Self {
            input,
            output,
            prompts,
            numbered: false,
        }
    }

    pub fn numbered(&mut self, numbered: bool) -> &mut Self {
        self.numbered = numbered;
        self
    }

    /// Next line without its line break, or `None` on `exit` or end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.prompts {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;
        }
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim() == EXIT {
            return Ok(None);
        }
        Ok(Some(line.into()))
    }

    pub fn evaluator(&mut self) -> io::Result<()> {
        let mut env = Env::new();
        while let Some(line) = self.read_line("%")? {
            match env.eval_line(&line) {
                Ok(evaluation) => {
                    for name in &evaluation.unassigned {
                        writeln!(
                            self.output,
                            "Atomic formula {name} has not been assigned a truth-value."
                        )?;
                    }
                    writeln!(self.output, "% {}", evaluation.value)?;
                }
                Err(e) => writeln!(self.output, "{e}")?,
            }
            writeln!(self.output, "   env = {env}")?;
        }
        Ok(())
    }

    pub fn prover(&mut self, premises: Option<String>) -> io::Result<()> {
        let mut premises = premises;
        let mut proof = loop {
            let line = match premises.take() {
                Some(line) => line,
                None => match self.read_line("Please state the premises: ")? {
                    Some(line) => line,
                    None => return Ok(()),
                },
            };
            match Proof::start_line(&line) {
                Ok(proof) => break proof,
                Err(e) => writeln!(self.output, "{e}")?,
            }
        };
        self.show(&proof)?;

        while let Some(line) = self.read_line("Please apply an inference rule: ")? {
            if let Err(e) = self.apply(&mut proof, &line)? {
                writeln!(self.output, "{e}")?;
            }
            self.show(&proof)?;
        }
        Ok(())
    }

    fn apply(&mut self, proof: &mut Proof, line: &str) -> io::Result<Result<Change, RuleError>> {
        let call = match RuleCall::parse(line) {
            Ok(call) => call,
            Err(e) => return Ok(Err(e)),
        };
        let mut formula = None;
        if call.rule.prompts_formula() {
            let Some(s) = self.read_line("Please provide a formula: ")? else {
                return Ok(Err(RuleError::MissingFormula(call.rule)));
            };
            match parse_formula(&s) {
                Ok(p) => formula = Some(p),
                Err(e) => return Ok(Err(e.into())),
            }
        }
        Ok(proof.apply_call(call, formula))
    }

    fn show(&mut self, proof: &Proof) -> io::Result<()> {
        if self.numbered {
            write!(self.output, "{}", proof.numbered())
        } else {
            writeln!(self.output, "  proof = {proof}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_session(input: &str) -> String {
        let mut output = vec![];
        Repl::new(input.as_bytes(), &mut output, false)
            .evaluator()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn prove_session(premises: Option<&str>, input: &str, numbered: bool) -> String {
        let mut output = vec![];
        Repl::new(input.as_bytes(), &mut output, false)
            .numbered(numbered)
            .prover(premises.map(Into::into))
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_evaluator() {
        let output = eval_session("(p : T)\np\nq\n(p ^\nexit\np\n");
        assert_eq!(
            output,
            concat!(
                "% p := T\n",
                "   env = {p: T}\n",
                "% T\n",
                "   env = {p: T}\n",
                "Atomic formula q has not been assigned a truth-value.\n",
                "% undefined\n",
                "   env = {p: T}\n",
                "That is not a well-formed formula.\n",
                "   env = {p: T}\n",
            )
        );
    }

    #[test]
    fn test_evaluator_nested_assignment() {
        let output = eval_session("~(p : T)\n");
        assert_eq!(
            output,
            "A truth-value assignment can only appear at the top of a formula.\n   env = {}\n"
        );
    }

    #[test]
    fn test_evaluator_deep_formula() {
        let input = format!("{}p\n(p : T)\n", "~".repeat(50_000));
        let output = eval_session(&input);
        assert_eq!(
            output,
            concat!(
                "That is not a well-formed formula.\n",
                "   env = {}\n",
                "% p := T\n",
                "   env = {p: T}\n",
            )
        );
    }

    #[test]
    fn test_prover() {
        let output = prove_session(None, "p, (p > q)\n>E, 0, 1\n^E1, 0\nvI1, 2\nr\nexit\n", false);
        assert_eq!(
            output,
            concat!(
                "  proof = [[p], [(p > q)]]\n",
                "  proof = [[p], [(p > q)], q]\n",
                "That formula is not a conjunction.\n",
                "  proof = [[p], [(p > q)], q]\n",
                "  proof = [[p], [(p > q)], q, (q v r)]\n",
            )
        );
    }

    #[test]
    fn test_prover_reprompts_premises() {
        let output = prove_session(None, "(p\np\n", false);
        assert_eq!(output, "That is not a well-formed formula.\n  proof = [[p]]\n");
    }

    #[test]
    fn test_prover_bad_extra_formula() {
        let output = prove_session(Some("F"), "FE, 0\n(q\nFE, 0\nq\n", false);
        assert_eq!(
            output,
            concat!(
                "  proof = [[F]]\n",
                "That is not a well-formed formula.\n",
                "  proof = [[F]]\n",
                "  proof = [[F], q]\n",
            )
        );
    }

    #[test]
    fn test_prover_numbered() {
        let output = prove_session(Some("p"), "Assume, q\n>I, 1\n", true);
        assert_eq!(
            output,
            concat!(
                "0  [p]\n",
                "0  [p]\n1  [q]\n",
                "0  [p]\n1  [[q]]\n2  (q > q)\n",
            )
        );
    }

    #[test]
    fn test_prompts() {
        let mut output = vec![];
        Repl::new("T\n".as_bytes(), &mut output, true)
            .evaluator()
            .unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "%% T\n   env = {}\n%");
    }
}
