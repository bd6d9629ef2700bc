use crate::error::SyntaxError;
use crate::formula::Formula;
use crate::token::{tokenize, Token};
use unicode_normalization::UnicodeNormalization;

type Connective = fn(Formula, Formula) -> Formula;

/// Deepest nesting of `~` and parentheses a formula may have.
pub const MAX_DEPTH: usize = 256;

peg::parser!(grammar formula_parser<'a>() for [Token<'a>] {
    pub rule formula() -> Formula
        = [Token::True] { Formula::Const(true) }
        / [Token::False] { Formula::Const(false) }
        / name:name() { Formula::atom(name) }
        / [Token::Not] p:formula() { Formula::not(p) }
        / [Token::LParen] name:name() [Token::Assign] p:formula() [Token::RParen] {
            Formula::assign(name, p)
        }
        / [Token::LParen] p:formula() op:connective() q:formula() [Token::RParen] { op(p, q) }

    rule name() -> &'a str
        = t:[_] {?
            match t {
                Token::Name(s) if Formula::is_valid_name(s) => Ok(s),
                _ => Err("atomic formula"),
            }
        }

    rule connective() -> Connective
        = [Token::And] { Formula::and as Connective }
        / [Token::Or] { Formula::or as Connective }
        / [Token::Implies] { Formula::implies as Connective }
        / [Token::Iff] { Formula::iff as Connective }
});

/// Parses a whole line into a formula; trailing tokens are an error, and so is nesting
/// deeper than [`MAX_DEPTH`].
pub fn parse_formula(s: &str) -> Result<Formula, SyntaxError> {
    let s: String = s.nfkc().collect();
    let tokens = tokenize(&s);
    let error = |position| SyntaxError {
        input: s.trim().into(),
        position,
    };
    if let Some(position) = too_deep(&tokens) {
        return Err(error(position));
    }
    formula_parser::formula(&tokens).map_err(|e| error(e.location))
}

/// Index of the first token nested deeper than `MAX_DEPTH`, if any.
///
/// Each open parenthesis counts one level, and so does each `~` until the operand it
/// negates is followed by a connective or the enclosing parenthesis closes.
fn too_deep(tokens: &[Token]) -> Option<usize> {
    // pending negations per open parenthesis, outermost first
    let mut nots = vec![0];
    let mut depth = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => {
                nots.push(0);
                depth += 1;
            }
            Token::Not => {
                if let Some(top) = nots.last_mut() {
                    *top += 1;
                    depth += 1;
                }
            }
            Token::And | Token::Or | Token::Implies | Token::Iff | Token::Assign => {
                if let Some(top) = nots.last_mut() {
                    depth -= *top;
                    *top = 0;
                }
            }
            Token::RParen if nots.len() > 1 => {
                if let Some(n) = nots.pop() {
                    depth -= n + 1;
                }
            }
            _ => {}
        }
        if depth > MAX_DEPTH {
            return Some(i);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{FALSE, TRUE};

    fn atom(s: &str) -> Formula {
        Formula::atom(s)
    }

    #[test]
    fn test_parse_formula() {
        assert_eq!(parse_formula("T").unwrap(), TRUE);
        assert_eq!(parse_formula("F").unwrap(), FALSE);
        assert_eq!(parse_formula("p").unwrap(), atom("p"));
        assert_eq!(parse_formula(" p12 ").unwrap(), atom("p12"));
        assert_eq!(parse_formula("~~p").unwrap(), Formula::not(Formula::not(atom("p"))));
        assert_eq!(
            parse_formula("(p ^ q)").unwrap(),
            Formula::and(atom("p"), atom("q"))
        );
        assert_eq!(
            parse_formula("(p v q)").unwrap(),
            Formula::or(atom("p"), atom("q"))
        );
        assert_eq!(
            parse_formula("(p > q)").unwrap(),
            Formula::implies(atom("p"), atom("q"))
        );
        assert_eq!(
            parse_formula("(p = q)").unwrap(),
            Formula::iff(atom("p"), atom("q"))
        );
        assert_eq!(
            parse_formula("(p : ~T)").unwrap(),
            Formula::assign("p", Formula::not(TRUE))
        );
    }

    #[test]
    fn test_parse_formula_nested() {
        assert_eq!(
            parse_formula("((p ^ ~q) > (r = (s v T)))").unwrap(),
            Formula::implies(
                Formula::and(atom("p"), Formula::not(atom("q"))),
                Formula::iff(atom("r"), Formula::or(atom("s"), TRUE))
            )
        );
        assert_eq!(
            parse_formula("~(p^q)").unwrap(),
            Formula::not(Formula::and(atom("p"), atom("q")))
        );
    }

    #[test]
    fn test_parse_formula_fullwidth() {
        assert_eq!(
            parse_formula("（p ^ q）").unwrap(),
            Formula::and(atom("p"), atom("q"))
        );
    }

    #[test]
    fn test_parse_formula_err() {
        for s in [
            "",
            "   ",
            "(",
            ")",
            "~",
            "p q",
            "(p ^ q",
            "p ^ q",
            "(p ^ q))",
            "(p q)",
            "(p ^ ^ q)",
            "((p ^ q) : T)",
            "(T : p)",
            "p$",
            "pv",
            "(p ^ q) r",
            ") p ^ q )",
        ] {
            assert!(parse_formula(s).is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_parse_formula_err_position() {
        let e = parse_formula("(p ^ q) r").unwrap_err();
        assert_eq!(e.input, "(p ^ q) r");
        assert_eq!(e.position, 5);
    }

    #[test]
    fn test_parse_formula_depth() {
        let nots = |n| format!("{}p", "~".repeat(n));
        assert!(parse_formula(&nots(MAX_DEPTH)).is_ok());
        let e = parse_formula(&nots(MAX_DEPTH + 1)).unwrap_err();
        assert_eq!(e.position, MAX_DEPTH);
        assert!(parse_formula(&nots(5000)).is_err());
        assert!(parse_formula(&nots(200_000)).is_err());

        let parens = |n| format!("{}p{}", "(p ^ ".repeat(n), ")".repeat(n));
        assert!(parse_formula(&parens(MAX_DEPTH)).is_ok());
        assert!(parse_formula(&parens(MAX_DEPTH + 1)).is_err());
        assert!(parse_formula(&parens(10_000)).is_err());

        // depth is released when a parenthesis closes
        let wide = format!("({} ^ {})", nots(MAX_DEPTH - 1), nots(MAX_DEPTH - 1));
        assert!(parse_formula(&wide).is_ok());
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(""), Vec::<&str>::new());
        assert_eq!(split_list("p"), vec!["p"]);
        assert_eq!(split_list("p, (q ^ r)"), vec!["p", " (q ^ r)"]);
        assert_eq!(split_list("^E1:3"), vec!["^E1", "3"]);
        assert_eq!(split_list("a,,b"), vec!["a", "", "b"]);
        assert_eq!(split_list("a,"), vec!["a"]);
        assert_eq!(split_list(",a"), vec!["", "a"]);
        assert_eq!(split_list("(p : T)"), vec!["(p ", " T)"]);
    }
}
