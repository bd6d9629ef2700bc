#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token<'a> {
    LParen,
    RParen,
    Not,
    And,
    Or,
    Implies,
    Iff,
    Assign,
    True,
    False,
    /// Maximal run of other non-whitespace characters, not yet checked to be a valid name.
    Name(&'a str),
}

impl Token<'_> {
    fn reserved(c: char) -> Option<Self> {
        use Token::*;
        let token = match c {
            '(' => LParen,
            ')' => RParen,
            '~' => Not,
            '^' => And,
            'v' => Or,
            '>' => Implies,
            '=' => Iff,
            ':' => Assign,
            'T' => True,
            'F' => False,
            _ => return None,
        };
        Some(token)
    }
}

/// Splits a line into tokens. Never fails: malformed input surfaces as a parse error.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = vec![];
    let mut start = None;
    for (i, c) in s.char_indices() {
        let reserved = Token::reserved(c);
        if reserved.is_some() || c.is_whitespace() {
            if let Some(j) = start.take() {
                tokens.push(Token::Name(&s[j..i]));
            }
            tokens.extend(reserved);
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(j) = start {
        tokens.push(Token::Name(&s[j..]));
    }
    tracing::trace!(?tokens, "tokenized");
    tokens
}
