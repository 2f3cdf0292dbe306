use std::fmt::Display;

use super::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    // The tokenizer met a character that starts no token
    UnexpectedCharacter { c: char, line: usize, column: usize },
    // A rule starts with something other than an identifier
    ExpectedLeftHandSide(Token),
    // The left-hand side is not followed by `->`
    ExpectedArrow { left: String, found: Token },
    // An alternative ends with something other than `|` or `*`
    UnterminatedAlternative { left: String, found: Token },
    // The token stream ran out before `#`
    UnexpectedEndOfInput,
    // The grammar has no rules, so there is no start symbol to seed FOLLOW with
    NoStartSymbol,
}

impl GrammarError {
    pub fn is_malformed(&self) -> bool {
        !matches!(self, GrammarError::NoStartSymbol)
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::UnexpectedCharacter { c, line, column } => {
                write!(f, "{}:{}: unexpected character `{}`", line, column, c)
            }
            GrammarError::ExpectedLeftHandSide(found) => {
                write!(f, "expected a non-terminal to start a rule, found {}", found)
            }
            GrammarError::ExpectedArrow { left, found } => {
                write!(f, "expected `->` after `{}`, found {}", left, found)
            }
            GrammarError::UnterminatedAlternative { left, found } => write!(
                f,
                "alternative of `{}` must end with `|` or `*`, found {}",
                left, found
            ),
            GrammarError::UnexpectedEndOfInput => {
                write!(f, "grammar ended before the closing `#`")
            }
            GrammarError::NoStartSymbol => write!(f, "grammar has no rules, so no start symbol"),
        }
    }
}

impl std::error::Error for GrammarError {}
