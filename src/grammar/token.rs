use std::fmt::Display;

use super::error::GrammarError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Id(String),
    Arrow,
    Or,
    Star,
    Hash,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Id(name) => write!(f, "`{}`", name),
            Token::Arrow => write!(f, "`->`"),
            Token::Or => write!(f, "`|`"),
            Token::Star => write!(f, "`*`"),
            Token::Hash => write!(f, "`#`"),
        }
    }
}

/// Splits grammar text into tokens, stopping after the first `#`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, GrammarError> {
    let mut tokens = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        let mut chars = line.char_indices().peekable();
        while let Some((column, c)) = chars.next() {
            let token = match c {
                c if c.is_whitespace() => continue,
                '|' => Token::Or,
                '*' => Token::Star,
                '#' => {
                    tokens.push(Token::Hash);
                    return Ok(tokens);
                }
                '-' if matches!(chars.peek(), Some((_, '>'))) => {
                    chars.next();
                    Token::Arrow
                }
                c if c.is_ascii_alphabetic() => {
                    let mut name = c.to_string();
                    while let Some((_, next)) = chars.next_if(|(_, n)| n.is_ascii_alphanumeric()) {
                        name.push(next);
                    }
                    Token::Id(name)
                }
                c => {
                    return Err(GrammarError::UnexpectedCharacter {
                        c,
                        line: line_no + 1,
                        column: column + 1,
                    })
                }
            };
            tokens.push(token);
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Token {
        Token::Id(s.to_string())
    }

    #[test]
    fn tokenize_rule() {
        assert_eq!(
            tokenize("S -> a B1 | * #").unwrap(),
            vec![
                id("S"),
                Token::Arrow,
                id("a"),
                id("B1"),
                Token::Or,
                Token::Star,
                Token::Hash
            ]
        );
    }

    #[test]
    fn tokenize_without_spaces() {
        assert_eq!(
            tokenize("S->a|b*#").unwrap(),
            vec![
                id("S"),
                Token::Arrow,
                id("a"),
                Token::Or,
                id("b"),
                Token::Star,
                Token::Hash
            ]
        );
    }

    #[test]
    fn stops_at_hash() {
        assert_eq!(tokenize("# S -> ?").unwrap(), vec![Token::Hash]);
    }

    #[test]
    fn reports_position_of_bad_character() {
        assert_eq!(
            tokenize("S -> a *\nA -> b ; *").unwrap_err(),
            GrammarError::UnexpectedCharacter {
                c: ';',
                line: 2,
                column: 8
            }
        );
    }

    #[test]
    fn lone_dash_is_rejected() {
        assert!(tokenize("S - a").is_err());
    }
}
