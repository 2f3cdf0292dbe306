use log::debug;

use super::{error::GrammarError, token::tokenize, token::Token, Grammar};

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        Self::from_tokens(tokenize(grammar)?)
    }

    /// Builds a grammar from `ID -> alt | alt * ... #`. Anything after `#` is ignored.
    pub fn from_tokens<I>(tokens: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut tokens = tokens.into_iter();
        let mut raw_productions: Vec<(String, Vec<String>)> = Vec::new();

        loop {
            let left = match tokens.next() {
                Some(Token::Hash) => break,
                Some(Token::Id(name)) => name,
                Some(found) => return Err(GrammarError::ExpectedLeftHandSide(found)),
                None => return Err(GrammarError::UnexpectedEndOfInput),
            };

            match tokens.next() {
                Some(Token::Arrow) => {}
                Some(found) => return Err(GrammarError::ExpectedArrow { left, found }),
                None => return Err(GrammarError::UnexpectedEndOfInput),
            }

            loop {
                let mut right = Vec::new();
                let terminator = loop {
                    match tokens.next() {
                        Some(Token::Id(name)) => right.push(name),
                        Some(other) => break other,
                        None => return Err(GrammarError::UnexpectedEndOfInput),
                    }
                };
                raw_productions.push((left.clone(), right));

                match terminator {
                    Token::Or => continue,
                    Token::Star => break,
                    found => return Err(GrammarError::UnterminatedAlternative { left, found }),
                }
            }
        }

        let mut g = Self::new();

        // Every left-hand side is a non-terminal, wherever else the name shows up.
        for (left, _) in &raw_productions {
            if g.get_symbol_index(left).is_none() {
                g.add_non_terminal(left);
            }
        }

        for (left, right) in raw_productions {
            let left = g.symbol_table[&left];
            let right = right
                .iter()
                .map(|s| match g.get_symbol_index(s) {
                    Some(idx) => idx,
                    None => g.add_terminal(s),
                })
                .collect();
            g.add_production(left, right);
        }

        let start_symbol = g.non_terminal_iter().next();
        g.start_symbol = start_symbol;

        debug!(
            "parsed grammar: {} rules, {} terminals, {} non-terminals",
            g.rules.len(),
            g.terminal_iter().count(),
            g.non_terminal_iter().count()
        );

        Ok(g)
    }
}
