use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use super::error::GrammarError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    NonTerminal(String),
    Terminal(String),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerminal(name) | Symbol::Terminal(name) => name.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

/// A production `left -> right`, with symbols given as indices into [`Grammar::symbols`].
/// An empty `right` is an epsilon production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub left: usize,
    pub right: Vec<usize>,
}

impl Rule {
    pub fn new(left: usize, right: Vec<usize>) -> Self {
        Self { left, right }
    }

    pub fn is_epsilon(&self) -> bool {
        self.right.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub rules: Vec<Rule>,
    pub start_symbol: Option<usize>,
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            rules: Vec::new(),
            start_symbol: None,
        }
    }

    /// Terminal indices in order of first appearance.
    pub fn terminal_iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.symbols.len()).filter(|&i| self.symbols[i].is_terminal())
    }

    /// Non-terminal indices in order of first appearance as a left-hand side.
    pub fn non_terminal_iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.symbols.len()).filter(|&i| !self.symbols[i].is_terminal())
    }

    pub fn is_terminal(&self, index: usize) -> bool {
        self.symbols[index].is_terminal()
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        self.symbols[index].name()
    }

    pub fn symbol_names(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.get_symbol_name(i)).collect()
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::NonTerminal(name.to_string()));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.to_string()));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_production(&mut self, left: usize, right: Vec<usize>) {
        self.rules.push(Rule::new(left, right));
    }

    pub fn productions_of(&self, left: usize) -> impl Iterator<Item = &Vec<usize>> + '_ {
        self.rules
            .iter()
            .filter(move |r| r.left == left)
            .map(|r| &r.right)
    }

    pub fn start_symbol(&self) -> Result<usize, GrammarError> {
        self.start_symbol.ok_or(GrammarError::NoStartSymbol)
    }

    /// Terminals and non-terminals, each in order of first appearance anywhere in the rules.
    pub fn symbols_in_appearance_order(&self) -> (Vec<usize>, Vec<usize>) {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut terminals = Vec::new();
        let mut non_terminals = Vec::new();
        for rule in &self.rules {
            for &idx in std::iter::once(&rule.left).chain(rule.right.iter()) {
                if seen.insert(idx) {
                    if self.is_terminal(idx) {
                        terminals.push(idx);
                    } else {
                        non_terminals.push(idx);
                    }
                }
            }
        }
        (terminals, non_terminals)
    }

    /// Registers a new non-terminal named `base` followed by the next free counter value.
    /// Counter values whose name already belongs to a symbol are skipped, so
    /// `E -> E a | b * E1 -> c * #` gets `E2` rather than `E1`.
    pub fn add_fresh_non_terminal(
        &mut self,
        base: &str,
        counters: &mut HashMap<String, usize>,
    ) -> usize {
        let counter = counters.entry(base.to_string()).or_insert(1);
        let mut name = format!("{}{}", base, counter);
        while self.symbol_table.contains_key(&name) {
            *counter += 1;
            name = format!("{}{}", base, counter);
        }
        *counter += 1;
        self.add_non_terminal(&name)
    }

    /// Compares symbol strings by name, element-wise; a proper prefix sorts first.
    pub fn compare_sequences(&self, a: &[usize], b: &[usize]) -> Ordering {
        a.iter()
            .map(|&i| self.get_symbol_name(i))
            .cmp(b.iter().map(|&i| self.get_symbol_name(i)))
    }

    /// Orders rules by left-hand side name, then right-hand side.
    pub fn compare_rules(&self, a: &Rule, b: &Rule) -> Ordering {
        self.get_symbol_name(a.left)
            .cmp(self.get_symbol_name(b.left))
            .then_with(|| self.compare_sequences(&a.right, &b.right))
    }

    pub fn sort_rules(&mut self) {
        let mut rules = std::mem::take(&mut self.rules);
        rules.sort_by(|a, b| self.compare_rules(a, b));
        self.rules = rules;
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}
