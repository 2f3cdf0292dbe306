use std::collections::HashSet;

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{nullable_first_follow::NullableFirstFollow, Grammar, END_MARK, EPSILON};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub right: Vec<&'a str>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let right: String = self.right.iter().map(|s| format!("{} ", s)).collect();
        format!("{} -> {}#", self.left, right)
    }

    pub fn to_latex(&self) -> String {
        let right = if self.right.is_empty() {
            "\\epsilon".to_string()
        } else {
            self.right
                .iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(" \\ ")
        };
        format!("{} & \\rightarrow & {}", escape::tex(self.left), right)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
}

impl<'a> ProductionOutputVec<'a> {
    pub fn productions(&self) -> &[ProductionOutput<'a>] {
        &self.productions
    }

    pub fn to_plaintext(&self) -> String {
        self.productions
            .iter()
            .map(|p| p.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|p| p.to_latex()))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec<'_> {
        let productions = self
            .rules
            .iter()
            .map(|rule| ProductionOutput {
                left: self.get_symbol_name(rule.left),
                right: rule.right.iter().map(|&s| self.get_symbol_name(s)).collect(),
            })
            .collect();
        ProductionOutputVec { productions }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolsOutput<'a> {
    pub terminals: Vec<&'a str>,
    pub non_terminals: Vec<&'a str>,
}

impl SymbolsOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let line = |names: &[&str]| names.iter().map(|s| format!("{} ", s)).collect::<String>();
        format!("{}\n{}", line(&self.terminals), line(&self.non_terminals))
    }

    pub fn to_latex(&self) -> String {
        let f = |names: &[&str]| {
            names
                .iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "\\begin{{tabular}}{{l|l}}\nTerminals & {}\\\\\nNon-terminals & {}\\\\\n\\end{{tabular}}",
            f(&self.terminals),
            f(&self.non_terminals)
        )
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    pub fn to_symbols_output(&self) -> SymbolsOutput<'_> {
        let (terminals, non_terminals) = self.symbols_in_appearance_order();
        SymbolsOutput {
            terminals: self.symbol_names(&terminals),
            non_terminals: self.symbol_names(&non_terminals),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NonTerminalOutput<'a> {
    pub name: &'a str,
    pub nullable: bool,
    pub first: Vec<&'a str>,
    pub follow: Vec<&'a str>,
    pub follow_end_mark: bool,
}

impl NonTerminalOutput<'_> {
    fn follow_with_end_mark(&self) -> Vec<&str> {
        let mut follow = Vec::new();
        if self.follow_end_mark {
            follow.push(END_MARK);
        }
        follow.extend(self.follow.iter().cloned());
        follow
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        let mut first = self.first.clone();
        if self.nullable {
            first.push(EPSILON);
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&first),
            f(&self.follow_with_end_mark())
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
}

impl<'a> NonTerminalOutputVec<'a> {
    pub fn data(&self) -> &[NonTerminalOutput<'a>] {
        &self.data
    }

    pub fn nullable(&self) -> Vec<&'a str> {
        self.data
            .iter()
            .filter(|nt| nt.nullable)
            .map(|nt| nt.name)
            .collect()
    }

    pub fn to_nullable_plaintext(&self) -> String {
        format!("Nullable = {{ {} }}", self.nullable().join(", "))
    }

    pub fn to_first_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|nt| format!("FIRST({}) = {{ {} }}", nt.name, nt.first.join(", ")))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_follow_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|nt| {
                format!(
                    "FOLLOW({}) = {{ {} }}",
                    nt.name,
                    nt.follow_with_end_mark().join(", ")
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    fn in_terminal_order(&self, set: Option<&HashSet<usize>>) -> Vec<&str> {
        self.terminal_iter()
            .filter(|t| set.map_or(false, |s| s.contains(t)))
            .map(|t| self.get_symbol_name(t))
            .collect()
    }

    /// Results per non-terminal in declaration order, terminals in appearance order.
    pub fn to_non_terminal_output_vec(
        &self,
        nff: &NullableFirstFollow,
    ) -> NonTerminalOutputVec<'_> {
        let data = self
            .non_terminal_iter()
            .map(|nt| {
                let follow = nff.follow.get(&nt);
                NonTerminalOutput {
                    name: self.get_symbol_name(nt),
                    nullable: nff.nullable.contains(&nt),
                    first: self.in_terminal_order(nff.first.get(&nt)),
                    follow: self.in_terminal_order(follow.map(|f| &f.terminals)),
                    follow_end_mark: follow.map_or(false, |f| f.end_mark),
                }
            })
            .collect();
        NonTerminalOutputVec { data }
    }
}
