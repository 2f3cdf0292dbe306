use std::collections::HashMap;

use log::debug;

use super::{grammar::Rule, Grammar};

impl Grammar {
    /// Removes direct and indirect left recursion. Non-terminals are processed in
    /// name order; each `Ai -> Aj γ` with `j < i` is expanded before the direct
    /// recursion of `Ai` is split off into a fresh non-terminal. Rules are sorted.
    pub fn eliminate_left_recursion(&self) -> Grammar {
        let mut g = self.clone();
        let mut counters: HashMap<String, usize> = HashMap::new();

        let mut order: Vec<usize> = self.non_terminal_iter().collect();
        order.sort_by(|a, b| self.get_symbol_name(*a).cmp(self.get_symbol_name(*b)));

        for (i, &nt) in order.iter().enumerate() {
            for &replace in &order[..i] {
                let replacements: Vec<Vec<usize>> = g.productions_of(replace).cloned().collect();
                // a non-terminal without rules is inert
                if replacements.is_empty() {
                    continue;
                }
                let (expand, mut rules): (Vec<Rule>, Vec<Rule>) = std::mem::take(&mut g.rules)
                    .into_iter()
                    .partition(|r| r.left == nt && r.right.first() == Some(&replace));

                for production in expand {
                    for prefix in &replacements {
                        let right = prefix
                            .iter()
                            .chain(production.right.iter().skip(1))
                            .cloned()
                            .collect();
                        rules.push(Rule::new(nt, right));
                    }
                }
                g.rules = rules;
            }

            let (own, mut rules): (Vec<Rule>, Vec<Rule>) = std::mem::take(&mut g.rules)
                .into_iter()
                .partition(|r| r.left == nt);
            let (recursive, others): (Vec<Rule>, Vec<Rule>) = own
                .into_iter()
                .partition(|r| r.right.first() == Some(&nt));

            if recursive.is_empty() {
                rules.extend(others);
                g.rules = rules;
                continue;
            }

            let name = g.get_symbol_name(nt).to_string();
            let nt_prime = g.add_fresh_non_terminal(&name, &mut counters);
            debug!(
                "splitting {} left-recursive rules of {} into {}",
                recursive.len(),
                name,
                g.get_symbol_name(nt_prime)
            );

            if others.is_empty() {
                rules.push(Rule::new(nt, vec![nt_prime]));
            }
            for mut production in others {
                production.right.push(nt_prime);
                rules.push(production);
            }
            for production in recursive {
                let mut right: Vec<usize> = production.right[1..].to_vec();
                right.push(nt_prime);
                rules.push(Rule::new(nt_prime, right));
            }
            rules.push(Rule::new(nt_prime, Vec::new()));
            g.rules = rules;
        }

        g.sort_rules();
        g
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    fn rules(g: &Grammar) -> Vec<String> {
        g.to_production_output_vec().to_plaintext().lines().map(String::from).collect()
    }

    #[test]
    fn direct_recursion() {
        let g = Grammar::parse("E -> E plus T | T * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(
            rules(&g),
            vec!["E -> T E1 #", "E1 -> #", "E1 -> plus T E1 #"]
        );
    }

    #[test]
    fn indirect_recursion() {
        let g = Grammar::parse("A -> B a | c * B -> A b | d * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(
            rules(&g),
            vec![
                "A -> B a #",
                "A -> c #",
                "B -> c b B1 #",
                "B -> d B1 #",
                "B1 -> #",
                "B1 -> a b B1 #",
            ]
        );
    }

    #[test]
    fn processes_in_name_order() {
        // B is declared first but A is handled first, so B's rule gets A expanded.
        let g = Grammar::parse("B -> A x | y * A -> B z | w * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(
            rules(&g),
            vec![
                "A -> B z #",
                "A -> w #",
                "B -> w x B1 #",
                "B -> y B1 #",
                "B1 -> #",
                "B1 -> z x B1 #",
            ]
        );
    }

    #[test]
    fn epsilon_is_a_beta_rule() {
        let g = Grammar::parse("A -> A a | * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(rules(&g), vec!["A -> A1 #", "A1 -> #", "A1 -> a A1 #"]);
    }

    #[test]
    fn only_self_rule() {
        let g = Grammar::parse("S -> A s * A -> A * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(
            rules(&g),
            vec!["A -> A1 #", "A1 -> #", "A1 -> A1 #", "S -> A1 s #"]
        );
    }

    #[test]
    fn fresh_name_skips_existing_symbol() {
        let g = Grammar::parse("E -> E a | b * E1 -> c * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(
            rules(&g),
            vec!["E -> b E2 #", "E1 -> c #", "E2 -> #", "E2 -> a E2 #"]
        );
    }

    #[test]
    fn rule_less_non_terminal_is_not_substituted() {
        let mut g = Grammar::new();
        let a = g.add_non_terminal("A");
        let b = g.add_non_terminal("B");
        let x = g.add_terminal("x");
        g.add_production(b, vec![a, x]);
        g.start_symbol = Some(b);

        let eliminated = g.eliminate_left_recursion();
        let out = eliminated.to_production_output_vec();
        assert_eq!(out.productions().len(), 1);
        assert_eq!(out.productions()[0].left, "B");
        assert_eq!(out.productions()[0].right, vec!["A", "x"]);
    }

    #[test]
    fn recursion_free_grammar_is_only_sorted() {
        let g = Grammar::parse("S -> b A * A -> a | * #")
            .unwrap()
            .eliminate_left_recursion();
        assert_eq!(rules(&g), vec!["A -> #", "A -> a #", "S -> b A #"]);
    }
}
