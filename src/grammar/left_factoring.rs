use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use log::debug;

use super::{grammar::Rule, Grammar};

fn common_prefix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

impl Grammar {
    /// Longest prefix shared by two alternatives of `left`; ties go to the
    /// lexicographically smaller prefix.
    fn longest_common_prefix(&self, left: usize) -> Option<Vec<usize>> {
        let rights: Vec<&Vec<usize>> = self.productions_of(left).collect();
        let mut best: Option<&[usize]> = None;

        for (i, a) in rights.iter().enumerate() {
            for b in &rights[i + 1..] {
                let len = common_prefix_len(a, b);
                if len == 0 {
                    continue;
                }
                let candidate = &a[..len];
                let better = match best {
                    None => true,
                    Some(prev) => match len.cmp(&prev.len()) {
                        Ordering::Greater => true,
                        Ordering::Equal => {
                            self.compare_sequences(candidate, prev) == Ordering::Less
                        }
                        Ordering::Less => false,
                    },
                };
                if better {
                    best = Some(candidate);
                }
            }
        }

        best.map(|prefix| prefix.to_vec())
    }

    fn find_factorable(&self) -> Option<(usize, Vec<usize>)> {
        let mut visited = HashSet::new();
        self.rules
            .iter()
            .map(|r| r.left)
            .filter(|&left| visited.insert(left))
            .find_map(|left| self.longest_common_prefix(left).map(|p| (left, p)))
    }

    /// Returns a new grammar where no two alternatives of a non-terminal share a
    /// leading symbol. Rules are sorted.
    pub fn left_factor(&self) -> Grammar {
        let mut g = self.clone();
        let mut counters: HashMap<String, usize> = HashMap::new();

        // One rewrite per scan, so every scan sees the previous rewrite.
        while let Some((left, prefix)) = g.find_factorable() {
            let base = g.get_symbol_name(left).to_string();
            let fresh = g.add_fresh_non_terminal(&base, &mut counters);

            let (collected, mut rules): (Vec<Rule>, Vec<Rule>) = std::mem::take(&mut g.rules)
                .into_iter()
                .partition(|r| r.left == left && r.right.starts_with(&prefix));

            debug!(
                "left factoring {} rules of {} into {}",
                collected.len(),
                base,
                g.get_symbol_name(fresh)
            );

            let mut factored = prefix.clone();
            factored.push(fresh);
            rules.push(Rule::new(left, factored));
            rules.extend(
                collected
                    .into_iter()
                    .map(|r| Rule::new(fresh, r.right[prefix.len()..].to_vec())),
            );
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
    fn factors_simple_prefix() {
        let g = Grammar::parse("S -> a b | a c * #").unwrap().left_factor();
        assert_eq!(rules(&g), vec!["S -> a S1 #", "S1 -> b #", "S1 -> c #"]);
    }

    #[test]
    fn prefix_equal_to_alternative_gives_epsilon() {
        let g = Grammar::parse("S -> a | a b * #").unwrap().left_factor();
        assert_eq!(rules(&g), vec!["S -> a S1 #", "S1 -> #", "S1 -> b #"]);
    }

    #[test]
    fn longest_prefix_first_then_shorter() {
        let g = Grammar::parse("S -> a b c | a b d | a e | f * #")
            .unwrap()
            .left_factor();
        assert_eq!(
            rules(&g),
            vec![
                "S -> a S2 #",
                "S -> f #",
                "S1 -> c #",
                "S1 -> d #",
                "S2 -> b S1 #",
                "S2 -> e #",
            ]
        );
    }

    #[test]
    fn equal_length_prefixes_take_smallest_first() {
        let g = Grammar::parse("S -> b x | b y | a x | a y * #")
            .unwrap()
            .left_factor();
        assert_eq!(
            rules(&g),
            vec![
                "S -> a S1 #",
                "S -> b S2 #",
                "S1 -> x #",
                "S1 -> y #",
                "S2 -> x #",
                "S2 -> y #",
            ]
        );
    }

    #[test]
    fn fresh_name_skips_existing_symbols() {
        let g = Grammar::parse("S -> a b | a S1 * S1 -> c * #")
            .unwrap()
            .left_factor();
        assert_eq!(
            rules(&g),
            vec!["S -> a S2 #", "S1 -> c #", "S2 -> S1 #", "S2 -> b #"]
        );
    }

    #[test]
    fn is_idempotent() {
        let once = Grammar::parse("A -> x y z | x y | x w | q * B -> A r | A s | t * #")
            .unwrap()
            .left_factor();
        let twice = once.left_factor();
        assert_eq!(rules(&once), rules(&twice));
    }

    #[test]
    fn factored_grammar_is_unchanged() {
        let g = Grammar::parse("S -> b | a * #").unwrap().left_factor();
        assert_eq!(rules(&g), vec!["S -> a #", "S -> b #"]);
    }
}
