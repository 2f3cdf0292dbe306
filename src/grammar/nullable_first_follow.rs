use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use super::{error::GrammarError, Grammar};

pub type FirstTable = HashMap<usize, HashSet<usize>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowSet {
    pub terminals: HashSet<usize>,
    pub end_mark: bool,
}

impl FollowSet {
    fn extend(&mut self, other: &FollowSet) -> bool {
        let before = self.terminals.len();
        self.terminals.extend(other.terminals.iter().cloned());
        let grew_end_mark = other.end_mark && !self.end_mark;
        self.end_mark |= other.end_mark;
        grew_end_mark || self.terminals.len() != before
    }
}

pub type FollowTable = HashMap<usize, FollowSet>;

#[derive(Debug, Clone)]
pub struct NullableFirstFollow {
    pub nullable: HashSet<usize>,
    pub first: FirstTable,
    pub follow: FollowTable,
}

impl Grammar {
    pub fn calculate_nullable_first_follow(&self) -> Result<NullableFirstFollow, GrammarError> {
        let nullable = self.calculate_nullable();
        let first = self.calculate_first(&nullable);
        let follow = self.calculate_follow(&nullable, &first)?;
        Ok(NullableFirstFollow {
            nullable,
            first,
            follow,
        })
    }

    pub fn calculate_nullable(&self) -> HashSet<usize> {
        let mut nullable: HashSet<usize> = self
            .rules
            .iter()
            .filter(|r| r.is_epsilon())
            .map(|r| r.left)
            .collect();

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for rule in &self.rules {
                if nullable.contains(&rule.left) || rule.is_epsilon() {
                    continue;
                }
                // terminals are never in the set, so any terminal blocks this
                if rule.right.iter().all(|s| nullable.contains(s)) {
                    trace!("nullable: {}", self.get_symbol_name(rule.left));
                    nullable.insert(rule.left);
                    changed = true;
                }
            }
        }

        debug!("nullable set settled after {} passes", passes);
        nullable
    }

    /// FIRST of a symbol string, and whether the whole string is nullable.
    pub fn calculate_first_for_production(
        &self,
        production: &[usize],
        nullable: &HashSet<usize>,
        first: &FirstTable,
    ) -> (HashSet<usize>, bool) {
        let mut result: HashSet<usize> = HashSet::new();
        for idx in production {
            if let Some(f) = first.get(idx) {
                result.extend(f.iter().cloned());
            }
            if !nullable.contains(idx) {
                return (result, false);
            }
        }
        (result, true)
    }

    pub fn calculate_first(&self, nullable: &HashSet<usize>) -> FirstTable {
        let mut first: FirstTable = self
            .symbols
            .iter()
            .enumerate()
            .map(|(idx, symbol)| {
                let mut set = HashSet::new();
                if symbol.is_terminal() {
                    set.insert(idx);
                }
                (idx, set)
            })
            .collect();

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for rule in &self.rules {
                let (additions, _) =
                    self.calculate_first_for_production(&rule.right, nullable, &first);
                let set = first.entry(rule.left).or_default();
                let before = set.len();
                set.extend(additions);
                if set.len() != before {
                    changed = true;
                }
            }
        }

        debug!("FIRST sets settled after {} passes", passes);
        first
    }

    pub fn calculate_follow(
        &self,
        nullable: &HashSet<usize>,
        first: &FirstTable,
    ) -> Result<FollowTable, GrammarError> {
        let start = self.start_symbol()?;

        let mut follow: FollowTable = self
            .non_terminal_iter()
            .map(|idx| (idx, FollowSet::default()))
            .collect();
        follow.entry(start).or_default().end_mark = true;

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for rule in &self.rules {
                for (i, &symbol) in rule.right.iter().enumerate() {
                    if self.is_terminal(symbol) {
                        continue;
                    }
                    let beta = &rule.right[i + 1..];
                    let (terminals, beta_nullable) =
                        self.calculate_first_for_production(beta, nullable, first);

                    let mut addition = FollowSet {
                        terminals,
                        end_mark: false,
                    };
                    if beta_nullable {
                        if let Some(left_follow) = follow.get(&rule.left) {
                            addition.extend(left_follow);
                        }
                    }

                    if follow.entry(symbol).or_default().extend(&addition) {
                        changed = true;
                    }
                }
            }
        }

        debug!("FOLLOW sets settled after {} passes", passes);
        Ok(follow)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::Grammar;

    fn names(g: &Grammar, set: &HashSet<usize>) -> Vec<String> {
        let mut v: Vec<String> = set
            .iter()
            .map(|&i| g.get_symbol_name(i).to_string())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn nullable_is_a_fixed_point() {
        let g = Grammar::parse("S -> A B C * A -> B B * B -> C * C -> | c * #").unwrap();
        let nullable = g.calculate_nullable();
        assert_eq!(names(&g, &nullable), vec!["A", "B", "C", "S"]);

        for rule in &g.rules {
            if rule.right.iter().all(|s| nullable.contains(s)) {
                assert!(nullable.contains(&rule.left));
            }
        }
    }

    #[test]
    fn terminal_blocks_nullability() {
        let g = Grammar::parse("S -> A x * A -> * #").unwrap();
        let nullable = g.calculate_nullable();
        assert_eq!(names(&g, &nullable), vec!["A"]);
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = Grammar::parse("S -> a S b | * #").unwrap();
        let nullable = g.calculate_nullable();
        let first = g.calculate_first(&nullable);
        let a = g.get_symbol_index("a").unwrap();
        let b = g.get_symbol_index("b").unwrap();
        assert_eq!(first[&a], HashSet::from([a]));
        assert_eq!(first[&b], HashSet::from([b]));
        assert_eq!(names(&g, &first[&g.get_symbol_index("S").unwrap()]), vec!["a"]);
    }

    #[test]
    fn first_contains_only_terminals() {
        let g = Grammar::parse("E -> T X * X -> p T X | * T -> F Y * Y -> m F Y | * F -> l E r | i * #")
            .unwrap();
        let nullable = g.calculate_nullable();
        let first = g.calculate_first(&nullable);
        for set in first.values() {
            assert!(set.iter().all(|&s| g.is_terminal(s)));
        }
        let e = g.get_symbol_index("E").unwrap();
        assert_eq!(names(&g, &first[&e]), vec!["i", "l"]);
    }

    #[test]
    fn follow_propagates_through_nullable_suffix() {
        let g = Grammar::parse("E -> T X * X -> p T X | * T -> F Y * Y -> m F Y | * F -> l E r | i * #")
            .unwrap();
        let nff = g.calculate_nullable_first_follow().unwrap();
        let follow = |name: &str| nff.follow[&g.get_symbol_index(name).unwrap()].clone();

        assert!(follow("E").end_mark);
        assert_eq!(names(&g, &follow("E").terminals), vec!["r"]);
        assert!(follow("T").end_mark);
        assert_eq!(names(&g, &follow("T").terminals), vec!["p", "r"]);
        assert_eq!(names(&g, &follow("F").terminals), vec!["m", "p", "r"]);
        assert!(follow("Y").end_mark);
    }

    #[test]
    fn follow_without_start_symbol_fails() {
        let g = Grammar::parse("#").unwrap();
        let nullable = g.calculate_nullable();
        let first = g.calculate_first(&nullable);
        assert_eq!(
            g.calculate_follow(&nullable, &first).unwrap_err(),
            crate::GrammarError::NoStartSymbol
        );
    }
}
