// src/parser/grammar.rs
//
// Tokens are dense integers: `0..num_terminals` are terminals, the rest up to
// `num_tokens` are nonterminals. Every rule reserves a contiguous block of item
// ids (see `items.rs`), so rules are numbered in the order they were added.

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: usize,
    pub rhs: Vec<usize>,
    /// Position in `Grammar::rules()`; what a REDUCE entry refers to.
    pub idx: usize,
    /// First item id owned by this rule.
    pub item_base: usize,
}

impl Rule {
    /// Item ids per lookahead: one per dot position.
    #[inline]
    pub fn stride(&self) -> usize {
        self.rhs.len() + 1
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    num_terminals: usize,
    num_tokens: usize,
    rules: Vec<Rule>,
    /// Rule indices per nonterminal, indexed by `token - num_terminals`.
    by_lhs: Vec<Vec<usize>>,
    num_items: usize,
}

impl Grammar {
    pub fn new(num_terminals: usize, num_tokens: usize) -> Self {
        let num_tokens = num_tokens.max(num_terminals);
        Self {
            num_terminals,
            num_tokens,
            rules: Vec::new(),
            by_lhs: vec![Vec::new(); num_tokens - num_terminals],
            num_items: 0,
        }
    }

    /// Appends `lhs -> rhs` and returns its rule index. `None` if `lhs` is not a
    /// nonterminal or `rhs` mentions a token outside the grammar.
    pub fn add_rule(&mut self, lhs: usize, rhs: &[usize]) -> Option<usize> {
        if !self.is_nonterminal(lhs) || rhs.iter().any(|&t| t >= self.num_tokens) {
            debug!(
                "[grammar] rejected rule {lhs} -> {rhs:?} (num_terminals={}, num_tokens={})",
                self.num_terminals, self.num_tokens
            );
            return None;
        }
        let idx = self.rules.len();
        let rule = Rule {
            lhs,
            rhs: rhs.to_vec(),
            idx,
            item_base: self.num_items,
        };
        self.num_items += rule.stride() * self.num_terminals;
        self.by_lhs[lhs - self.num_terminals].push(idx);
        self.rules.push(rule);
        Some(idx)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule indices whose lhs is `nonterminal`, in insertion order.
    pub fn productions(&self, nonterminal: usize) -> &[usize] {
        nonterminal
            .checked_sub(self.num_terminals)
            .and_then(|i| self.by_lhs.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[inline]
    pub fn num_terminals(&self) -> usize {
        self.num_terminals
    }

    #[inline]
    pub fn num_tokens(&self) -> usize {
        self.num_tokens
    }

    /// Size of the LR item space.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    #[inline]
    pub fn is_terminal(&self, token: usize) -> bool {
        token < self.num_terminals
    }

    #[inline]
    pub fn is_nonterminal(&self, token: usize) -> bool {
        (self.num_terminals..self.num_tokens).contains(&token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_blocks_are_contiguous() {
        let mut g = Grammar::new(3, 6);
        assert_eq!(g.add_rule(5, &[3, 2]), Some(0));
        assert_eq!(g.add_rule(4, &[1]), Some(1));
        assert_eq!(g.add_rule(4, &[]), Some(2));
        let r = g.rules();
        assert_eq!(r[0].item_base, 0);
        assert_eq!(r[1].item_base, 3 * 3);
        assert_eq!(r[2].item_base, 3 * 3 + 2 * 3);
        assert_eq!(g.num_items(), 9 + 6 + 3);
        assert_eq!(g.productions(4), &[1, 2]);
        assert!(g.productions(0).is_empty());
    }

    #[test]
    fn bad_rules_are_refused() {
        let mut g = Grammar::new(2, 4);
        assert_eq!(g.add_rule(1, &[0]), None, "terminal lhs");
        assert_eq!(g.add_rule(3, &[4]), None, "rhs out of range");
        assert!(g.rules().is_empty());
    }
}
