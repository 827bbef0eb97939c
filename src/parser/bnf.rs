// src/parser/bnf.rs
// BNF text -> numbered Grammar, via the `bnf` crate.
//
// Numbering: quoted terminals by first appearance, then the end marker `$`,
// then nonterminals by first appearance, then the augmented start. `""` is ε.

use hashbrown::HashMap;
use log::debug;

use super::grammar::Grammar;

pub const EOF_NAME: &str = "$";

#[derive(Debug, Clone)]
pub struct LoadedGrammar {
    pub grammar: Grammar,
    /// Augmented start token, ready for `Grammar::compile`.
    pub start: usize,
    /// End marker terminal.
    pub eof: usize,
    /// Display name per token id.
    pub names: Vec<String>,
}

impl LoadedGrammar {
    pub fn token(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Maps terminal names to ids; `Err` names the first unknown one.
    pub fn terminals<'a, I>(&self, words: I) -> Result<Vec<usize>, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let nt = self.grammar.num_terminals();
        words
            .into_iter()
            .map(|w| {
                self.names[..nt]
                    .iter()
                    .position(|n| n == w)
                    .ok_or_else(|| format!("unknown terminal {w:?}"))
            })
            .collect()
    }
}

enum Sym<'a> {
    T(&'a str),
    N(&'a str),
}

fn sym(term: &bnf::Term) -> Sym<'_> {
    match term {
        bnf::Term::Terminal(s) => Sym::T(s),
        bnf::Term::Nonterminal(s) => Sym::N(s),
    }
}

/// Loads `text`; `start` defaults to the lhs of the first production.
pub fn load(text: &str, start: Option<&str>) -> Result<LoadedGrammar, String> {
    let parsed: bnf::Grammar = text
        .parse()
        .map_err(|e| format!("Failed to parse BNF: {e}"))?;

    let mut terminals: Vec<&str> = Vec::new();
    let mut nonterminals: Vec<&str> = Vec::new();
    let mut t_ids: HashMap<&str, usize> = HashMap::new();
    let mut n_ids: HashMap<&str, usize> = HashMap::new();

    for prod in parsed.productions_iter() {
        let rhs_terms = prod.rhs_iter().flat_map(|e| e.terms_iter());
        for s in std::iter::once(&prod.lhs).chain(rhs_terms).map(sym) {
            match s {
                Sym::T("") => {}
                Sym::T(name) => {
                    if !t_ids.contains_key(name) {
                        t_ids.insert(name, terminals.len());
                        terminals.push(name);
                    }
                }
                Sym::N(name) => {
                    if !n_ids.contains_key(name) {
                        n_ids.insert(name, nonterminals.len());
                        nonterminals.push(name);
                    }
                }
            }
        }
    }

    if nonterminals.is_empty() {
        return Err("grammar has no productions".into());
    }
    if t_ids.contains_key(EOF_NAME) {
        return Err(format!("terminal {EOF_NAME:?} is reserved for the end marker"));
    }
    let start_name = match start {
        Some(name) => name,
        None => nonterminals[0],
    };
    let user_start = *n_ids
        .get(start_name)
        .ok_or_else(|| format!("start symbol <{start_name}> has no productions"))?;

    let eof = terminals.len();
    let num_terminals = eof + 1;
    let nonterminal = |i: usize| num_terminals + i;
    let aug = nonterminal(nonterminals.len());
    let num_tokens = aug + 1;

    let mut grammar = Grammar::new(num_terminals, num_tokens);
    grammar
        .add_rule(aug, &[nonterminal(user_start), eof])
        .ok_or("augmented start rule rejected")?;

    for prod in parsed.productions_iter() {
        let Sym::N(lhs_name) = sym(&prod.lhs) else {
            return Err("production lhs must be a nonterminal".into());
        };
        let lhs = nonterminal(n_ids[lhs_name]);
        for expr in prod.rhs_iter() {
            let rhs: Vec<usize> = expr
                .terms_iter()
                .filter_map(|term| match sym(term) {
                    Sym::T("") => None,
                    Sym::T(name) => Some(t_ids[name]),
                    Sym::N(name) => Some(nonterminal(n_ids[name])),
                })
                .collect();
            grammar
                .add_rule(lhs, &rhs)
                .ok_or_else(|| format!("rule for <{lhs_name}> rejected"))?;
        }
    }

    let mut names: Vec<String> = terminals.iter().map(|s| s.to_string()).collect();
    names.push(EOF_NAME.to_string());
    names.extend(nonterminals.iter().map(|s| s.to_string()));
    names.push(format!("{start_name}'"));

    debug!(
        "[bnf] {} terminals, {} nonterminals, {} rules",
        num_terminals,
        nonterminals.len() + 1,
        grammar.rules().len()
    );
    Ok(LoadedGrammar {
        grammar,
        start: aug,
        eof,
        names,
    })
}
