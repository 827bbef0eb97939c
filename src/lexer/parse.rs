// src/lexer/parse.rs
// Recursive-descent regex parser producing Thompson fragments.
//
// Precedence, loosest first: `|`, concatenation, postfix quantifiers
// (`*`, `+`, `?`, `{m}`, `{m,}`, `{m,n}`, stackable), atoms.

use std::fmt;

use super::nfa::{Fragment, NUM_CHARS, Nfa, NodeId};

/// Largest interval bound accepted, as POSIX `RE_DUP_MAX`.
pub const RE_DUP_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexError {
    /// Byte offset into the pattern where the problem was detected.
    pub position: usize,
    pub message: String,
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.position, self.message)
    }
}

impl std::error::Error for RegexError {}

/// Compiles one pattern. The end node accepts rule 0.
pub fn parse(pattern: &[u8]) -> Result<Nfa, RegexError> {
    parse_rules(&[pattern])
}

/// Compiles several patterns into one NFA. Rule `i` accepts with `Some(i)`;
/// with more than one rule a shared start node fans out to each of them.
pub fn parse_rules(patterns: &[&[u8]]) -> Result<Nfa, RegexError> {
    let mut nfa = Nfa::new();
    let hub = (patterns.len() != 1).then(|| nfa.add_node());

    for (rule, pattern) in patterns.iter().enumerate() {
        let frag = Parser::new(pattern, &mut nfa).run()?;
        nfa.nodes[frag.end].accept = Some(rule as u32);
        match hub {
            Some(h) => nfa.add_epsilon(h, frag.start),
            None => nfa.start = frag.start,
        }
    }
    if let Some(h) = hub {
        nfa.start = h;
    }
    Ok(nfa)
}

struct Parser<'s, 'n> {
    src: &'s [u8],
    pos: usize,
    depth: usize,
    nfa: &'n mut Nfa,
}

impl<'s, 'n> Parser<'s, 'n> {
    fn new(src: &'s [u8], nfa: &'n mut Nfa) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            nfa,
        }
    }

    fn run(mut self) -> Result<Fragment, RegexError> {
        let frag = self.alternation()?;
        // `)` at depth 0 is rejected in `atom`, so the whole input is consumed here.
        debug_assert_eq!(self.pos, self.src.len());
        Ok(frag)
    }

    fn error(&self, position: usize, message: impl Into<String>) -> RegexError {
        RegexError {
            position,
            message: message.into(),
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    #[inline]
    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn alternation(&mut self) -> Result<Fragment, RegexError> {
        let mut frag = self.sequence()?;
        while self.eat(b'|') {
            let rhs = self.sequence()?;
            frag = self.nfa.alternate(frag, rhs);
        }
        Ok(frag)
    }

    fn sequence(&mut self) -> Result<Fragment, RegexError> {
        let mut acc: Option<Fragment> = None;
        while let Some(b) = self.peek() {
            if b == b'|' || (b == b')' && self.depth > 0) {
                break;
            }
            let f = self.quantified()?;
            acc = Some(match acc {
                Some(a) => self.nfa.concat(a, f),
                None => f,
            });
        }
        Ok(match acc {
            Some(f) => f,
            None => self.nfa.empty(),
        })
    }

    fn quantified(&mut self) -> Result<Fragment, RegexError> {
        let first = self.nfa.nodes.len();
        let mut frag = self.atom()?;
        loop {
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    frag = self.nfa.repeat(frag, true, true);
                }
                Some(b'+') => {
                    self.pos += 1;
                    frag = self.nfa.repeat(frag, false, true);
                }
                Some(b'?') => {
                    self.pos += 1;
                    frag = self.nfa.repeat(frag, true, false);
                }
                Some(b'{') => {
                    let (lo, hi) = self.interval()?;
                    frag = self.unroll(first, frag, lo, hi);
                }
                _ => break,
            }
        }
        Ok(frag)
    }

    fn atom(&mut self) -> Result<Fragment, RegexError> {
        let at = self.pos;
        let Some(b) = self.bump() else {
            return Err(self.error(at, "expected an atom"));
        };
        match b {
            b'(' => {
                self.depth += 1;
                let frag = self.alternation()?;
                self.depth -= 1;
                if !self.eat(b')') {
                    return Err(self.error(at, "unclosed group"));
                }
                Ok(frag)
            }
            b')' => Err(self.error(at, "unmatched ')'")),
            b']' => Err(self.error(at, "unmatched ']'")),
            b'*' | b'+' | b'?' | b'{' => Err(self.error(at, "quantifier has nothing to repeat")),
            b'[' => self.bracket(at),
            b'.' => {
                let mut set = [true; NUM_CHARS];
                set[b'\n' as usize] = false;
                Ok(self.nfa.add_set(&set))
            }
            b'\\' => {
                let byte = self.escape(at)?;
                Ok(self.byte(byte))
            }
            _ => Ok(self.byte(b)),
        }
    }

    fn byte(&mut self, b: u8) -> Fragment {
        let start = self.nfa.add_node();
        let end = self.nfa.add_node();
        self.nfa.add_byte(start, end, b);
        Fragment { start, end }
    }

    /// Decodes the escape whose backslash sits at `at`; `pos` is just past it.
    fn escape(&mut self, at: usize) -> Result<u8, RegexError> {
        let Some(b) = self.bump() else {
            return Err(self.error(at, "dangling escape"));
        };
        Ok(match b {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'0'..=b'7' => {
                let mut v = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            v = v * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                // \777 does not fit a byte; keep the low eight bits.
                v as u8
            }
            b'x' => {
                let mut v = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match self.peek().and_then(|d| char::from(d).to_digit(16)) {
                        Some(d) => {
                            v = v * 16 + d;
                            self.pos += 1;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    return Err(self.error(at, "\\x needs at least one hex digit"));
                }
                v as u8
            }
            other => other,
        })
    }

    /// If `src[i]` opens `:name:]`, `.name.]` or `=name=]`, returns the name and
    /// the offset just past the closing `]`.
    fn class_at(&self, i: usize) -> Option<(&'s [u8], usize)> {
        let src: &'s [u8] = self.src;
        let delim = *src.get(i)?;
        if !matches!(delim, b':' | b'.' | b'=') {
            return None;
        }
        let len = src[i + 1..]
            .iter()
            .take_while(|b| b.is_ascii_alphabetic())
            .count();
        let close = i + 1 + len;
        if len == 0 || src.get(close) != Some(&delim) || src.get(close + 1) != Some(&b']') {
            return None;
        }
        Some((&src[i + 1..close], close + 2))
    }

    fn class(&self, at: usize, name: &[u8]) -> Result<[bool; NUM_CHARS], RegexError> {
        class_members(name).ok_or_else(|| {
            self.error(
                at,
                format!("unknown character class '{}'", String::from_utf8_lossy(name)),
            )
        })
    }

    /// `[` at `at` has been consumed.
    fn bracket(&mut self, at: usize) -> Result<Fragment, RegexError> {
        if let Some((name, end)) = self.class_at(self.pos) {
            let set = self.class(at, name)?;
            self.pos = end;
            return Ok(self.nfa.add_set(&set));
        }

        let negate = self.eat(b'^');
        let mut set = [false; NUM_CHARS];
        let mut first = true;
        loop {
            let item = self.pos;
            let Some(b) = self.bump() else {
                return Err(self.error(at, "unterminated bracket expression"));
            };
            if b == b']' && !first {
                break;
            }
            first = false;

            let lo = match b {
                b'[' => match self.class_at(self.pos) {
                    Some((name, end)) => {
                        for (slot, on) in set.iter_mut().zip(self.class(item, name)?) {
                            *slot |= on;
                        }
                        self.pos = end;
                        continue;
                    }
                    None => b'[',
                },
                b'\\' => self.escape(item)?,
                _ => b,
            };

            let is_range = self.peek() == Some(b'-')
                && self.src.get(self.pos + 1).is_some_and(|&c| c != b']');
            if !is_range {
                set[lo as usize] = true;
                continue;
            }
            self.pos += 1;
            let hi_at = self.pos;
            let hi = match self.bump() {
                Some(b'\\') => self.escape(hi_at)?,
                Some(c) => c,
                None => return Err(self.error(at, "unterminated bracket expression")),
            };
            if lo > hi {
                return Err(self.error(item, "range endpoints out of order"));
            }
            for c in lo..=hi {
                set[c as usize] = true;
            }
        }

        if negate {
            for (i, on) in set.iter_mut().enumerate() {
                *on = !*on && i != b'\n' as usize;
            }
        }
        Ok(self.nfa.add_set(&set))
    }

    fn number(&mut self) -> Option<usize> {
        let digits = self.src[self.pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        let n = self.src[self.pos..self.pos + digits]
            .iter()
            .fold(0usize, |acc, d| {
                acc.saturating_mul(10).saturating_add(usize::from(d - b'0'))
            });
        self.pos += digits;
        Some(n)
    }

    /// Parses `{m}`, `{m,}` or `{m,n}` starting at the `{`.
    fn interval(&mut self) -> Result<(usize, Option<usize>), RegexError> {
        let at = self.pos;
        self.pos += 1;
        let lo = self
            .number()
            .ok_or_else(|| self.error(at, "interval needs a lower bound"))?;
        let hi = if self.eat(b',') {
            if self.peek() == Some(b'}') {
                None
            } else {
                let hi = self
                    .number()
                    .ok_or_else(|| self.error(at, "malformed interval upper bound"))?;
                Some(hi)
            }
        } else {
            Some(lo)
        };
        if !self.eat(b'}') {
            return Err(self.error(at, "unterminated interval"));
        }
        if hi.is_some_and(|hi| hi < lo) {
            return Err(self.error(at, "interval bounds out of order"));
        }
        if lo.max(hi.unwrap_or(0)) > RE_DUP_MAX {
            return Err(self.error(at, format!("interval bound exceeds {RE_DUP_MAX}")));
        }
        Ok((lo, hi))
    }

    /// Expands `frag{lo,hi}`. `frag` occupies the nodes `first..` and is not yet
    /// linked to anything outside them, so it can be copied wholesale.
    fn unroll(&mut self, first: NodeId, frag: Fragment, lo: usize, hi: Option<usize>) -> Fragment {
        let copies = hi.unwrap_or(lo.max(1));
        let span = first..self.nfa.nodes.len();
        let mut pieces = Vec::with_capacity(copies);
        if copies > 0 {
            pieces.push(frag);
        }
        for _ in 1..copies {
            pieces.push(self.nfa.duplicate(span.clone(), frag));
        }

        let start = self.nfa.add_node();
        let end = self.nfa.add_node();
        let mut at = start;
        for p in &pieces[..lo] {
            self.nfa.add_epsilon(at, p.start);
            at = p.end;
        }

        match hi {
            None => {
                let last = pieces[copies - 1];
                if lo == 0 {
                    self.nfa.add_epsilon(start, last.start);
                    self.nfa.add_epsilon(start, end);
                }
                let hub = self.nfa.add_node();
                self.nfa.add_epsilon(last.end, hub);
                self.nfa.add_epsilon(hub, last.start);
                self.nfa.add_epsilon(hub, end);
            }
            Some(_) => {
                // Optional tail: every junction may jump straight to the end.
                for p in &pieces[lo..] {
                    self.nfa.add_epsilon(at, p.start);
                    self.nfa.add_epsilon(at, end);
                    at = p.end;
                }
                self.nfa.add_epsilon(at, end);
            }
        }
        Fragment { start, end }
    }
}

/// Members of a POSIX class in the "C" locale, or `None` for an unknown name.
pub fn class_members(name: &[u8]) -> Option<[bool; NUM_CHARS]> {
    let pred: fn(u8) -> bool = match name {
        b"alnum" => |c| c.is_ascii_alphanumeric(),
        b"alpha" => |c| c.is_ascii_alphabetic(),
        b"blank" => |c| c == b' ' || c == b'\t',
        b"cntrl" => |c| c.is_ascii_control(),
        b"digit" => |c| c.is_ascii_digit(),
        b"graph" => |c| c.is_ascii_graphic(),
        b"lower" => |c| c.is_ascii_lowercase(),
        b"print" => |c| c.is_ascii_graphic() || c == b' ',
        b"punct" => |c| c.is_ascii_punctuation(),
        b"space" => |c| matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c),
        b"upper" => |c| c.is_ascii_uppercase(),
        b"xdigit" => |c| c.is_ascii_hexdigit(),
        _ => return None,
    };
    let mut set = [false; NUM_CHARS];
    for (i, slot) in set.iter_mut().enumerate() {
        *slot = pred(i as u8);
    }
    Some(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(p: &str) -> RegexError {
        parse(p.as_bytes()).expect_err(p)
    }

    #[test]
    fn accept_marks_exactly_one_node_per_rule() {
        let rules: [&[u8]; 3] = [b"ab", b"a|c", b""];
        let nfa = parse_rules(&rules).unwrap();
        let mut rules: Vec<u32> = nfa.nodes.iter().filter_map(|n| n.accept).collect();
        rules.sort();
        assert_eq!(rules, vec![0, 1, 2]);
        assert_eq!(nfa.nodes[nfa.start].epsilon.len(), 3);
    }

    #[test]
    fn escapes_decode_to_bytes() {
        let one = |p: &str| {
            let nfa = parse(p.as_bytes()).unwrap();
            let edge = nfa.nodes.iter().flat_map(|n| &n.transitions).next();
            edge.map(|&(b, _)| b)
        };
        assert_eq!(one("\\n"), Some(b'\n'));
        assert_eq!(one("\\v"), Some(0x0b));
        assert_eq!(one("\\101"), Some(b'A'));
        assert_eq!(one("\\777"), Some(0xff));
        assert_eq!(one("\\x41"), Some(b'A'));
        assert_eq!(one("\\x4g"), Some(4));
        assert_eq!(one("\\*"), Some(b'*'));
    }

    #[test]
    fn error_positions_point_at_the_culprit() {
        assert_eq!(err("ab)").position, 2);
        assert_eq!(err("a(b").position, 1);
        assert_eq!(err("ab\\").position, 2);
        assert_eq!(err("x[[:nope:]]").position, 2);
        assert_eq!(err("a{3,1}").position, 1);
        assert!(err("\\xz").message.contains("hex"));
    }

    #[test]
    fn classes_follow_c_locale() {
        let alnum = class_members(b"alnum").unwrap();
        assert!(alnum[b'6' as usize] && alnum[b'z' as usize] && !alnum[b'_' as usize]);
        let space = class_members(b"space").unwrap();
        assert!(space[0x0b] && space[b'\n' as usize] && !space[b'x' as usize]);
        assert!(class_members(b"word").is_none());
    }
}
