//! Ordered pattern → replacement rules over protected-region-guarded text.
//!
//! Every rule makes exactly one forward pass over its input and writes a new
//! buffer. A declined match is copied through verbatim and the scan moves
//! past it, so no rule can keep re-matching its own output.

use regex::{Captures, Regex};

use super::guard;
use super::region::{ProtectedSpan, scan, trailing_comment};

/// One match of a rule, together with the text around it.
pub struct Site<'t> {
    pub caps: Captures<'t>,
    pub before: &'t str,
    pub after: &'t str,
}

impl<'t> Site<'t> {
    /// Capture group `i`, or `""` if it did not participate.
    pub fn get(&self, i: usize) -> &'t str {
        self.caps.get(i).map_or("", |m| m.as_str())
    }

    pub fn matched(&self) -> &'t str {
        self.get(0)
    }
}

/// What a rule puts in place of its match.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub text: String,
    /// Provenance note appended to the line, e.g. `converted from #define`.
    pub note: Option<&'static str>,
    /// Identifier declared by the replacement.
    pub binds: Option<String>,
}

impl Rewrite {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: None,
            binds: None,
        }
    }

    pub fn note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }

    pub fn binds(mut self, name: impl Into<String>) -> Self {
        self.binds = Some(name.into());
        self
    }
}

/// Turns a match into a replacement; `None` leaves the match untouched.
pub type Build<C> = fn(&Site<'_>, &C) -> Option<Rewrite>;

pub struct Rule<C> {
    name: &'static str,
    pattern: Regex,
    build: Build<C>,
}

impl<C> Rule<C> {
    /// Compiles `pattern`. Rule patterns are constants, so a bad one is a bug.
    pub fn new(name: &'static str, pattern: &str, build: Build<C>) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid pattern for rule `{name}`: {e}"));
        Self {
            name,
            pattern,
            build,
        }
    }

    /// Single forward pass over `text`. Matches rejected by `admit(start, end)`
    /// or declined by the build function are left as they are.
    fn rewrite_where<A>(&self, text: &str, ctx: &C, edit: &mut Edit, admit: A) -> String
    where
        A: Fn(usize, usize) -> bool,
    {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            let (start, end) = (m.start(), m.end());
            if !admit(start, end) {
                continue;
            }

            let site = Site {
                caps,
                before: &text[..start],
                after: &text[end..],
            };
            let Some(rewrite) = (self.build)(&site, ctx) else {
                continue;
            };

            log::trace!("rule `{}` rewrote `{}`", self.name, site.matched());
            out.push_str(&text[cursor..start]);
            out.push_str(&edit.absorb(rewrite));
            cursor = end;
        }

        out.push_str(&text[cursor..]);
        out
    }
}

/// How a rule set keeps its rules away from literals and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Rules see only the gaps between protected spans.
    Gaps,
    /// Rules see the whole line; a match must start outside every span, stay
    /// clear of comments and swallow any string literal it touches whole.
    Anchored,
    /// Whole-line rules, first match wins; trailing comments are set aside
    /// while matching.
    Directive,
}

fn admissible(spans: &[ProtectedSpan], start: usize, end: usize) -> bool {
    spans.iter().all(|s| {
        if s.contains(start) {
            return false;
        }
        if !s.intersects(start, end) {
            return true;
        }
        !s.kind.is_comment() && start <= s.start && s.end() <= end
    })
}

pub struct RuleSet<C> {
    guard: Guard,
    rules: Vec<Rule<C>>,
}

impl<C> RuleSet<C> {
    pub fn new(guard: Guard, rules: Vec<Rule<C>>) -> Self {
        Self { guard, rules }
    }

    pub fn rewrite_line(&self, line: &str, ctx: &C) -> Edit {
        let mut edit = Edit::default();

        let text = match self.guard {
            Guard::Gaps => {
                let spans = scan(line);
                guard::apply(line, &spans, |gap| {
                    self.rules.iter().fold(gap.to_string(), |text, rule| {
                        rule.rewrite_where(&text, ctx, &mut edit, |_, _| true)
                    })
                })
            }
            Guard::Anchored => {
                let mut text = line.to_string();
                for rule in &self.rules {
                    let spans = scan(&text);
                    text = rule.rewrite_where(&text, ctx, &mut edit, |start, end| {
                        admissible(&spans, start, end)
                    });
                }
                text
            }
            Guard::Directive => self.first_match(line, ctx, &mut edit),
        };

        edit.text = text;
        edit
    }

    fn first_match(&self, line: &str, ctx: &C, edit: &mut Edit) -> String {
        let spans = scan(line);
        let (code, comment) = line.split_at(trailing_comment(line, &spans).unwrap_or(line.len()));
        let code = code.trim_end();

        for rule in &self.rules {
            let fired = edit.fired;
            let text = rule.rewrite_where(code, ctx, edit, |_, _| true);
            if edit.fired > fired {
                return if comment.is_empty() {
                    text
                } else {
                    format!("{text} {comment}")
                };
            }
        }

        line.to_string()
    }
}

/// The rewritten line plus what the rules reported while producing it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Edit {
    pub text: String,
    pub notes: Vec<&'static str>,
    pub bindings: Vec<String>,
    pub fired: usize,
}

impl Edit {
    fn absorb(&mut self, rewrite: Rewrite) -> String {
        self.fired += 1;
        if let Some(note) = rewrite.note {
            if !self.notes.contains(&note) {
                self.notes.push(note);
            }
        }
        if let Some(name) = rewrite.binds {
            self.bindings.push(name);
        }
        rewrite.text
    }

    pub fn changed(&self) -> bool {
        self.fired > 0
    }

    /// Final text, with the provenance notes appended as a line comment.
    pub fn render(self, provenance: bool) -> String {
        if !provenance || self.notes.is_empty() {
            return self.text;
        }
        format!("{} // {}", self.text, self.notes.join("; "))
    }
}
