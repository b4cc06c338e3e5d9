//! C strings → `std::string`.
//!
//! Two passes over the file. The declaration pass rewrites
//! `char name[] = "…"` and `char *name = "…"` and records `name` in a
//! [`SymbolContext`]; the operation pass then rewrites `strcpy`/`strcmp`
//! calls, but only those that involve a recorded name.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::Converter;
use crate::config::{Pass, Style};
use crate::engine::text::{ensure_include, map_lines, retire_header};
use crate::engine::{Guard, Rewrite, Rule, RuleSet, Site};

const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";
const LITERAL: &str = r#""(?:[^"\\]|\\.)*""#;

/// Identifiers that now hold a `std::string`, for one file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SymbolContext {
    converted: BTreeSet<String>,
}

impl SymbolContext {
    pub fn register(&mut self, name: impl Into<String>) {
        self.converted.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converted.contains(name)
    }

    pub fn len(&self) -> usize {
        self.converted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converted.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.converted.iter().map(String::as_str)
    }
}

static DECLARATIONS: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::new(
        Guard::Anchored,
        vec![
            Rule::new(
                "char-array",
                &format!(
                    r"\b(?:const\s+)?char\s+({IDENT})\s*\[\s*(?:\d+|{IDENT})?\s*\]\s*=\s*({LITERAL})(?:\s*;)?"
                ),
                char_array,
            ),
            Rule::new(
                "char-pointer",
                &format!(r"\b(?:const\s+)?char\s*\*\s*({IDENT})\s*=\s*({LITERAL})(?:\s*;)?"),
                char_pointer,
            ),
        ],
    )
});

static OPERATIONS: LazyLock<RuleSet<SymbolContext>> = LazyLock::new(|| {
    RuleSet::new(
        Guard::Anchored,
        vec![
            Rule::new(
                "strcpy",
                &format!(r"\bstrcpy\s*\(\s*({IDENT})\s*,\s*([^()]+?)\s*\)"),
                strcpy,
            ),
            Rule::new(
                "strcmp",
                r"\bstrcmp\s*\(\s*([^,()]+?)\s*,\s*([^()]+?)\s*\)(?:\s*(==|!=|<=|>=|<|>)\s*0\b)?",
                strcmp,
            ),
        ],
    )
});

/// `constexpr const char* X = "…"` comes from the define pass and stays.
fn after_constexpr(site: &Site<'_>) -> bool {
    site.before.trim_end().ends_with("constexpr")
}

fn char_array(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if after_constexpr(site) {
        return None;
    }
    let name = site.get(1);
    Some(
        Rewrite::new(format!("std::string {name} = {};", site.get(2)))
            .note("converted from char array")
            .binds(name),
    )
}

fn char_pointer(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if after_constexpr(site) {
        return None;
    }
    let name = site.get(1);
    Some(
        Rewrite::new(format!("std::string {name} = {};", site.get(2)))
            .note("converted from char*")
            .binds(name),
    )
}

fn strcpy(site: &Site<'_>, symbols: &SymbolContext) -> Option<Rewrite> {
    let dest = site.get(1);
    if !symbols.contains(dest) {
        return None;
    }
    Some(Rewrite::new(format!("{dest} = {}", site.get(2))).note("converted from strcpy"))
}

fn strcmp(site: &Site<'_>, symbols: &SymbolContext) -> Option<Rewrite> {
    let (a, b) = (site.get(1).trim(), site.get(2).trim());
    if !symbols.contains(a) && !symbols.contains(b) {
        return None;
    }

    let op = match site.get(3) {
        "" => comparison_operator(site.before, site.after).unwrap_or_else(|| {
            log::debug!("no comparison context for `{}`, assuming ==", site.matched());
            "=="
        }),
        explicit => explicit,
    };
    Some(Rewrite::new(format!("({a} {op} {b})")).note("converted from strcmp"))
}

/// Guesses which comparison a bare `strcmp(...)` stood for from the text
/// around it: the text before the call is checked first, then the text
/// after it.
pub fn comparison_operator(before: &str, after: &str) -> Option<&'static str> {
    const BEFORE: &[(&str, &str)] = &[
        ("== 0", "=="),
        ("!= 0", "=="),
        ("< 0", "<"),
        ("> 0", ">"),
        ("<=", "<="),
        (">=", ">="),
    ];
    const AFTER: &[(&str, &str)] = &[("== 0", "=="), ("!= 0", "!="), ("< 0", "<"), ("> 0", ">")];

    let sniff = |text: &str, table: &[(&str, &'static str)]| {
        table
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|&(_, op)| op)
    };
    sniff(before, BEFORE).or_else(|| sniff(after, AFTER))
}

#[derive(Debug, Default)]
pub struct StringConverter {
    style: Style,
}

impl StringConverter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    /// First pass: rewrites string declarations and returns the names it
    /// converted.
    pub fn declarations(&self, content: &str) -> (String, SymbolContext) {
        let mut symbols = SymbolContext::default();
        let out = map_lines(content, |line| {
            let mut edit = DECLARATIONS.rewrite_line(line, &());
            for name in edit.bindings.drain(..) {
                symbols.register(name);
            }
            edit.render(self.style.provenance)
        });
        log::debug!("string pass registered {} identifier(s)", symbols.len());
        (out, symbols)
    }

    /// Second pass: rewrites `strcpy`/`strcmp` calls on registered names.
    pub fn operations(&self, content: &str, symbols: &SymbolContext) -> String {
        map_lines(content, |line| {
            OPERATIONS
                .rewrite_line(line, symbols)
                .render(self.style.provenance)
        })
    }
}

impl Converter for StringConverter {
    fn pass(&self) -> Pass {
        Pass::String
    }

    fn transpile_file(&self, content: &str) -> String {
        let (declared, symbols) = self.declarations(content);
        let out = self.operations(&declared, &symbols);

        let changed = !symbols.is_empty() || out != map_lines(content, str::to_string);
        if self.style.headers.wants_header(changed) {
            let out = ensure_include(&out, "string");
            retire_header(&out, "string.h", "string")
        } else {
            out
        }
    }
}
