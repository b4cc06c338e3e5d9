//! C arrays with a constant size → `std::array<T, N>`.
//!
//! Rule families, in the order they run over each gap of a line:
//!
//!   1. `T name[] = {…}`      size counted from the initializer
//!   2. `T name[N] = {…}`     size copied
//!   3. `T a[N], b[M];`       one declaration per name
//!   4. `T name[N]`           anything left, e.g. parameters and pointer arrays
//!
//! A declaration must open a statement or a parameter, so `x * v[i]` is
//! left as the expression it is. Family 4 never touches text that already
//! follows a `std::array`, which keeps the pass idempotent.

use std::sync::LazyLock;

use regex::Regex;

use super::Converter;
use crate::config::{Pass, Style};
use crate::engine::text::{ensure_include, map_lines};
use crate::engine::{Guard, Rewrite, Rule, RuleSet, Site};

const FROM_ARRAY: &str = "converted from C array";
const MARKER: &str = "std::array";

/// Element type: optional qualifiers plus one identifier.
const TYPE: &str = r"(?:(?:const|unsigned|signed|long|short|struct|enum|union)\s+)*[A-Za-z_][A-Za-z0-9_]*";
const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";
const SIZE: &str = r"[A-Za-z_][A-Za-z0-9_]*|\d+";

/// Words that can sit where a type would, e.g. `return buf[3];`.
const NOT_TYPES: &[&str] = &["return", "else", "case", "goto", "sizeof", "do", "typedef"];

/// Words allowed directly before the element type.
const STORAGE: &[&str] = &["static", "extern", "register", "volatile", "typedef", "inline"];

static DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"({IDENT})\s*\[\s*({SIZE})\s*\]")).expect("valid declarator pattern")
});

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    let head = format!(r"\b({TYPE}(?:\s+|\s*\*\s*))({IDENT})");
    RuleSet::new(
        Guard::Gaps,
        vec![
            Rule::new(
                "auto-sized",
                &format!(r"{head}\s*\[\s*\]\s*=\s*(\{{[^}}]*\}})(?:\s*;)?"),
                auto_sized,
            ),
            Rule::new(
                "sized-init",
                &format!(r"{head}\s*\[\s*({SIZE})\s*\]\s*=\s*(\{{[^}}]*\}})(?:\s*;)?"),
                sized_init,
            ),
            Rule::new(
                "multi",
                &format!(
                    r"\b({TYPE})\s+({IDENT}\s*\[\s*(?:{SIZE})\s*\](?:\s*,\s*{IDENT}\s*\[\s*(?:{SIZE})\s*\])*)\s*;"
                ),
                multi,
            ),
            Rule::new(
                "sized",
                &format!(r"{head}\s*\[\s*({SIZE})\s*\]"),
                sized,
            ),
        ],
    )
});

/// Normalises the captured type, or `None` if it is really a keyword.
fn element_type(raw: &str) -> Option<String> {
    if raw.split_whitespace().any(|w| NOT_TYPES.contains(&w.trim_matches('*'))) {
        return None;
    }
    let ty = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Some(ty.replace(" *", "*"))
}

/// True when a declaration may start right after `before`: at the start of
/// the text, after `(`, `,`, `;`, `{` or `}`, or after a storage keyword.
fn opens_declaration(before: &str) -> bool {
    let before = before.trim_end();
    match before.chars().last() {
        None | Some('(' | ',' | ';' | '{' | '}') => true,
        Some(_) => {
            let word = before
                .rsplit(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .next()
                .unwrap_or("");
            STORAGE.contains(&word)
        }
    }
}

/// Elements in a brace initializer: commas outside parentheses, plus one.
/// Nested braces are not looked into.
pub fn count_elements(init: &str) -> usize {
    let inner = init.trim();
    let inner = inner.strip_prefix('{').unwrap_or(inner);
    let inner = inner.strip_suffix('}').unwrap_or(inner);
    if inner.trim().is_empty() {
        return 0;
    }

    let mut depth = 0usize;
    let mut commas = 0;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => commas += 1,
            _ => {}
        }
    }
    commas + 1
}

fn declaration(ty: &str, size: impl std::fmt::Display, name: &str) -> String {
    format!("{MARKER}<{ty}, {size}> {name}")
}

fn auto_sized(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if !opens_declaration(site.before) {
        return None;
    }
    let ty = element_type(site.get(1))?;
    let init = site.get(3);
    let decl = declaration(&ty, count_elements(init), site.get(2));
    Some(Rewrite::new(format!("{decl} = {init};")).note(FROM_ARRAY))
}

fn sized_init(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if !opens_declaration(site.before) {
        return None;
    }
    let ty = element_type(site.get(1))?;
    let decl = declaration(&ty, site.get(3), site.get(2));
    Some(Rewrite::new(format!("{decl} = {};", site.get(4))).note(FROM_ARRAY))
}

fn multi(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if !opens_declaration(site.before) {
        return None;
    }
    let ty = element_type(site.get(1))?;
    let decls = DECL_RE
        .captures_iter(site.get(2))
        .map(|c| format!("{};", declaration(&ty, &c[2], &c[1])))
        .collect::<Vec<_>>();
    Some(Rewrite::new(decls.join(" ")).note(FROM_ARRAY))
}

fn sized(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    if site.before.contains(MARKER) || !opens_declaration(site.before) {
        return None;
    }
    // `char s[8] = "…"` belongs to the string pass
    let after = site.after.trim_start();
    if after.starts_with('=') && !after.starts_with("==") {
        return None;
    }
    let ty = element_type(site.get(1))?;
    Some(Rewrite::new(declaration(&ty, site.get(3), site.get(2))).note(FROM_ARRAY))
}

#[derive(Debug, Default)]
pub struct ArrayConverter {
    style: Style,
}

impl ArrayConverter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Converter for ArrayConverter {
    fn pass(&self) -> Pass {
        Pass::Array
    }

    fn transpile_file(&self, content: &str) -> String {
        let mut changed = false;
        let out = map_lines(content, |line| {
            let edit = RULES.rewrite_line(line, &());
            changed |= edit.changed();
            edit.render(self.style.provenance)
        });

        if self.style.headers.wants_header(changed) {
            ensure_include(&out, "array")
        } else {
            out
        }
    }
}
