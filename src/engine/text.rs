//! Whole-file helpers shared by the converters: the per-line driver and
//! `#include` bookkeeping.

use std::sync::LazyLock;

use regex::Regex;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"][^>"\n]*[>"]"#).expect("valid include pattern")
});

/// Runs `f` over every line and joins the results, each followed by `\n`.
///
/// A missing final newline in the input is added, and `\r\n` endings come
/// out as `\n`.
pub fn map_lines<F>(content: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(content.len() + content.len() / 8);
    for line in content.lines() {
        out.push_str(&f(line));
        out.push('\n');
    }
    out
}

/// Adds `#include <header>` after the first include directive, or at the
/// top of the file when there is none. No-op if it is already included.
pub fn ensure_include(content: &str, header: &str) -> String {
    let directive = format!("#include <{header}>");
    if content.lines().any(|l| l.trim() == directive) {
        return content.to_string();
    }

    match INCLUDE_RE.find(content) {
        Some(first) => {
            let mut out = String::with_capacity(content.len() + directive.len() + 1);
            out.push_str(&content[..first.end()]);
            out.push('\n');
            out.push_str(&directive);
            out.push_str(&content[first.end()..]);
            out
        }
        None => format!("{directive}\n{content}"),
    }
}

/// Comments out `#include <legacy>` lines, pointing at `replacement`.
pub fn retire_header(content: &str, legacy: &str, replacement: &str) -> String {
    let pattern = format!(
        r"(?m)^([ \t]*)#[ \t]*include[ \t]*<{}>",
        regex::escape(legacy)
    );
    // `legacy` is escaped, so the pattern is always valid
    let Ok(re) = Regex::new(&pattern) else {
        return content.to_string();
    };
    re.replace_all(content, |caps: &regex::Captures<'_>| {
        format!("{}// #include <{legacy}> // replaced by <{replacement}>", &caps[1])
    })
    .into_owned()
}
