//! Span-guarded rewriting: only the gaps between protected spans are
//! handed to the rewrite function; the spans themselves are copied through.

use super::region::ProtectedSpan;

/// Rewrites every unprotected gap of `line` with `rewrite`.
///
/// `spans` must be sorted and disjoint, which is what [`super::region::scan`]
/// returns. Empty gaps are not passed to `rewrite`.
pub fn apply<F>(line: &str, spans: &[ProtectedSpan], mut rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(line.len());
    let mut last = 0;

    for span in spans {
        if span.start > last {
            out.push_str(&rewrite(&line[last..span.start]));
        }
        out.push_str(&line[span.start..span.end()]);
        last = span.end();
    }

    if last < line.len() {
        out.push_str(&rewrite(&line[last..]));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::region::scan;

    #[test]
    fn test_only_gaps_are_rewritten() {
        let line = r#"a "a" a /* a */ a // a"#;
        let out = apply(line, &scan(line), |gap| gap.replace('a', "b"));
        assert_eq!(out, r#"b "a" b /* a */ b // a"#);
    }

    #[test]
    fn test_without_spans_the_whole_line_is_rewritten() {
        let out = apply("NULL NULL", &[], |gap| gap.replace("NULL", "0"));
        assert_eq!(out, "0 0");
    }

    #[test]
    fn test_empty_gaps_are_skipped() {
        let line = r#""x""y""#;
        let mut calls = 0;
        let out = apply(line, &scan(line), |gap| {
            calls += 1;
            gap.to_string()
        });
        assert_eq!(out, line);
        assert_eq!(calls, 0);
    }
}
