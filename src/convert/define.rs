//! `#define` → `constexpr`.
//!
//! Three shapes are recognised, tried in this order:
//!
//!   #define NAME(a, b) body   →  constexpr R NAME(auto a, auto b) { return body; }
//!   #define NAME              →  constexpr bool NAME = true;
//!   #define NAME value        →  constexpr T NAME = value;
//!
//! `T` is guessed from the spelling of `value`; nothing is ever expanded.

use std::sync::LazyLock;

use regex::Regex;

use super::Converter;
use crate::config::{Pass, Style};
use crate::engine::text::map_lines;
use crate::engine::{Guard, Rewrite, Rule, RuleSet, Site};

const FROM_DEFINE: &str = "converted from #define";
const FROM_MACRO: &str = "converted from macro #define";

/// A floating literal on its own: digits with a point, an exponent or an
/// `f` suffix.
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?[fF]?$").expect("valid float pattern")
});

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::new(
        Guard::Directive,
        vec![
            Rule::new(
                "function-macro",
                r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)\(([^)]*)\)\s+(.+)$",
                function_macro,
            ),
            Rule::new(
                "flag-macro",
                r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)\s*$",
                flag_macro,
            ),
            Rule::new(
                "value-macro",
                r"^\s*#\s*define\s+([A-Za-z_][A-Za-z0-9_]*)\s+(.+)$",
                value_macro,
            ),
        ],
    )
});

fn function_macro(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    let name = site.get(1);
    let params = convert_parameters(site.get(2));
    let body = site.get(3).trim();
    let ret = deduce_return_type(body);
    Some(
        Rewrite::new(format!(
            "constexpr {ret} {name}({params}) {{ return {body}; }}"
        ))
        .note(FROM_MACRO),
    )
}

fn flag_macro(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    Some(Rewrite::new(format!("constexpr bool {} = true;", site.get(1))).note(FROM_DEFINE))
}

fn value_macro(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    let name = site.get(1);
    let value = site.get(2).trim();
    let ty = deduce_type(value);
    Some(Rewrite::new(format!("constexpr {ty} {name} = {value};")).note(FROM_DEFINE))
}

/// `a, b` → `auto a, auto b`.
fn convert_parameters(params: &str) -> String {
    params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("auto {p}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Arithmetic bodies are left to the compiler; anything else is typed like
/// a plain value.
pub fn deduce_return_type(body: &str) -> &'static str {
    if body.contains(['+', '-', '*', '/']) {
        return "auto";
    }
    deduce_type(body)
}

/// Guesses a C++ type from the spelling of a macro value.
pub fn deduce_type(value: &str) -> &'static str {
    let v = value.trim();
    let bytes = v.as_bytes();

    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        return "const char*";
    }
    if v.len() >= 2 && v.starts_with('\'') && v.ends_with('\'') {
        return "char";
    }

    let unsigned = v.strip_prefix(['+', '-']).unwrap_or(v);

    // hex before float, so the `F` in `0xFF` is not a float suffix
    if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
        return "int";
    }
    if FLOAT_RE.is_match(unsigned) && unsigned.contains(['.', 'f', 'F', 'e', 'E']) {
        return if v.ends_with(['f', 'F']) {
            "float"
        } else {
            "double"
        };
    }
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return "int";
    }
    if !unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return match v.parse::<i64>() {
            Ok(n) if i32::try_from(n).is_ok() => "int",
            Ok(_) => "long long",
            Err(_) => "auto",
        };
    }

    "auto"
}

#[derive(Debug, Default)]
pub struct DefineConverter {
    style: Style,
}

impl DefineConverter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Converter for DefineConverter {
    fn pass(&self) -> Pass {
        Pass::Define
    }

    fn transpile_file(&self, content: &str) -> String {
        map_lines(content, |line| {
            RULES.rewrite_line(line, &()).render(self.style.provenance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(src: &str) -> String {
        DefineConverter::default().transpile_file(src)
    }

    #[test]
    fn test_value_macros() {
        let test_cases = vec![
            (
                "#define MAX 100",
                "constexpr int MAX = 100; // converted from #define\n",
            ),
            (
                "#define PI 3.1416",
                "constexpr double PI = 3.1416; // converted from #define\n",
            ),
            (
                "#define RATE 0.5f",
                "constexpr float RATE = 0.5f; // converted from #define\n",
            ),
            (
                "#define GREETING \"hello\"",
                "constexpr const char* GREETING = \"hello\"; // converted from #define\n",
            ),
            (
                "#define SEP ','",
                "constexpr char SEP = ','; // converted from #define\n",
            ),
            (
                "#define MASK 0xFF",
                "constexpr int MASK = 0xFF; // converted from #define\n",
            ),
            (
                "#define BIG 5000000000",
                "constexpr long long BIG = 5000000000; // converted from #define\n",
            ),
            (
                "#define SIZE 10 /* elements */",
                "constexpr int SIZE = 10; /* elements */ // converted from #define\n",
            ),
            (
                "#define OTHER MAX",
                "constexpr auto OTHER = MAX; // converted from #define\n",
            ),
        ];

        for (src, expected) in test_cases {
            assert_eq!(convert(src), expected, "source: {src}");
        }
    }

    #[test]
    fn test_function_macro() {
        assert_eq!(
            convert("#define SQUARE(x) ((x) * (x))"),
            "constexpr auto SQUARE(auto x) { return ((x) * (x)); } \
             // converted from macro #define\n"
        );
        assert_eq!(
            convert("#define PICK(a, b) a"),
            "constexpr auto PICK(auto a, auto b) { return a; } // converted from macro #define\n"
        );
        assert_eq!(
            convert("#define ZERO() 0"),
            "constexpr int ZERO() { return 0; } // converted from macro #define\n"
        );
    }

    #[test]
    fn test_space_before_paren_is_a_value_macro() {
        assert_eq!(
            convert("#define TWO (1 + 1)"),
            "constexpr auto TWO = (1 + 1); // converted from #define\n"
        );
    }

    #[test]
    fn test_flag_macro() {
        assert_eq!(
            convert("#define DEBUG"),
            "constexpr bool DEBUG = true; // converted from #define\n"
        );
    }

    #[test]
    fn test_trailing_comment_is_kept_apart() {
        assert_eq!(
            convert("#define LIMIT 10 // items"),
            "constexpr int LIMIT = 10; // items // converted from #define\n"
        );
    }

    #[test]
    fn test_other_lines_pass_through() {
        let src = "#include <stdio.h>\n// #define NOPE 1\n\"#define NOPE 1\"\nint x = 1;\n";
        assert_eq!(convert(src), src);
    }

    #[test]
    fn test_deduce_type() {
        let test_cases = vec![
            ("-42", "int"),
            ("+7", "int"),
            ("-3000000000", "long long"),
            ("99999999999999999999", "auto"),
            ("017", "int"),
            (".5", "double"),
            ("1e10", "double"),
            ("1.5e-3", "double"),
            ("3.", "double"),
            ("10 /* elements */", "auto"),
            ("SCALE * 2e3", "auto"),
            ("1.0 + offset", "auto"),
            ("2.5F", "float"),
            ("buffer", "auto"),
            ("flag_count", "auto"),
            ("a + b", "auto"),
        ];
        for (value, expected) in test_cases {
            assert_eq!(deduce_type(value), expected, "value: {value}");
        }
    }

    #[test]
    fn test_no_provenance() {
        let conv = DefineConverter::new(Style {
            provenance: false,
            ..Style::default()
        });
        assert_eq!(conv.transpile_file("#define N 3"), "constexpr int N = 3;\n");
    }
}
