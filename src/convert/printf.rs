//! `printf(fmt, args…);` → `std::cout << … ;`
//!
//! The format string is walked left to right; literal text becomes a quoted
//! segment and every conversion specifier takes the next argument:
//!
//!   %d %i %u %f %g %c %s …   →  << arg
//!   %x                      →  << std::hex << arg << std::dec
//!   %X                      →  << std::hex << std::uppercase << arg << std::nouppercase << std::dec
//!   %o                      →  << std::oct << arg << std::dec
//
//  Specifier grammar: '%' [-+ #0]* width? ('.' digits*)? length? conv
//      width  ::= digits | '*'
//      length ::= hh | h | ll | l | L | z | j | t

use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use super::Converter;
use crate::config::{Pass, Style};
use crate::engine::text::{ensure_include, map_lines, retire_header};
use crate::engine::{Guard, Rewrite, Rule, RuleSet, Site};

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::new(
        Guard::Anchored,
        vec![Rule::new(
            "printf",
            r#"\bprintf\s*\(\s*"((?:[^"\\]|\\.)*)"\s*(?:,(.*?))?\s*\)\s*;"#,
            printf_call,
        )],
    )
});

fn printf_call(site: &Site<'_>, _: &()) -> Option<Rewrite> {
    let args = split_arguments(site.get(2));
    Some(Rewrite::new(format!("{};", to_cout(site.get(1), &args))))
}

/// Splits on every comma; nested calls and literals are not special.
pub fn split_arguments(args: &str) -> Vec<&str> {
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Piece<'a> {
    Text(String),
    /// A conversion character and the argument it consumes.
    Arg(char, &'a str),
}

struct Format<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Format<'a> {
    fn new(format: &'a str) -> Self {
        Self {
            chars: format.chars().peekable(),
        }
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F, buf: &mut String) {
        while let Some(&c) = self.chars.peek() {
            if pred(c) {
                buf.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
    }

    /// Reads the rest of a specifier after `%`. Returns the raw text and the
    /// conversion character, if it is one we know.
    fn read_spec(&mut self) -> (String, Option<char>) {
        let mut raw = String::from("%");
        self.consume_while(|c| "-+ #0".contains(c), &mut raw);
        self.consume_while(|c| c.is_ascii_digit() || c == '*', &mut raw);
        if self.chars.peek() == Some(&'.') {
            self.consume_while(|c| c == '.', &mut raw);
            self.consume_while(|c| c.is_ascii_digit(), &mut raw);
        }
        self.consume_while(|c| "hlLzjt".contains(c), &mut raw);

        match self.chars.peek().copied() {
            Some(c) if "diouxXfFeEgGcs".contains(c) => {
                self.chars.next();
                raw.push(c);
                (raw, Some(c))
            }
            _ => (raw, None),
        }
    }

    fn pieces(mut self, args: &[&'a str]) -> Vec<Piece<'a>> {
        let mut pieces = Vec::new();
        let mut text = String::new();
        let mut args = args.iter().copied();

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => {
                    // keep escapes intact, `\%` included
                    text.push(c);
                    if let Some(next) = self.chars.next() {
                        text.push(next);
                    }
                }
                '%' if self.chars.peek() == Some(&'%') => {
                    self.chars.next();
                    text.push('%');
                }
                '%' => match self.read_spec() {
                    (_, Some(conv)) => {
                        if !text.is_empty() {
                            pieces.push(Piece::Text(std::mem::take(&mut text)));
                        }
                        // out of arguments: the specifier is dropped
                        if let Some(arg) = args.next() {
                            pieces.push(Piece::Arg(conv, arg));
                        }
                    }
                    (raw, None) => text.push_str(&raw),
                },
                c => text.push(c),
            }
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }
        pieces
    }
}

fn render(piece: &Piece<'_>) -> String {
    match piece {
        Piece::Text(text) => format!("\"{text}\""),
        Piece::Arg('x', arg) => format!("std::hex << {arg} << std::dec"),
        Piece::Arg('X', arg) => {
            format!("std::hex << std::uppercase << {arg} << std::nouppercase << std::dec")
        }
        Piece::Arg('o', arg) => format!("std::oct << {arg} << std::dec"),
        Piece::Arg(_, arg) => arg.to_string(),
    }
}

/// Builds the `std::cout << …` chain (without the trailing `;`).
pub fn to_cout(format: &str, args: &[&str]) -> String {
    let chain = Format::new(format)
        .pieces(args)
        .iter()
        .map(render)
        .collect::<Vec<_>>();

    if chain.is_empty() {
        return "std::cout".to_string();
    }
    format!("std::cout << {}", chain.join(" << "))
}

#[derive(Debug, Default)]
pub struct PrintfConverter {
    style: Style,
}

impl PrintfConverter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Converter for PrintfConverter {
    fn pass(&self) -> Pass {
        Pass::Printf
    }

    fn transpile_file(&self, content: &str) -> String {
        let mut changed = false;
        let out = map_lines(content, |line| {
            let edit = RULES.rewrite_line(line, &());
            changed |= edit.changed();
            edit.render(self.style.provenance)
        });

        if self.style.headers.wants_header(changed) {
            let out = ensure_include(&out, "iostream");
            retire_header(&out, "stdio.h", "iostream")
        } else {
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderPolicy;

    fn convert(src: &str) -> String {
        PrintfConverter::new(Style {
            headers: HeaderPolicy::WhenUsed,
            provenance: true,
        })
        .transpile_file(src)
    }

    fn body(src: &str) -> String {
        let out = convert(src);
        out.strip_prefix("#include <iostream>\n")
            .unwrap_or(&out)
            .to_string()
    }

    #[test]
    fn test_format_conversion() {
        let test_cases = vec![
            (
                r#"printf("x=%d, y=%x\n", a, b);"#,
                r#"std::cout << "x=" << a << ", y=" << std::hex << b << std::dec << "\n";"#,
            ),
            (
                r#"printf("hello\n");"#,
                r#"std::cout << "hello\n";"#,
            ),
            (r#"printf("");"#, "std::cout;"),
            (
                r#"printf("%X|%o", v, w);"#,
                r#"std::cout << std::hex << std::uppercase << v << std::nouppercase << std::dec << "|" << std::oct << w << std::dec;"#,
            ),
            (
                r#"printf("%ld %lu %lf %s %c", l, u, f, s, c);"#,
                r#"std::cout << l << " " << u << " " << f << " " << s << " " << c;"#,
            ),
            (
                r#"printf("%5.2f%%\n", v);"#,
                r#"std::cout << v << "%\n";"#,
            ),
            (
                r#"    printf("%-8s|", name);"#,
                r#"    std::cout << name << "|";"#,
            ),
        ];

        for (src, expected) in test_cases {
            assert_eq!(body(src), format!("{expected}\n"), "source: {src}");
        }
    }

    #[test]
    fn test_missing_arguments_drop_specifiers() {
        assert_eq!(
            to_cout("%d and %d!", &["a"]),
            r#"std::cout << a << " and " << "!""#
        );
    }

    #[test]
    fn test_unknown_specifier_stays_text() {
        assert_eq!(to_cout("at %p", &["ptr"]), r#"std::cout << "at %p""#);
    }

    #[test]
    fn test_naive_argument_split() {
        assert_eq!(split_arguments(" a, f(b, c) "), vec!["a", "f(b", "c)"]);
        assert!(split_arguments("").is_empty());
    }

    #[test]
    fn test_untouched() {
        let test_cases = vec![
            r#"sprintf(buf, "%d", x);"#,
            r#"fprintf(stderr, "%d", x);"#,
            r#"// printf("%d", x);"#,
            r#"puts("printf(\"%d\", x);");"#,
            r#"printf(fmt, x);"#,
        ];
        for src in test_cases {
            assert_eq!(convert(src), format!("{src}\n"), "source: {src}");
        }
    }

    #[test]
    fn test_headers() {
        let out = convert("#include <stdio.h>\nint main() { printf(\"hi\"); }\n");
        assert_eq!(
            out,
            "// #include <stdio.h> // replaced by <iostream>\n#include <iostream>\n\
             int main() { std::cout << \"hi\"; }\n"
        );
    }
}
