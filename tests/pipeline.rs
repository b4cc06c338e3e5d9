use std::fs;

use c2cpp::config::{Config, HeaderPolicy, Pass, Style};
use c2cpp::convert::{
    ArrayConverter, Converter, DefineConverter, NullConverter, PrintfConverter, StringConverter,
};
use c2cpp::{Pipeline, transpile};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn converters(style: Style) -> Vec<Box<dyn Converter>> {
    vec![
        Box::new(DefineConverter::new(style)),
        Box::new(NullConverter::new(style)),
        Box::new(ArrayConverter::new(style)),
        Box::new(StringConverter::new(style)),
        Box::new(PrintfConverter::new(style)),
    ]
}

#[test]
fn converts_legacy_fixture() {
    init_logging();
    let source = fs::read_to_string("tests/fixtures/legacy.c").unwrap();
    let expected = fs::read_to_string("tests/fixtures/legacy.expected.cpp").unwrap();

    assert_eq!(transpile(&source), expected);
}

#[test]
fn second_run_changes_nothing() {
    let source = fs::read_to_string("tests/fixtures/legacy.c").unwrap();
    let once = transpile(&source);
    assert_eq!(transpile(&once), once);
}

#[test]
fn literal_and_comment_lines_pass_every_converter() {
    let style = Style {
        headers: HeaderPolicy::WhenUsed,
        provenance: true,
    };
    let lines = [
        r##""#define MAX 100""##,
        r#""int* p = NULL;""#,
        r#""int arr[] = {1, 2, 3};""#,
        r#""char *s = \"x\";""#,
        r#""printf(\"%d\", x);""#,
        "// #define MAX 100",
        "// int a[10], b[20]; p = NULL;",
        "/* printf(\"%d\", x); strcmp(a, b) */",
    ];

    for conv in converters(style) {
        for line in lines {
            assert_eq!(
                conv.transpile_file(line),
                format!("{line}\n"),
                "{:?} pass touched {line}",
                conv.pass()
            );
        }
    }
}

#[test]
fn string_symbols_reach_comparisons() {
    let src = "char name[] = \"world\";\nif (strcmp(name, other) == 0) {}\n";
    let out = StringConverter::default().transpile_file(src);
    assert!(out.contains("std::string name = \"world\";"), "got: {out}");
    assert!(out.contains("if ((name == other)) {}"), "got: {out}");
}

#[test]
fn null_only_outside_literals() {
    let out = NullConverter::default().transpile_file(
        "int* p = NULL;\nputs(\"contains NULL text\");\n",
    );
    assert_eq!(out, "int* p = nullptr;\nputs(\"contains NULL text\");\n");
}

#[test]
fn skipped_passes_leave_their_constructs() {
    let config = Config {
        headers: HeaderPolicy::WhenUsed,
        provenance: false,
        ..Config::default()
    }
    .without(&[Pass::Null, Pass::Printf]);

    let out = Pipeline::standard(&config).run("int *p = NULL;\nprintf(\"%d\", 1);\nint v[3];\n");
    assert_eq!(
        out,
        "#include <array>\nint *p = NULL;\nprintf(\"%d\", 1);\nstd::array<int, 3> v;\n"
    );
}

#[test]
fn commented_size_macro_stays_an_int() {
    let out = transpile("#define SIZE 10 /* elements */\nint v[SIZE];\n");
    assert!(
        out.contains("constexpr int SIZE = 10; /* elements */ // converted from #define\n"),
        "got: {out}"
    );
    assert!(out.contains("std::array<int, SIZE> v;"), "got: {out}");
}

#[test]
fn products_with_indexed_operands_are_not_declarations() {
    let src = "acc = acc * data[i];\nsum += w * v[i];\n";
    let out = Pipeline::standard(&Config {
        headers: HeaderPolicy::WhenUsed,
        ..Config::default()
    })
    .run(src);
    assert_eq!(out, src);
}
