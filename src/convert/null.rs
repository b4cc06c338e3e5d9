//! `NULL` → `nullptr`, outside literals and comments.

use std::sync::LazyLock;

use super::Converter;
use crate::config::{Pass, Style};
use crate::engine::text::map_lines;
use crate::engine::{Guard, Rewrite, Rule, RuleSet};

static RULES: LazyLock<RuleSet<()>> = LazyLock::new(|| {
    RuleSet::new(
        Guard::Gaps,
        vec![Rule::new("null", r"\bNULL\b", |_, _| Some(Rewrite::new("nullptr")))],
    )
});

#[derive(Debug, Default)]
pub struct NullConverter {
    style: Style,
}

impl NullConverter {
    pub fn new(style: Style) -> Self {
        Self { style }
    }
}

impl Converter for NullConverter {
    fn pass(&self) -> Pass {
        Pass::Null
    }

    fn transpile_file(&self, content: &str) -> String {
        map_lines(content, |line| {
            RULES.rewrite_line(line, &()).render(self.style.provenance)
        })
    }
}
