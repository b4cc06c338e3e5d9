//! Runs the enabled converters in their fixed order, each one on the
//! previous one's output.

use crate::config::{Config, Pass};
use crate::convert::{
    ArrayConverter, Converter, DefineConverter, NullConverter, PrintfConverter, StringConverter,
};

pub struct Pipeline {
    stages: Vec<Box<dyn Converter>>,
}

impl Pipeline {
    /// Define → Null → Array → String → Printf, minus the disabled passes.
    pub fn standard(config: &Config) -> Self {
        let style = config.style();
        let stages = Pass::ALL
            .into_iter()
            .filter(|&pass| config.enabled(pass))
            .map(|pass| -> Box<dyn Converter> {
                match pass {
                    Pass::Define => Box::new(DefineConverter::new(style)),
                    Pass::Null => Box::new(NullConverter::new(style)),
                    Pass::Array => Box::new(ArrayConverter::new(style)),
                    Pass::String => Box::new(StringConverter::new(style)),
                    Pass::Printf => Box::new(PrintfConverter::new(style)),
                }
            })
            .collect();
        Self { stages }
    }

    pub fn passes(&self) -> Vec<Pass> {
        self.stages.iter().map(|s| s.pass()).collect()
    }

    pub fn run(&self, content: &str) -> String {
        let mut text = content.to_string();
        for stage in &self.stages {
            let next = stage.transpile_file(&text);
            log::debug!(
                "{:?} pass: {} line(s), {}",
                stage.pass(),
                next.lines().count(),
                if next == text { "unchanged" } else { "rewritten" }
            );
            text = next;
        }
        text
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard(&Config::default())
    }
}

/// Converts one file's text with the default configuration.
pub fn transpile(content: &str) -> String {
    Pipeline::default().run(content)
}
