//! The conversion passes.
//!
//! Each pass is a pure `&str -> String` function over a whole file; the
//! pipeline feeds one pass's output to the next.
pub mod array;
pub mod define;
pub mod null;
pub mod printf;
pub mod string;

pub use array::ArrayConverter;
pub use define::DefineConverter;
pub use null::NullConverter;
pub use printf::PrintfConverter;
pub use string::StringConverter;

use crate::config::Pass;

pub trait Converter {
    fn pass(&self) -> Pass;

    fn transpile_file(&self, content: &str) -> String;
}
