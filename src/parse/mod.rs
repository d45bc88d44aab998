pub mod extract;
pub mod shell;
pub mod tokenize;
pub mod types;

pub use extract::{extract, extract_commands};
pub use shell::{parse, segment};
pub use tokenize::{basename, tokenize};
pub use types::{
    ANSI_C_PLACEHOLDER, CommandToken, Extraction, Operator, ParsedCommand, SUBST_PLACEHOLDER,
    Segment,
};
