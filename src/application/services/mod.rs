pub mod assembler;
pub mod tagging;
