// mod.rs - Data structures module

pub mod input;

// Re-export main types for convenience
pub use input::{discover, InputFile, InputFilter};
