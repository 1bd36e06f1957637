pub mod content;
pub mod protocol;
