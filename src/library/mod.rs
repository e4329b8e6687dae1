pub mod entry;
pub mod scanner;
pub mod selection;
