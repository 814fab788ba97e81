pub mod instruction;
pub mod interpreter;
pub mod parser;
pub mod value;
