pub mod page;
pub mod parse;
pub mod payload;
