pub mod expand;
pub mod keywords;
