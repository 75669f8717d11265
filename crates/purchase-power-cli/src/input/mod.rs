pub mod file;
pub mod stdin;
