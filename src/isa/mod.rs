pub mod hw;
pub mod inst;
