pub mod element;
pub mod function;
pub mod sequence;
