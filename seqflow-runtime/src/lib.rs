pub mod collection;
pub mod env;
pub mod lazy;
pub mod observability;

pub use collection::Collection;
pub use env::Environment;
pub use lazy::LazyCollection;
