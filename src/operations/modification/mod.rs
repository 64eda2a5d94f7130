mod trim;

pub use trim::Trim;
