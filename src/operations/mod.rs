pub mod connectivity;
pub mod junction;
pub mod modification;
pub mod offset;
pub mod query;
