pub mod catalog;
pub mod ratings;
pub mod source;

pub use catalog::Catalog;
pub use ratings::RatingStore;
pub use source::{CsvDataSource, DataSource};

#[cfg(test)]
pub use source::MockDataSource;
