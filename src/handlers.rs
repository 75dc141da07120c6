pub mod aggregates;
pub mod forecast;
pub mod health;
pub mod records;
pub mod series;
pub mod summary;
