pub mod converters;
pub mod filters;
