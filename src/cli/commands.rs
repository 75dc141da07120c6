pub mod check;
pub mod precompute;
pub mod serve;

pub use check::check;
pub use precompute::precompute;
pub use serve::serve;
