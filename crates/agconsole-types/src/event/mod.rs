pub mod diagnostic;
pub mod payload;
pub mod usage;

pub use diagnostic::*;
pub use payload::*;
pub use usage::*;
