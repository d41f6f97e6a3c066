pub mod profile;
pub mod routing;
pub mod step;
pub mod turn;

pub use profile::*;
pub use routing::*;
pub use step::*;
pub use turn::*;
