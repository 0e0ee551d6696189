pub mod cell;
pub mod coord;
pub mod error;
pub mod limits;
pub mod settings;

pub use cell::*;
pub use coord::*;
pub use error::*;
pub use limits::*;
pub use settings::*;
