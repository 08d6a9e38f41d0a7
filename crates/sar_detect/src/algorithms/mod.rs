pub mod tiles;
pub mod bands;
pub mod sampling;

pub use tiles::*;
pub use bands::*;
pub use sampling::*;
