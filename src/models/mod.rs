pub mod item;
pub mod origin;

pub use item::*;
pub use origin::*;
