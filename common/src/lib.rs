pub mod types;
pub mod events;

pub use types::*;
pub use events::*;
