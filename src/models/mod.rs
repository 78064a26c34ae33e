// This file declares all model modules and re-exports their contents
// This allows other parts of the code to use `use crate::models::Medicine`
// instead of `use crate::models::medicine::Medicine`

pub mod medicine;
pub mod user;

// Re-export all public items from the modules
pub use medicine::*;
pub use user::*;
