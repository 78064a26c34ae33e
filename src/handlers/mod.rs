// This file declares the handler modules and re-exports their contents
// This allows other parts of the code to use `use crate::handlers::function_name`
// instead of `use crate::handlers::medicines::function_name`

pub mod auth;
pub mod medicines;

// Re-export all public items from the modules
pub use auth::*;
pub use medicines::*;
