//! Automaton editing and execution
//!
//! The model and its executor, the save format, the interaction state
//! machine and the render scene built on the core geometry.

mod executor;
mod interaction;
mod model;
mod parser;
mod scene;
mod serializer;
mod session;

pub use executor::*;
pub use interaction::*;
pub use model::*;
pub use parser::*;
pub use scene::*;
pub use serializer::*;
pub use session::*;
