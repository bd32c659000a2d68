pub mod diagnostic;
pub mod fold;
pub mod plugin;
pub mod printer;
pub mod types;
pub mod visit;

mod macros;
