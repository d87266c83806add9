pub mod quantity;
pub mod state;

pub use quantity::{Quantity, QuantityDef};
pub use state::{Clamped, Mutation, StateStore};
