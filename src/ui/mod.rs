pub mod display;
pub mod state;

pub use state::{Collaborators, DerivedState, InsightViewModel};
