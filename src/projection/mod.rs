//! Pure projections from the parsed analysis to renderable rows
//!
//! Every function here takes the model by reference and returns freshly
//! built values; nothing is cached or patched in place.

pub mod actions;
pub mod methodology;
pub mod objections;

pub use actions::should_show_actions;
pub use methodology::MethodologyRow;
pub use objections::ObjectionRow;
