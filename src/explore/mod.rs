pub mod mock;
pub mod service;
pub mod session;

pub use mock::{MockQueryService, QueryCall};
pub use service::{QueryError, QueryService};
pub use session::{
    ExplorePhase, ExploreSession, PendingQuery, QueryOutcome, QueryTicket, ValidationError,
};
