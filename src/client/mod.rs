//! Dashboard side: HTTP client, poll timers and the state they feed.

pub mod api;
pub mod history;
pub mod poller;
pub mod state;

pub use api::{ApiClient, ClientError, DomainSnapshot, MetricsSource};
pub use history::RollingHistory;
pub use poller::{
    BatchFailure, DomainIntervals, FetchMode, PollPayload, PollSchedule, PollUpdate, Poller,
};
pub use state::{DashboardState, DomainView, HistoryCapacities};
