pub mod collector;
pub mod platform;
pub mod provider;
pub mod snapshot;

pub use collector::SysinfoProvider;
pub use provider::{MetricsProvider, ProviderError};
