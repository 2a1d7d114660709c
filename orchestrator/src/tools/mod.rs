use std::time::Duration;

pub mod search;
pub mod weather;

pub use search::{SearchOutcome, SearchResult, SearchTool};
pub use weather::{WeatherOutcome, WeatherReport, WeatherTool};

/// Fixed timeout for every outbound provider call; past it the call is
/// treated as a transport failure.
pub(crate) const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
