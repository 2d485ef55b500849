//! Database record fetching over HTTP.
//!
//! [`RestRecordFetcher`] implements the
//! [`RecordFetcher`](enzymeml_application::RecordFetcher) port against the
//! public REST endpoints of each database. Enabled by the `databases`
//! feature.

mod rest_fetcher;

pub use rest_fetcher::RestRecordFetcher;
