pub mod fetcher;
pub mod ingest;
pub mod providers;
pub mod query;

pub use fetcher::{FetchPolicy, FetchReport, Fetcher};
pub use ingest::{strip_markup, IngestOptions, IngestOutcome, IngestPipeline, IngestReport, SkipReason};
pub use providers::{create_provider, NaverCredentials, ProviderConfig, ProviderKind};
pub use query::{QueryChoice, QueryExpansion, Refinement};

pub mod prelude {
    pub use super::{Fetcher, IngestPipeline, QueryChoice, QueryExpansion, Refinement};
    pub use nm_core::{RecencyWindow, Result, SearchHit};
}
