//! upscan-ingest: paginated retrieval from the Up transactions API and the filter engine.

pub mod fetcher;
pub mod registry;
pub mod retrieval;
pub mod transport;
pub mod types;

pub use fetcher::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, PageCursor, PageFetcher};
pub use registry::{Account, AccountRegistry};
pub use retrieval::{RetrievalEngine, RetrievalResult, passes};
pub use transport::{BearerToken, HttpRequest, HttpResponse, HttpTransport, Transport};
pub use types::{AccountSelector, DateWindow, Page, parse_page};
