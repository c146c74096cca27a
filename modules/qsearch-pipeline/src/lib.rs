pub mod aggregate;
pub mod fetcher;
pub mod pool;
pub mod target;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use aggregate::{Failure, Harvest, Policy};
pub use fetcher::{Fetcher, HttpFetcher};
pub use pool::{Decoder, WorkerPool};
pub use target::{FetchResult, RequestTarget};
pub use tokio_util::sync::CancellationToken;
