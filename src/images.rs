//! Programme thumbnail service
//!
//! Read-through, in-memory cache over the image download gateway. Images
//! are keyed by programme pid; a miss downloads the thumbnail to a
//! temporary file, loads it into memory and caches the bytes. The cache
//! has no eviction and no expiry.
//!
//! # Example
//!
//! ```no_run
//! use bbcschedule::ImageService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = ImageService::new()?;
//!     let bytes = service.fetch_image("p01lcbf6").await?;
//!     println!("{} bytes", bytes.len());
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Service path prefix of the image gateway
pub const IMAGE_SERVICE_PATH: &str = "images/ic";

/// Thumbnail size requested from the gateway
pub const IMAGE_SIZE: &str = "480x270";

/// Build the gateway path of a pid's thumbnail
pub fn image_path(pid: &str) -> String {
    format!("{}/{}/{}.jpg", IMAGE_SERVICE_PATH, IMAGE_SIZE, pid)
}

/// Lock-guarded pid-to-bytes cache
///
/// An absent entry is a miss. Entries are never evicted; the cache grows
/// with the set of distinct pids fetched over the process lifetime.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl ImageCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up cached bytes for a pid
    pub fn get(&self, pid: &str) -> Option<Bytes> {
        self.entries.read().unwrap().get(pid).cloned()
    }

    /// Insert bytes for a pid, replacing any existing entry
    pub fn put(&self, pid: impl Into<String>, bytes: Bytes) {
        self.entries.write().unwrap().insert(pid.into(), bytes);
    }

    /// Number of cached images
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thumbnail fetching service
///
/// Cheap to clone; clones share the transport and the cache.
#[derive(Clone)]
pub struct ImageService {
    transport: Arc<dyn Transport>,
    cache: Arc<ImageCache>,
}

impl ImageService {
    /// Create a service over the production HTTP transport
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new()?)))
    }

    /// Create a service over a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_cache(transport, Arc::new(ImageCache::new()))
    }

    /// Create a service over a custom transport and an existing cache
    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<ImageCache>) -> Self {
        Self { transport, cache }
    }

    /// The cache backing this service
    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }

    /// Fetch the thumbnail bytes for a pid
    ///
    /// A cache hit returns without touching the transport. On a miss the
    /// thumbnail is downloaded, cached and returned. Download failures
    /// propagate to the caller; nothing is cached for a failed pid.
    ///
    /// Concurrent misses for the same pid may each download; the last
    /// insert wins and subsequent calls hit the cache.
    pub async fn fetch_image(&self, pid: &str) -> Result<Bytes> {
        if let Some(bytes) = self.cache.get(pid) {
            tracing::debug!("image cache hit: {}", pid);
            return Ok(bytes);
        }

        let file = self.transport.fetch_to_file(&image_path(pid)).await?;
        let bytes = Bytes::from(tokio::fs::read(file.path()).await?);

        self.cache.put(pid, bytes.clone());
        tracing::debug!("image cached: {} ({} bytes)", pid, bytes.len());

        Ok(bytes)
    }
}
