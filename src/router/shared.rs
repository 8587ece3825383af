use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

use super::core::{Router, RouterBuilder};
use crate::template::DefinitionError;

/// A [`Router`] that can be replaced while requests are being resolved.
///
/// Readers take a snapshot with [`load`](Self::load) and keep resolving
/// against it even if a new table is swapped in mid-request. Writers build a
/// complete new router and publish it with one atomic store.
#[derive(Debug)]
pub struct SharedRouter {
    current: ArcSwap<Router>,
}

impl SharedRouter {
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Snapshot of the current router
    #[must_use]
    pub fn load(&self) -> Arc<Router> {
        self.current.load_full()
    }

    /// Publish `router`, returning the one it replaced.
    pub fn store(&self, router: Router) -> Arc<Router> {
        info!(routes_count = router.len(), "Routing table swapped");
        self.current.swap(Arc::new(router))
    }

    /// Rebuild from the current config plus whatever `extend` registers,
    /// starting from an empty table, and publish the result.
    ///
    /// On error the current router stays in place.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] raised by `extend`.
    pub fn reload<F>(&self, extend: F) -> Result<Arc<Router>, DefinitionError>
    where
        F: FnOnce(RouterBuilder) -> Result<RouterBuilder, DefinitionError>,
    {
        let config = *self.current.load().config();
        let router = extend(Router::builder(config))?.build();
        self.store(router);
        Ok(self.load())
    }
}

impl From<Router> for SharedRouter {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}
