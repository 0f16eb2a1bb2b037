//! Mentor directory.

use crate::cache::{QueryCache, QueryState};
use crate::error::ClientError;
use butterfly_api::{Backend, CommunityProfile, MentorFilter, Principal};
use std::sync::Arc;

/// Directory listings, cached per caller and filter.
pub struct Directory {
    backend: Arc<dyn Backend>,
    listings: QueryCache<MentorFilter, Vec<CommunityProfile>>,
}

impl Directory {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            listings: QueryCache::new("directory"),
        }
    }

    /// Load the profiles matching `filter`.
    pub async fn browse(
        &self,
        caller: Option<&Principal>,
        filter: MentorFilter,
    ) -> QueryState<Vec<CommunityProfile>> {
        let backend = Arc::clone(&self.backend);
        self.listings
            .fetch(caller, filter, || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.browse_mentors(caller, filter).await?)
            })
            .await
    }

    pub fn peek(
        &self,
        caller: Option<&Principal>,
        filter: MentorFilter,
    ) -> QueryState<Vec<CommunityProfile>> {
        self.listings.peek(caller, &filter)
    }

    pub fn needs_fetch(&self, caller: Option<&Principal>, filter: MentorFilter) -> bool {
        self.listings.needs_fetch(caller, &filter)
    }

    /// Mark every listing of `caller` stale.
    pub fn invalidate_all(&self, caller: &Principal) -> usize {
        self.listings.invalidate_where(caller, |_| true)
    }

    pub fn purge(&self, principal: &Principal) {
        self.listings.purge(principal);
    }
}
