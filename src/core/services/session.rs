//! Fetch-modify-persist round trips against a [`RecordStore`], fronted by the
//! query cache.

use chrono::NaiveDate;

use crate::{
    cache::{fingerprint, QueryCache, QueryKey},
    domain::{WeightGoal, Workspace},
    storage::RecordStore,
};

use super::{summary_service::Dashboard, ServiceResult, SummaryService};

const RECORDS_KEY: &str = "records";
const DASHBOARD_KEY: &str = "dashboard";

fn records_key() -> QueryKey {
    QueryKey::root(RECORDS_KEY)
}

fn dashboard_key() -> QueryKey {
    QueryKey::root(DASHBOARD_KEY)
}

/// Single-owner handle pairing a record store with its query cache.
pub struct Session {
    store: Box<dyn RecordStore>,
    cache: QueryCache,
}

impl Session {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self {
            store,
            cache: QueryCache::new(),
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Full record set, served from the cache when it is still valid.
    pub fn workspace(&mut self) -> ServiceResult<Workspace> {
        let store = &self.store;
        Ok(self
            .cache
            .get_or_insert_with(records_key(), || store.load())?)
    }

    /// Applies `apply` to a fresh copy of the records and persists the result.
    ///
    /// The cache shows the updated records while the write is in flight. On
    /// success the affected queries are invalidated; on failure the cache is put
    /// back exactly as it was and the error is returned.
    pub fn mutate<R, F>(&mut self, apply: F) -> ServiceResult<R>
    where
        F: FnOnce(&mut Workspace) -> ServiceResult<R>,
    {
        let mut working = self.workspace()?;
        let result = apply(&mut working)?;

        let affected = [records_key(), dashboard_key()];
        let snapshot = self.cache.snapshot(&affected);
        self.cache.insert(records_key(), working.clone());
        self.cache.invalidate(&dashboard_key());

        match self.store.save(&working) {
            Ok(()) => {
                for key in &affected {
                    self.cache.invalidate(key);
                }
                Ok(result)
            }
            Err(err) => {
                tracing::warn!(error = %err, "write failed, rolling back cached records");
                self.cache.restore(snapshot);
                Err(err.into())
            }
        }
    }

    /// Derived dashboard for `as_of`, memoized until the next write.
    pub fn dashboard(
        &mut self,
        as_of: NaiveDate,
        goal: Option<&WeightGoal>,
    ) -> ServiceResult<Dashboard> {
        let key = dashboard_key()
            .child(as_of.to_string())
            .child(fingerprint(&goal).to_string());
        if let Some(hit) = self.cache.get::<Dashboard>(&key) {
            return Ok(hit);
        }
        let workspace = self.workspace()?;
        let dashboard = SummaryService::dashboard(&workspace, as_of, goal);
        self.cache.insert(key, dashboard.clone());
        Ok(dashboard)
    }
}
