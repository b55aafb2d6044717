//! Caller-side state around the ingestion pipeline.
//!
//! [`Dashboard`] keeps the last good zone collection, the known route ids and the
//! notification feed. A failed import leaves all three untouched.

use crate::changes::{detect_new_routes, KnownRouteIds};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::ingestion::{parse_grid_with, read_csv_grid};
use crate::notifications::NotificationFeed;
use crate::schema::{DashboardSnapshot, Grid, OriginZone, User, UserRole};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Marks a sync cycle as running until dropped.
#[derive(Debug)]
pub struct SyncGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    zones: Vec<OriginZone>,
    known_ids: KnownRouteIds,
    feed: NotificationFeed,
    last_update: Option<DateTime<Utc>>,
    syncing: Arc<AtomicBool>,
    has_loaded: bool,
}

impl Dashboard {
    /// Builds an empty dashboard. Fails with `InvalidConfig` when `config` does not validate.
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: DashboardConfig) -> Self {
        let feed = NotificationFeed::new(config.notification_retention);
        Self {
            config,
            zones: Vec::new(),
            known_ids: KnownRouteIds::new(),
            feed,
            last_update: None,
            syncing: Arc::new(AtomicBool::new(false)),
            has_loaded: false,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn zones(&self) -> &[OriginZone] {
        &self.zones
    }

    pub fn known_route_ids(&self) -> &KnownRouteIds {
        &self.known_ids
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationFeed {
        &mut self.feed
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// When the next scheduled sync is due: `refresh_interval_secs` after the last
    /// successful update. `None` until something has loaded.
    pub fn next_sync_at(&self) -> Option<DateTime<Utc>> {
        let interval = i64::try_from(self.config.refresh_interval_secs).unwrap_or(i64::MAX);
        let interval = Duration::try_seconds(interval).unwrap_or(Duration::MAX);
        self.last_update
            .map(|last| last.checked_add_signed(interval).unwrap_or(DateTime::<Utc>::MAX_UTC))
    }

    /// True when nothing has loaded yet or the refresh interval has elapsed at `now`.
    pub fn is_sync_due(&self, now: DateTime<Utc>) -> bool {
        self.next_sync_at().map_or(true, |next| now >= next)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    /// Claims the sync slot. Fails if another cycle still holds it.
    pub fn begin_sync(&self) -> Result<SyncGuard> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DashboardError::SyncInProgress)?;
        Ok(SyncGuard {
            flag: Arc::clone(&self.syncing),
        })
    }

    /// Runs the pipeline over a fetched grid and commits the result.
    ///
    /// Returns the number of new routes announced. On error nothing changes.
    pub fn apply_fetched_grid(&mut self, grid: &Grid, is_initial_load: bool) -> Result<usize> {
        let zones = match parse_grid_with(grid, self.config.header_scan_rows) {
            Ok(zones) => zones,
            Err(e) => {
                warn!("Import failed, keeping previous data: {}", e);
                return Err(e);
            }
        };
        Ok(self.commit(zones, is_initial_load))
    }

    /// Commits zones produced by a manual file import. Manual imports always announce
    /// new routes.
    pub fn apply_manual_import(&mut self, zones: Vec<OriginZone>) -> usize {
        self.commit(zones, false)
    }

    /// One full fetch cycle. `fetch` receives the resolved sheet URL and returns CSV text.
    ///
    /// The first successful cycle counts as the initial load and announces nothing.
    pub fn sync_with<F>(&mut self, fetch: F) -> Result<usize>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let _guard = self.begin_sync()?;

        let grid = match fetch(self.config.resolved_sheet_url())
            .and_then(|text| read_csv_grid(text.as_bytes()))
        {
            Ok(grid) => grid,
            Err(e) => {
                warn!("Sync failed, keeping previous data: {}", e);
                return Err(e);
            }
        };
        let is_initial_load = !self.has_loaded;

        self.apply_fetched_grid(&grid, is_initial_load)
    }

    fn commit(&mut self, zones: Vec<OriginZone>, is_initial_load: bool) -> usize {
        let changes = detect_new_routes(&zones, &self.known_ids, is_initial_load);
        let announced = changes.notifications.len();

        self.feed.push_batch(changes.notifications);
        self.known_ids = changes.known_ids;
        self.zones = zones;
        self.last_update = Some(Utc::now());
        self.has_loaded = true;

        info!(
            "Dashboard updated: {} zones, {} known routes, {} new",
            self.zones.len(),
            self.known_ids.len(),
            announced
        );
        announced
    }

    /// Zones visible to `user`. Programmers only see zones assigned to their display name.
    pub fn zones_for(&self, user: &User) -> Vec<&OriginZone> {
        match user.role {
            UserRole::Global => self.zones.iter().collect(),
            UserRole::Programmer => self
                .zones
                .iter()
                .filter(|zone| zone.programmer.to_uppercase() == user.name)
                .collect(),
        }
    }

    pub fn zone(&self, id: &str) -> Option<&OriginZone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            zones: self.zones.clone(),
            notifications: self.feed.entries().to_vec(),
            last_update: self.last_update,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::from_valid_config(DashboardConfig::default())
    }
}
