//! Detection of newly appeared routes between successive imports.
//!
//! The set of known route ids is owned by the caller. It goes in by reference and an
//! updated copy comes back in the [`ChangeSet`], so nothing is remembered here between
//! calls.

use crate::schema::{Notification, NotificationKind, OriginZone};
use crate::utils::random_base36;
use chrono::Utc;
use log::info;
use std::collections::BTreeSet;

/// Every route id ever observed by the caller.
pub type KnownRouteIds = BTreeSet<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub known_ids: KnownRouteIds,
    /// One per new route, in zone order then route order.
    pub notifications: Vec<Notification>,
}

impl ChangeSet {
    pub fn has_new_routes(&self) -> bool {
        !self.notifications.is_empty()
    }
}

pub fn new_route_message(zone_name: &str, route_id: &str) -> String {
    format!(
        "1 carga inclusa na zona de origem {} no circuito {}",
        zone_name, route_id
    )
}

/// Diffs the route ids in `zones` against `known`.
///
/// Unseen ids are always recorded. On the initial load no notifications are produced,
/// so the first fetch does not flood the feed.
pub fn detect_new_routes(
    zones: &[OriginZone],
    known: &KnownRouteIds,
    is_initial_load: bool,
) -> ChangeSet {
    let mut known_ids = known.clone();
    let mut notifications = Vec::new();
    let mut rng = rand::thread_rng();
    let timestamp = Utc::now();

    for zone in zones {
        for route in &zone.routes {
            if !known_ids.insert(route.id.clone()) || is_initial_load {
                continue;
            }

            notifications.push(Notification {
                id: random_base36(&mut rng, 9),
                message: new_route_message(&zone.name, &route.id),
                timestamp,
                read: false,
                kind: NotificationKind::Success,
            });
        }
    }

    if !notifications.is_empty() {
        info!("Detected {} new routes", notifications.len());
    }

    ChangeSet {
        known_ids,
        notifications,
    }
}
