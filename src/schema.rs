use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder programmer for zones whose rows never name one.
pub const UNASSIGNED_PROGRAMMER: &str = "A Definir";

/// One decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Trimmed text rendering of the cell. Empty cells render as "".
    pub fn as_text(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_empty()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Row-major decoded sheet. Rows may have different lengths.
pub type Grid = Vec<Vec<Cell>>;

/// Reads the cell at `idx`, treating out-of-range indices as empty.
pub fn cell_at(row: &[Cell], idx: Option<usize>) -> &Cell {
    static EMPTY: Cell = Cell::Empty;
    idx.and_then(|i| row.get(i)).unwrap_or(&EMPTY)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteContract {
    #[schemars(description = "Circuit identifier exactly as it appears in the sheet")]
    pub id: String,

    #[schemars(description = "Origin with state abbreviations expanded, upper-cased")]
    pub origin: String,

    #[schemars(description = "Destination with state abbreviations expanded, upper-cased")]
    pub destination: String,

    #[schemars(description = "Contracted (target) volume")]
    pub contracted_volume: f64,

    #[schemars(description = "Realized volume")]
    pub realized_volume: f64,

    #[schemars(description = "Freight revenue in BRL")]
    pub revenue: f64,

    #[schemars(description = "Bonus in BRL")]
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OriginZone {
    #[schemars(description = "Display code derived from the canonical name")]
    pub id: String,

    #[schemars(description = "Canonical zone name, the stable grouping key")]
    pub name: String,

    pub programmer: String,

    #[schemars(description = "Sum of route revenue")]
    pub financial_revenue: f64,

    #[schemars(description = "Sum of route bonus")]
    pub financial_bonus: f64,

    #[schemars(description = "Routes in sheet order")]
    pub routes: Vec<RouteContract>,
}

impl OriginZone {
    pub fn new(id: String, name: String, programmer: String) -> Self {
        Self {
            id,
            name,
            programmer,
            financial_revenue: 0.0,
            financial_bonus: 0.0,
            routes: Vec::new(),
        }
    }

    pub fn has_programmer(&self) -> bool {
        self.programmer != UNASSIGNED_PROGRAMMER
    }

    /// Adds a route and folds its money into the zone totals.
    pub fn push_route(&mut self, route: RouteContract) {
        self.financial_revenue += route.revenue;
        self.financial_bonus += route.bonus;
        self.routes.push(route);
    }

    pub fn total_contracted_volume(&self) -> f64 {
        self.routes.iter().map(|r| r.contracted_volume).sum()
    }

    pub fn total_realized_volume(&self) -> f64 {
        self.routes.iter().map(|r| r.realized_volume).sum()
    }

    /// Region code for this zone from the city/state rule table, if any rule applies.
    pub fn region_code(&self) -> Option<&'static str> {
        crate::locations::zone_region_code(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Global,
    Programmer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub username: String,
    #[schemars(description = "Display name, matched against zone programmers (e.g. LUCAS)")]
    pub name: String,
    pub role: UserRole,
}

/// Everything a rendering collaborator needs after a sync.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub zones: Vec<OriginZone>,
    pub notifications: Vec<Notification>,
    pub last_update: Option<DateTime<Utc>>,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn json_schema() -> serde_json::Result<serde_json::Value> {
        let root = schemars::schema_for!(DashboardSnapshot);
        serde_json::to_value(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, revenue: f64, bonus: f64) -> RouteContract {
        RouteContract {
            id: id.to_string(),
            origin: "GOIÁS".to_string(),
            destination: "SAO PAULO".to_string(),
            contracted_volume: 10.0,
            realized_volume: 8.0,
            revenue,
            bonus,
        }
    }

    #[test]
    fn test_push_route_keeps_totals_in_sync() {
        let mut zone = OriginZone::new(
            "GOI-abcd".to_string(),
            "GOIÁS".to_string(),
            UNASSIGNED_PROGRAMMER.to_string(),
        );
        zone.push_route(route("C1", 100.5, 10.0));
        zone.push_route(route("C2", 50.25, 0.0));

        assert_eq!(zone.routes.len(), 2);
        assert_eq!(zone.financial_revenue, 100.5 + 50.25);
        assert_eq!(zone.financial_bonus, 10.0);
        assert_eq!(zone.total_contracted_volume(), 20.0);
        assert!(!zone.has_programmer());
    }

    #[test]
    fn test_cell_text_rendering() {
        assert_eq!(Cell::Text("  C1 ".to_string()).as_text(), "C1");
        assert_eq!(Cell::Number(42.0).as_text(), "42");
        assert!(Cell::Text("   ".to_string()).is_blank());
        assert!(Cell::from("").is_blank());
        assert_eq!(cell_at(&[Cell::from("a")], Some(5)), &Cell::Empty);
        assert_eq!(cell_at(&[Cell::from("a")], None), &Cell::Empty);
    }

    #[test]
    fn test_notification_serializes_type_field() {
        let notification = Notification {
            id: "abc".to_string(),
            message: "hello".to_string(),
            timestamp: Utc::now(),
            read: false,
            kind: NotificationKind::Success,
        };
        let value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value["type"], "SUCCESS");
    }

    #[test]
    fn test_snapshot_schema_exports() {
        let schema = DashboardSnapshot::json_schema().unwrap();
        let text = schema.to_string();
        assert!(text.contains("financialRevenue"));
        assert!(text.contains("routes"));
    }
}
