//! Internet packages (plans) customers subscribe to

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{STATUS_ACTIVE, merge, number_cell};
use crate::api::Row;
use crate::store::id::parse_number;
use crate::store::record::Record;
use crate::store::table::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Bandwidth in Mbps
    #[serde(rename = "Speed")]
    pub speed: String,
    /// Monthly price
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub name: String,
    pub speed: f64,
    pub price: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackagePatch {
    pub name: Option<String>,
    pub speed: Option<f64>,
    pub price: Option<f64>,
    pub status: Option<String>,
    pub description: Option<String>,
}

impl Package {
    pub fn price_value(&self) -> Option<f64> {
        parse_number(&self.price)
    }

    pub fn speed_value(&self) -> Option<f64> {
        parse_number(&self.speed)
    }

    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

impl Entity for Package {
    const TABLE: &'static str = "Packages";
    const COLUMNS: &'static [&'static str] =
        &["ID", "Name", "Speed", "Price", "Status", "Description"];

    type Draft = NewPackage;
    type Patch = PackagePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("ID"),
            name: record.get("Name"),
            speed: record.get("Speed"),
            price: record.get("Price"),
            status: record.get("Status"),
            description: record.get("Description"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.speed.clone(),
            self.price.clone(),
            self.status.clone(),
            self.description.clone(),
        ]
    }

    fn from_draft(id: String, draft: NewPackage, _now: NaiveDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            speed: number_cell(draft.speed),
            price: number_cell(draft.price),
            status: draft.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            description: draft.description.unwrap_or_default(),
        }
    }

    fn apply(&mut self, patch: PackagePatch) {
        merge(&mut self.name, patch.name, |v| v);
        merge(&mut self.speed, patch.speed, number_cell);
        merge(&mut self.price, patch.price, number_cell);
        merge(&mut self.status, patch.status, |v| v);
        merge(&mut self.description, patch.description, |v| v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_draft_defaults() {
        let draft: NewPackage =
            serde_json::from_value(json!({"name": "Basic", "speed": 10, "price": 15})).unwrap();
        let package = Package::from_draft("p1".into(), draft, now());
        assert_eq!(
            package.to_row(),
            vec!["p1", "Basic", "10", "15", "active", ""]
        );
        assert_eq!(package.price_value(), Some(15.0));
        assert!(package.is_active());
    }

    #[test]
    fn test_decimal_speed() {
        let draft: NewPackage =
            serde_json::from_value(json!({"name": "Lite", "speed": 12.5, "price": 9})).unwrap();
        let mut package = Package::from_draft("p1".into(), draft, now());
        assert_eq!(package.speed, "12.5");
        assert_eq!(package.speed_value(), Some(12.5));

        let patch: PackagePatch = serde_json::from_value(json!({"speed": 2.5})).unwrap();
        package.apply(patch);
        assert_eq!(package.speed, "2.5");
    }

    #[test]
    fn test_row_matches_columns() {
        let package = Package::from_record(&Record::default());
        assert_eq!(package.to_row().len(), Package::COLUMNS.len());
    }

    #[test]
    fn test_patch_from_json() {
        let patch: PackagePatch =
            serde_json::from_value(json!({"price": 19.5, "description": "Promo"})).unwrap();
        let mut package = Package::from_draft(
            "p1".into(),
            NewPackage {
                name: "Basic".into(),
                speed: 10.0,
                price: 15.0,
                status: None,
                description: None,
            },
            now(),
        );
        package.apply(patch);
        assert_eq!(package.price, "19.5");
        assert_eq!(package.description, "Promo");
        assert_eq!(package.name, "Basic");
    }

    #[test]
    fn test_serializes_with_column_names() {
        let package = Package::from_record(&Record::from_row(
            &["ID".to_string(), "Name".to_string()],
            &["p1".to_string(), "Basic".to_string()],
        ));
        let json = serde_json::to_value(&package).unwrap();
        assert_eq!(json["ID"], "p1");
        assert_eq!(json["Name"], "Basic");
        assert_eq!(json["Price"], "");
    }
}
