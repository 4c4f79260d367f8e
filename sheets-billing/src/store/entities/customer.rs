//! Subscribers

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{STATUS_ACTIVE, merge};
use crate::api::Row;
use crate::store::id::{format_date, parse_date};
use crate::store::record::Record;
use crate::store::table::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Email")]
    pub email: String,
    /// References `Packages.ID`; not checked by the store
    #[serde(rename = "Package_ID")]
    pub package_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Join_Date")]
    pub join_date: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub package_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub package_id: Option<String>,
    pub status: Option<String>,
}

impl CustomerPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl Customer {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }

    pub fn join_date_value(&self) -> Option<NaiveDate> {
        parse_date(&self.join_date)
    }
}

impl Entity for Customer {
    const TABLE: &'static str = "Customers";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Address",
        "Phone",
        "Email",
        "Package_ID",
        "Status",
        "Join_Date",
    ];

    type Draft = NewCustomer;
    type Patch = CustomerPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("ID"),
            name: record.get("Name"),
            address: record.get("Address"),
            phone: record.get("Phone"),
            email: record.get("Email"),
            package_id: record.get("Package_ID"),
            status: record.get("Status"),
            join_date: record.get("Join_Date"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.address.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.package_id.clone(),
            self.status.clone(),
            self.join_date.clone(),
        ]
    }

    fn from_draft(id: String, draft: NewCustomer, now: NaiveDateTime) -> Self {
        Self {
            id,
            name: draft.name,
            address: draft.address,
            phone: draft.phone,
            email: draft.email,
            package_id: draft.package_id,
            status: draft.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
            join_date: format_date(now.date()),
        }
    }

    fn apply(&mut self, patch: CustomerPatch) {
        merge(&mut self.name, patch.name, |v| v);
        merge(&mut self.address, patch.address, |v| v);
        merge(&mut self.phone, patch.phone, |v| v);
        merge(&mut self.email, patch.email, |v| v);
        merge(&mut self.package_id, patch.package_id, |v| v);
        merge(&mut self.status, patch.status, |v| v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_date_defaults_to_creation_day() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(17, 45, 0)
            .unwrap();
        let draft: NewCustomer = serde_json::from_value(json!({
            "name": "Ana",
            "address": "Main St 1",
            "phone": "555-0100",
            "email": "ana@example.com",
            "packageId": "p1"
        }))
        .unwrap();

        let customer = Customer::from_draft("c1".into(), draft, now);
        assert_eq!(customer.join_date, "2024-03-09");
        assert_eq!(customer.join_date_value(), NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(customer.status, "active");
        assert_eq!(customer.package_id, "p1");
        assert_eq!(customer.to_row().len(), Customer::COLUMNS.len());
    }

    #[test]
    fn test_status_patch_touches_only_status() {
        let mut customer = Customer::from_record(&Record::from_row(
            &Customer::COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            &["c1", "Ana", "Main St 1", "555", "ana@example.com", "p1", "active", "2024-01-01"]
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
        ));
        let before = customer.clone();

        customer.apply(CustomerPatch::status("inactive"));

        assert_eq!(customer.status, "inactive");
        assert!(!customer.is_active());
        assert_eq!(
            Customer {
                status: before.status.clone(),
                ..customer
            },
            before
        );
    }
}
