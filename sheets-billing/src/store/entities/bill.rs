//! Monthly invoices

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{BILL_PAID, BILL_UNPAID, merge, number_cell};
use crate::api::Row;
use crate::store::id::{format_date, format_datetime, parse_date, parse_number};
use crate::store::record::Record;
use crate::store::table::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Package_ID")]
    pub package_id: String,
    /// 1-12
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    /// `unpaid` or `paid`
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Due_Date")]
    pub due_date: String,
    #[serde(rename = "Created_At")]
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub customer_id: String,
    pub package_id: String,
    pub month: u32,
    pub year: i32,
    pub amount: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillPatch {
    pub customer_id: Option<String>,
    pub package_id: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub amount: Option<f64>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl BillPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl Bill {
    pub fn amount_value(&self) -> Option<f64> {
        parse_number(&self.amount)
    }

    pub fn month_value(&self) -> Option<u32> {
        self.month.trim().parse().ok()
    }

    pub fn year_value(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }

    pub fn due_date_value(&self) -> Option<NaiveDate> {
        parse_date(&self.due_date)
    }

    pub fn is_unpaid(&self) -> bool {
        self.status == BILL_UNPAID
    }

    pub fn is_paid(&self) -> bool {
        self.status == BILL_PAID
    }

    /// Unpaid and past its due date. Bills without a readable due date never are.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_unpaid() && self.due_date_value().is_some_and(|due| due < today)
    }

    pub fn is_for_period(&self, month: u32, year: i32) -> bool {
        self.month_value() == Some(month) && self.year_value() == Some(year)
    }
}

impl Entity for Bill {
    const TABLE: &'static str = "Bills";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Customer_ID",
        "Package_ID",
        "Month",
        "Year",
        "Amount",
        "Status",
        "Due_Date",
        "Created_At",
    ];

    type Draft = NewBill;
    type Patch = BillPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("ID"),
            customer_id: record.get("Customer_ID"),
            package_id: record.get("Package_ID"),
            month: record.get("Month"),
            year: record.get("Year"),
            amount: record.get("Amount"),
            status: record.get("Status"),
            due_date: record.get("Due_Date"),
            created_at: record.get("Created_At"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.customer_id.clone(),
            self.package_id.clone(),
            self.month.clone(),
            self.year.clone(),
            self.amount.clone(),
            self.status.clone(),
            self.due_date.clone(),
            self.created_at.clone(),
        ]
    }

    fn from_draft(id: String, draft: NewBill, now: NaiveDateTime) -> Self {
        Self {
            id,
            customer_id: draft.customer_id,
            package_id: draft.package_id,
            month: draft.month.to_string(),
            year: draft.year.to_string(),
            amount: number_cell(draft.amount),
            status: draft.status.unwrap_or_else(|| BILL_UNPAID.to_string()),
            due_date: draft.due_date.map(format_date).unwrap_or_default(),
            created_at: format_datetime(now),
        }
    }

    fn apply(&mut self, patch: BillPatch) {
        merge(&mut self.customer_id, patch.customer_id, |v| v);
        merge(&mut self.package_id, patch.package_id, |v| v);
        merge(&mut self.month, patch.month, |v| v.to_string());
        merge(&mut self.year, patch.year, |v| v.to_string());
        merge(&mut self.amount, patch.amount, number_cell);
        merge(&mut self.status, patch.status, |v| v);
        merge(&mut self.due_date, patch.due_date, format_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(status: &str, due: &str) -> Bill {
        let mut bill = Bill::from_record(&Record::default());
        bill.status = status.to_string();
        bill.due_date = due.to_string();
        bill
    }

    #[test]
    fn test_draft_defaults_to_unpaid() {
        let draft: NewBill = serde_json::from_value(json!({
            "customerId": "c1",
            "packageId": "p1",
            "month": 1,
            "year": 2024,
            "amount": 15,
            "dueDate": "2024-01-10"
        }))
        .unwrap();
        let bill = Bill::from_draft("b1".into(), draft, date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap());

        assert_eq!(
            bill.to_row(),
            vec![
                "b1",
                "c1",
                "p1",
                "1",
                "2024",
                "15",
                "unpaid",
                "2024-01-10",
                "2024-01-01 09:00:00"
            ]
        );
        assert!(bill.is_for_period(1, 2024));
        assert_eq!(bill.amount_value(), Some(15.0));
    }

    #[test]
    fn test_missing_due_date_is_blank() {
        let bill = Bill::from_draft(
            "b1".into(),
            NewBill {
                customer_id: "c1".into(),
                package_id: "p1".into(),
                month: 2,
                year: 2024,
                amount: 10.0,
                status: None,
                due_date: None,
            },
            date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap(),
        );
        assert_eq!(bill.due_date, "");
        assert_eq!(bill.due_date_value(), None);
    }

    #[test]
    fn test_overdue() {
        let today = date(2024, 3, 15);
        assert!(bill("unpaid", "2024-03-10").is_overdue(today));
        assert!(!bill("unpaid", "2024-03-15").is_overdue(today));
        assert!(!bill("paid", "2024-03-10").is_overdue(today));
        assert!(!bill("unpaid", "").is_overdue(today));
        assert!(!bill("unpaid", "someday").is_overdue(today));
    }

    #[test]
    fn test_status_patch() {
        let mut b = bill("unpaid", "2024-03-10");
        b.amount = "15".into();
        b.apply(BillPatch::status("paid"));
        assert!(b.is_paid());
        assert_eq!(b.amount, "15");
        assert_eq!(b.due_date, "2024-03-10");
    }
}
