//! Payments recorded against bills

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{merge, number_cell};
use crate::api::Row;
use crate::store::id::{format_date, parse_date, parse_number};
use crate::store::record::Record;
use crate::store::table::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Bill_ID")]
    pub bill_id: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Payment_Date")]
    pub payment_date: String,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    /// Reference to an uploaded receipt, if any
    #[serde(rename = "Receipt_File")]
    pub receipt_file: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    /// ID of the user who recorded the payment
    #[serde(rename = "Created_By")]
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub bill_id: String,
    pub amount: f64,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub payment_method: String,
    #[serde(default)]
    pub receipt_file: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: String,
}

/// `Created_By` is fixed once recorded
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentPatch {
    pub bill_id: Option<String>,
    pub amount: Option<f64>,
    pub payment_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub receipt_file: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn amount_value(&self) -> Option<f64> {
        parse_number(&self.amount)
    }

    pub fn payment_date_value(&self) -> Option<NaiveDate> {
        parse_date(&self.payment_date)
    }
}

impl Entity for Payment {
    const TABLE: &'static str = "Payments";
    const COLUMNS: &'static [&'static str] = &[
        "ID",
        "Bill_ID",
        "Amount",
        "Payment_Date",
        "Payment_Method",
        "Receipt_File",
        "Notes",
        "Created_By",
    ];

    type Draft = NewPayment;
    type Patch = PaymentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_record(record: &Record) -> Self {
        Self {
            id: record.get("ID"),
            bill_id: record.get("Bill_ID"),
            amount: record.get("Amount"),
            payment_date: record.get("Payment_Date"),
            payment_method: record.get("Payment_Method"),
            receipt_file: record.get("Receipt_File"),
            notes: record.get("Notes"),
            created_by: record.get("Created_By"),
        }
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.clone(),
            self.bill_id.clone(),
            self.amount.clone(),
            self.payment_date.clone(),
            self.payment_method.clone(),
            self.receipt_file.clone(),
            self.notes.clone(),
            self.created_by.clone(),
        ]
    }

    fn from_draft(id: String, draft: NewPayment, now: NaiveDateTime) -> Self {
        Self {
            id,
            bill_id: draft.bill_id,
            amount: number_cell(draft.amount),
            payment_date: format_date(draft.payment_date.unwrap_or(now.date())),
            payment_method: draft.payment_method,
            receipt_file: draft.receipt_file.unwrap_or_default(),
            notes: draft.notes.unwrap_or_default(),
            created_by: draft.created_by,
        }
    }

    fn apply(&mut self, patch: PaymentPatch) {
        merge(&mut self.bill_id, patch.bill_id, |v| v);
        merge(&mut self.amount, patch.amount, number_cell);
        merge(&mut self.payment_date, patch.payment_date, format_date);
        merge(&mut self.payment_method, patch.payment_method, |v| v);
        merge(&mut self.receipt_file, patch.receipt_file, |v| v);
        merge(&mut self.notes, patch.notes, |v| v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 20)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_payment_date_defaults_to_today() {
        let draft: NewPayment = serde_json::from_value(json!({
            "billId": "b1",
            "amount": 15,
            "paymentMethod": "cash",
            "createdBy": "u1"
        }))
        .unwrap();
        let payment = Payment::from_draft("pay1".into(), draft, now());

        assert_eq!(
            payment.to_row(),
            vec!["pay1", "b1", "15", "2024-01-20", "cash", "", "", "u1"]
        );
        assert_eq!(payment.payment_date_value(), NaiveDate::from_ymd_opt(2024, 1, 20));
    }

    #[test]
    fn test_explicit_payment_date() {
        let draft: NewPayment = serde_json::from_value(json!({
            "billId": "b1",
            "amount": 7.5,
            "paymentDate": "2024-01-05",
            "paymentMethod": "transfer",
            "notes": "partial",
            "createdBy": "u1"
        }))
        .unwrap();
        let payment = Payment::from_draft("pay1".into(), draft, now());
        assert_eq!(payment.payment_date, "2024-01-05");
        assert_eq!(payment.amount_value(), Some(7.5));
        assert_eq!(payment.notes, "partial");
    }

    #[test]
    fn test_patch_keeps_creator() {
        let mut payment = Payment::from_record(&Record::from_row(
            &["ID".to_string(), "Created_By".to_string(), "Notes".to_string()],
            &["pay1".to_string(), "u1".to_string(), "n".to_string()],
        ));
        payment.apply(PaymentPatch {
            notes: Some("updated".into()),
            ..PaymentPatch::default()
        });
        assert_eq!(payment.notes, "updated");
        assert_eq!(payment.created_by, "u1");
    }
}
