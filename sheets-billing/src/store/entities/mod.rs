//! Typed records for the five sheets

pub mod bill;
pub mod customer;
pub mod package;
pub mod payment;
pub mod user;

pub use bill::{Bill, BillPatch, NewBill};
pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use package::{NewPackage, Package, PackagePatch};
pub use payment::{NewPayment, Payment, PaymentPatch};
pub use user::{NewUser, User, UserPatch, UserProfile};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

pub const BILL_UNPAID: &str = "unpaid";
pub const BILL_PAID: &str = "paid";

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OPERATOR: &str = "operator";
pub const ROLE_CUSTOMER: &str = "customer";

/// Render a number the way a sheet cell shows it (`15`, not `15.0`)
pub(crate) fn number_cell(value: f64) -> String {
    value.to_string()
}

/// Replace `field` when the patch carries a value
pub(crate) fn merge<T>(field: &mut String, value: Option<T>, render: impl FnOnce(T) -> String) {
    if let Some(value) = value {
        *field = render(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_cell() {
        assert_eq!(number_cell(15.0), "15");
        assert_eq!(number_cell(12.5), "12.5");
        assert_eq!(number_cell(0.0), "0");
    }

    #[test]
    fn test_merge_keeps_field_when_absent() {
        let mut field = "old".to_string();
        merge::<String>(&mut field, None, |v| v);
        assert_eq!(field, "old");
        merge(&mut field, Some(7u32), |v| v.to_string());
        assert_eq!(field, "7");
    }
}
