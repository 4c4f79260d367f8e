//! Entity tables over the spreadsheet and the helpers built on them

pub mod entities;
pub mod id;
pub mod record;
pub mod stats;
pub mod table;

use std::sync::Arc;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;

use crate::api::RangeStore;
use crate::error::StoreResult;
use entities::{
    Bill, BillPatch, Customer, CustomerPatch, NewBill, Package, Payment, STATUS_ACTIVE,
    STATUS_INACTIVE, User, UserPatch,
};
pub use table::{Entity, Table};

/// Day of the billing month generated bills fall due
pub const BILL_DUE_DAY: u32 = 10;

/// A customer together with the package it references
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerWithPackage {
    #[serde(flatten)]
    pub customer: Customer,
    /// `None` when `Package_ID` points at no package
    pub package: Option<Package>,
}

/// The five tables of one spreadsheet
#[derive(Clone)]
pub struct SheetStore {
    pub users: Table<User>,
    pub customers: Table<Customer>,
    pub packages: Table<Package>,
    pub bills: Table<Bill>,
    pub payments: Table<Payment>,
}

impl SheetStore {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self {
            users: Table::new(Arc::clone(&store)),
            customers: Table::new(Arc::clone(&store)),
            packages: Table::new(Arc::clone(&store)),
            bills: Table::new(Arc::clone(&store)),
            payments: Table::new(store),
        }
    }

    /// Write the header row of every table, wiping existing content
    pub async fn initialize(&self) -> StoreResult<()> {
        self.users.initialize().await?;
        self.customers.initialize().await?;
        self.packages.initialize().await?;
        self.bills.initialize().await?;
        self.payments.initialize().await?;
        Ok(())
    }

    // Users

    pub async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .list_all()
            .await?
            .into_iter()
            .find(|u| u.email == email))
    }

    pub async fn deactivate_user(&self, id: &str) -> StoreResult<User> {
        self.users.update(id, UserPatch::status(STATUS_INACTIVE)).await
    }

    pub async fn activate_user(&self, id: &str) -> StoreResult<User> {
        self.users.update(id, UserPatch::status(STATUS_ACTIVE)).await
    }

    /// `password_hash` is stored as given
    pub async fn change_password(&self, id: &str, password_hash: String) -> StoreResult<User> {
        let patch = UserPatch {
            password: Some(password_hash),
            ..UserPatch::default()
        };
        self.users.update(id, patch).await
    }

    // Customers

    pub async fn find_customer_by_email(&self, email: &str) -> StoreResult<Option<Customer>> {
        Ok(self
            .customers
            .list_all()
            .await?
            .into_iter()
            .find(|c| c.email == email))
    }

    pub async fn deactivate_customer(&self, id: &str) -> StoreResult<Customer> {
        self.customers
            .update(id, CustomerPatch::status(STATUS_INACTIVE))
            .await
    }

    pub async fn activate_customer(&self, id: &str) -> StoreResult<Customer> {
        self.customers
            .update(id, CustomerPatch::status(STATUS_ACTIVE))
            .await
    }

    pub async fn customer_with_package(&self, id: &str) -> StoreResult<Option<CustomerWithPackage>> {
        let Some(customer) = self.customers.find_by_id(id).await? else {
            return Ok(None);
        };
        let package = self.packages.find_by_id(&customer.package_id).await?;
        Ok(Some(CustomerWithPackage { customer, package }))
    }

    // Bills

    pub async fn bills_by_customer(&self, customer_id: &str) -> StoreResult<Vec<Bill>> {
        self.bills
            .find_where(|b| b.customer_id == customer_id)
            .await
    }

    pub async fn update_bill_status(&self, id: &str, status: &str) -> StoreResult<Bill> {
        self.bills.update(id, BillPatch::status(status)).await
    }

    /// Unpaid bills whose due date is before `today`
    pub async fn overdue_bills(&self, today: NaiveDate) -> StoreResult<Vec<Bill>> {
        self.bills.find_where(|b| b.is_overdue(today)).await
    }

    /// Bill every active customer for `month`/`year` at its package price.
    ///
    /// Customers already billed for the period, and customers whose package
    /// is missing or has no readable price, are skipped. All new bills go
    /// out in a single append.
    pub async fn generate_monthly_bills(&self, month: u32, year: i32) -> StoreResult<Vec<Bill>> {
        let (customers, packages, bills) = tokio::try_join!(
            self.customers.list_all(),
            self.packages.list_all(),
            self.bills.list_all(),
        )?;

        let due_date = NaiveDate::from_ymd_opt(year, month, BILL_DUE_DAY);
        let mut drafts = Vec::new();

        for customer in customers.iter().filter(|c| c.is_active()) {
            let already_billed = bills
                .iter()
                .any(|b| b.customer_id == customer.id && b.is_for_period(month, year));
            if already_billed {
                continue;
            }

            let Some(package) = packages.iter().find(|p| p.id == customer.package_id) else {
                warn!(
                    "Customer {} references missing package {}, not billed",
                    customer.id, customer.package_id
                );
                continue;
            };
            let Some(amount) = package.price_value() else {
                warn!("Package {} has no readable price, customer {} not billed", package.id, customer.id);
                continue;
            };

            drafts.push(NewBill {
                customer_id: customer.id.clone(),
                package_id: package.id.clone(),
                month,
                year,
                amount,
                status: None,
                due_date,
            });
        }

        let generated = self.bills.create_many(drafts).await?;
        info!("Generated {} bills for {}/{}", generated.len(), month, year);
        Ok(generated)
    }

    // Payments

    pub async fn payments_by_bill(&self, bill_id: &str) -> StoreResult<Vec<Payment>> {
        self.payments.find_where(|p| p.bill_id == bill_id).await
    }

    /// Payments made against any of the customer's bills
    pub async fn payments_by_customer(&self, customer_id: &str) -> StoreResult<Vec<Payment>> {
        let (bills, payments) =
            tokio::try_join!(self.bills_by_customer(customer_id), self.payments.list_all())?;
        Ok(payments
            .into_iter()
            .filter(|p| bills.iter().any(|b| b.id == p.bill_id))
            .collect())
    }
}
