//! Aggregate counts over the tables

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::SheetStore;
use super::entities::{ROLE_ADMIN, ROLE_CUSTOMER, ROLE_OPERATOR, ROLE_SUPER_ADMIN, STATUS_INACTIVE};
use crate::error::StoreResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_customers: usize,
    pub total_bills: usize,
    pub unpaid_bills: usize,
    /// Sum of all payment amounts; unreadable amounts count as zero
    pub total_revenue: f64,
    pub total_packages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub new_this_month: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_role: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub total_amount: f64,
    pub unpaid_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub total: usize,
    pub total_amount: f64,
    pub by_method: BTreeMap<String, usize>,
    pub amount_by_method: BTreeMap<String, f64>,
}

impl SheetStore {
    pub async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let (customers, bills, payments, packages) = tokio::try_join!(
            self.customers.list_all(),
            self.bills.list_all(),
            self.payments.list_all(),
            self.packages.list_all(),
        )?;

        Ok(DashboardStats {
            active_customers: customers.iter().filter(|c| c.is_active()).count(),
            total_bills: bills.len(),
            unpaid_bills: bills.iter().filter(|b| b.is_unpaid()).count(),
            total_revenue: payments.iter().filter_map(|p| p.amount_value()).sum(),
            total_packages: packages.len(),
        })
    }

    /// `today` decides which month counts as "this month"
    pub async fn customer_stats(&self, today: NaiveDate) -> StoreResult<CustomerStats> {
        let customers = self.customers.list_all().await?;

        let new_this_month = customers
            .iter()
            .filter_map(|c| c.join_date_value())
            .filter(|joined| joined.year() == today.year() && joined.month() == today.month())
            .count();

        Ok(CustomerStats {
            total: customers.len(),
            active: customers.iter().filter(|c| c.is_active()).count(),
            inactive: customers.iter().filter(|c| c.status == STATUS_INACTIVE).count(),
            new_this_month,
        })
    }

    pub async fn user_stats(&self) -> StoreResult<UserStats> {
        let users = self.users.list_all().await?;

        let mut by_role: BTreeMap<String, usize> =
            [ROLE_SUPER_ADMIN, ROLE_ADMIN, ROLE_OPERATOR, ROLE_CUSTOMER]
                .into_iter()
                .map(|role| (role.to_string(), 0))
                .collect();
        for user in &users {
            *by_role.entry(user.role.clone()).or_default() += 1;
        }

        Ok(UserStats {
            total: users.len(),
            active: users.iter().filter(|u| u.is_active()).count(),
            inactive: users.iter().filter(|u| u.status == STATUS_INACTIVE).count(),
            by_role,
        })
    }

    pub async fn bill_stats(&self) -> StoreResult<BillStats> {
        let bills = self.bills.list_all().await?;

        let mut by_status = BTreeMap::new();
        for bill in &bills {
            *by_status.entry(bill.status.clone()).or_insert(0) += 1;
        }

        Ok(BillStats {
            total: bills.len(),
            by_status,
            total_amount: bills.iter().filter_map(|b| b.amount_value()).sum(),
            unpaid_amount: bills
                .iter()
                .filter(|b| b.is_unpaid())
                .filter_map(|b| b.amount_value())
                .sum(),
        })
    }

    pub async fn payment_stats(&self) -> StoreResult<PaymentStats> {
        let payments = self.payments.list_all().await?;

        let mut by_method = BTreeMap::new();
        let mut amount_by_method = BTreeMap::new();
        for payment in &payments {
            *by_method.entry(payment.payment_method.clone()).or_insert(0) += 1;
            *amount_by_method
                .entry(payment.payment_method.clone())
                .or_insert(0.0) += payment.amount_value().unwrap_or_default();
        }

        Ok(PaymentStats {
            total: payments.len(),
            total_amount: payments.iter().filter_map(|p| p.amount_value()).sum(),
            by_method,
            amount_by_method,
        })
    }
}
