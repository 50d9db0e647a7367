//! Payment report generation: a `summary` of counts and grouped totals, or
//! a flat `detailed` export of every payment in the requested range.

pub mod aggregate;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{PaymentMethod, PaymentRecord, PaymentStatus};

pub use aggregate::{group_by_class, group_by_month, GroupTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Summary,
    Detailed,
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(ReportType::Summary),
            "detailed" => Ok(ReportType::Detailed),
            _ => Err("Invalid report type".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_payments: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
    pub by_month: BTreeMap<String, GroupTotals>,
    pub by_class: BTreeMap<String, GroupTotals>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRow {
    pub id: Uuid,
    pub student_name: Option<String>,
    pub student_nis: Option<String>,
    pub class: Option<String>,
    pub academic_year: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub month_year: String,
    pub payment_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Detailed {
    pub payments: Vec<DetailedRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Summary(Summary),
    Detailed(Detailed),
}

pub fn build(report_type: ReportType, payments: &[PaymentRecord]) -> Report {
    match report_type {
        ReportType::Summary => Report::Summary(summarize(payments)),
        ReportType::Detailed => Report::Detailed(detail(payments)),
    }
}

pub fn summarize(payments: &[PaymentRecord]) -> Summary {
    let count_status =
        |status: PaymentStatus| payments.iter().filter(|p| p.status == status).count();

    Summary {
        total_payments: payments.len(),
        total_amount: payments.iter().map(|p| p.amount).sum(),
        paid_count: count_status(PaymentStatus::Paid),
        pending_count: count_status(PaymentStatus::Pending),
        overdue_count: count_status(PaymentStatus::Overdue),
        by_month: group_by_month(payments),
        by_class: group_by_class(payments),
    }
}

pub fn detail(payments: &[PaymentRecord]) -> Detailed {
    let payments = payments
        .iter()
        .map(|p| DetailedRow {
            id: p.id,
            student_name: p.student_name.clone(),
            student_nis: p.student_nis.clone(),
            class: p.student_class.clone(),
            academic_year: p.student_academic_year.clone(),
            amount: p.amount,
            month_year: p.month_year.clone(),
            payment_date: p.payment_date,
            due_date: p.due_date,
            status: p.status,
            payment_method: p.payment_method,
            notes: p.notes.clone(),
        })
        .collect();

    Detailed { payments }
}
