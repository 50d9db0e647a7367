use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::PaymentRecord;

pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GroupTotals {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl GroupTotals {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.total += amount;
    }
}

/// Group totals keyed by billing period (`month_year`).
pub fn group_by_month(payments: &[PaymentRecord]) -> BTreeMap<String, GroupTotals> {
    group_by(payments, |p| p.month_year.clone())
}

/// Group totals keyed by the student's class; payments without one land in
/// the `"Unknown"` bucket.
pub fn group_by_class(payments: &[PaymentRecord]) -> BTreeMap<String, GroupTotals> {
    group_by(payments, |p| match p.student_class.as_deref() {
        Some(class) if !class.is_empty() => class.to_string(),
        _ => UNKNOWN_CLASS.to_string(),
    })
}

fn group_by<F>(payments: &[PaymentRecord], key: F) -> BTreeMap<String, GroupTotals>
where
    F: Fn(&PaymentRecord) -> String,
{
    payments.iter().fold(BTreeMap::new(), |mut acc, payment| {
        acc.entry(key(payment)).or_default().add(payment.amount);
        acc
    })
}
