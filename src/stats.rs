//! Derived numbers for the admin dashboard, recomputed from the latest
//! student and payment lists on every render.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{PaymentRecord, PaymentStatus};

const RECENT_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_collected: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_overdue: Decimal,
}

impl DashboardStats {
    pub fn compute<S>(students: &[S], payments: &[PaymentRecord]) -> Self {
        let sum_status = |status: PaymentStatus| -> Decimal {
            payments
                .iter()
                .filter(|p| p.status == status)
                .map(|p| p.amount)
                .sum()
        };

        Self {
            total_students: students.len(),
            paid_count: payments.iter().filter(|p| p.status == PaymentStatus::Paid).count(),
            unpaid_count: payments.iter().filter(|p| p.status.is_outstanding()).count(),
            total_collected: sum_status(PaymentStatus::Paid),
            total_overdue: sum_status(PaymentStatus::Overdue),
        }
    }

    /// Paid payments as a share of all students, rounded half away from
    /// zero to one decimal place.
    pub fn paid_percentage(&self) -> Decimal {
        if self.total_students == 0 {
            return Decimal::ZERO;
        }
        let ratio = Decimal::from(self.paid_count) * Decimal::ONE_HUNDRED
            / Decimal::from(self.total_students);
        ratio.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn paid_percentage_label(&self) -> String {
        format!("{:.1}% dari total", self.paid_percentage())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentPayment {
    pub id: Uuid,
    pub student_name: String,
    pub class: String,
    pub month_year: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status_label: &'static str,
    pub is_paid: bool,
}

/// The newest payments, assuming `payments` is already sorted newest first.
pub fn recent_payments(payments: &[PaymentRecord]) -> Vec<RecentPayment> {
    payments
        .iter()
        .take(RECENT_LIMIT)
        .map(|p| {
            let is_paid = p.status == PaymentStatus::Paid;
            RecentPayment {
                id: p.id,
                student_name: p.student_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                class: p.student_class.clone().unwrap_or_else(|| "Unknown".to_string()),
                month_year: p.month_year.clone(),
                amount: p.amount,
                status_label: if is_paid { "Lunas" } else { "Tunggakan" },
                is_paid,
            }
        })
        .collect()
}

/// Format an amount the way `id-ID` renders IDR currency: `Rp 1.500.000,00`
/// with a non-breaking space after the symbol.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}Rp\u{a0}{grouped},{fraction}")
}
