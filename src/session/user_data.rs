//! Shared user data for a single conversation
//!
//! Information Hiding:
//! - Fields are private so the checkout invariant cannot be bypassed
//! - Updates go through typed `FieldUpdate` values
//! - Summary rendering format hidden behind summarize()

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected update to the user data record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Expense must be a non-negative amount, got {0}")]
    InvalidExpense(f64),

    #[error("Cannot check out before {0} is provided")]
    CheckoutIncomplete(&'static str),
}

/// A full replacement of one user data field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    CustomerName(String),
    CustomerPhone(String),
    ReservationTime(String),
    Order(Vec<String>),
    Expense(f64),
    CardNumber(String),
    CardExpiry(String),
    CardCvv(String),
}

/// What the caller has told the agents so far
///
/// One instance per conversation, shared by every specialist agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    customer_name: Option<String>,
    customer_phone: Option<String>,
    reservation_time: Option<String>,
    order: Vec<String>,
    expense: Option<f64>,
    card_number: Option<String>,
    card_expiry: Option<String>,
    card_cvv: Option<String>,
    checked_out: bool,
    previous_agent: Option<String>,
}

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one field in full
    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), SessionError> {
        match update {
            FieldUpdate::CustomerName(name) => self.customer_name = Some(name),
            FieldUpdate::CustomerPhone(phone) => self.customer_phone = Some(phone),
            FieldUpdate::ReservationTime(time) => self.reservation_time = Some(time),
            FieldUpdate::Order(items) => self.order = items,
            FieldUpdate::Expense(amount) => {
                if !amount.is_finite() || amount < 0.0 {
                    return Err(SessionError::InvalidExpense(amount));
                }
                // -0.0 would otherwise render differently from 0.0
                self.expense = Some(amount + 0.0);
            }
            FieldUpdate::CardNumber(number) => self.card_number = Some(number),
            FieldUpdate::CardExpiry(expiry) => self.card_expiry = Some(expiry),
            FieldUpdate::CardCvv(cvv) => self.card_cvv = Some(cvv),
        }
        Ok(())
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone.as_deref()
    }

    pub fn reservation_time(&self) -> Option<&str> {
        self.reservation_time.as_deref()
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn expense(&self) -> Option<f64> {
        self.expense
    }

    pub fn card_number(&self) -> Option<&str> {
        self.card_number.as_deref()
    }

    pub fn card_expiry(&self) -> Option<&str> {
        self.card_expiry.as_deref()
    }

    pub fn card_cvv(&self) -> Option<&str> {
        self.card_cvv.as_deref()
    }

    pub fn checked_out(&self) -> bool {
        self.checked_out
    }

    /// Name of the agent that was current before the latest handoff
    pub fn previous_agent(&self) -> Option<&str> {
        self.previous_agent.as_deref()
    }

    pub(crate) fn set_previous_agent(&mut self, name: impl Into<String>) {
        self.previous_agent = Some(name.into());
    }

    /// An expense of zero counts as not confirmed
    pub fn has_expense(&self) -> bool {
        self.expense.is_some_and(|amount| amount > 0.0)
    }

    pub fn has_contact_details(&self) -> bool {
        is_filled(&self.customer_name) && is_filled(&self.customer_phone)
    }

    pub fn has_card_details(&self) -> bool {
        is_filled(&self.card_number) && is_filled(&self.card_expiry) && is_filled(&self.card_cvv)
    }

    /// Flip `checked_out`, provided the expense and card details are present
    pub fn mark_checked_out(&mut self) -> Result<(), SessionError> {
        if !self.has_expense() {
            return Err(SessionError::CheckoutIncomplete("the expense"));
        }
        if !self.has_card_details() {
            return Err(SessionError::CheckoutIncomplete("the credit card information"));
        }
        self.checked_out = true;
        Ok(())
    }

    /// Human-readable listing of every set field, one `key: value` per line
    ///
    /// Field order is fixed. Strings are JSON-quoted so two different values
    /// never render the same line. `checked_out` is always listed.
    pub fn summarize(&self) -> String {
        let mut lines = Vec::new();

        push_text(&mut lines, "customer_name", &self.customer_name);
        push_text(&mut lines, "customer_phone", &self.customer_phone);
        push_text(&mut lines, "reservation_time", &self.reservation_time);
        if !self.order.is_empty() {
            let items = self.order.iter().map(|i| quote(i)).collect::<Vec<_>>();
            lines.push(format!("order: [{}]", items.join(", ")));
        }
        if let Some(expense) = self.expense {
            lines.push(format!("expense: {}", expense));
        }
        push_text(&mut lines, "card_number", &self.card_number);
        push_text(&mut lines, "card_expiry", &self.card_expiry);
        push_text(&mut lines, "card_cvv", &self.card_cvv);

        lines.push(format!("checked_out: {}", self.checked_out));
        lines.join("\n")
    }
}

fn push_text(lines: &mut Vec<String>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        lines.push(format!("{}: {}", key, quote(value)));
    }
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}
