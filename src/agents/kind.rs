//! The four specialist roles and what each one declares

use crate::core::llm::AgentOptions;
use crate::tools::restaurant::{
    ConfirmCheckout, ConfirmExpense, ConfirmReservation, ToCheckout, ToGreeter, ToReservation,
    ToTakeaway, UpdateCreditCard, UpdateName, UpdateOrder, UpdatePhone, UpdateReservationTime,
};
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Speech voice shared by every specialist
pub const VOICE_ID: &str = "Ir1QNHvhaJXbAGhT50w3";

const NUMBER_STYLE: &str = "\
When you say phone numbers, always spell them digit by digit separated by spaces, \
for example '6 1 2  3 4 5  6 7 8'. \
Never use symbols such as '+', '-', '=', '*', 'x' or '/' when speaking numbers or amounts; \
use full conversational sentences instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Greeter,
    Reservation,
    Takeaway,
    Checkout,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Greeter,
        AgentKind::Reservation,
        AgentKind::Takeaway,
        AgentKind::Checkout,
    ];

    /// Fixed registry name
    pub const fn name(&self) -> &'static str {
        match self {
            AgentKind::Greeter => "greeter",
            AgentKind::Reservation => "reservation",
            AgentKind::Takeaway => "takeaway",
            AgentKind::Checkout => "checkout",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            AgentKind::Greeter => "Greeter",
            AgentKind::Reservation => "Reservation",
            AgentKind::Takeaway => "Takeaway",
            AgentKind::Checkout => "Checkout",
        }
    }

    /// Persona and task for the agent's system message
    pub fn instructions(&self, menu: &str) -> String {
        match self {
            AgentKind::Greeter => format!(
                "You are a friendly receptionist at the restaurant. The menu is: {}\n\
                 Your job is to greet the caller and understand whether they want to make a \
                 reservation or order takeaway food. Guide them to the right agent using your tools.",
                menu
            ),
            AgentKind::Reservation => format!(
                "You are the reservation agent of the restaurant. Ask first for the date and time \
                 of the reservation, then for the customer's name and finally for their phone \
                 number. Then repeat all the details and confirm them with the customer.\n\
                 Talk about times naturally, for example 'at half past eight in the evening' \
                 instead of '20:30'. If a number is unclear, ask the customer to repeat it digit \
                 by digit.\n{}",
                NUMBER_STYLE
            ),
            AgentKind::Takeaway => format!(
                "You are a takeaway agent taking orders from customers. Our menu is: {}\n\
                 Clarify special requests and confirm the order with the customer.",
                menu
            ),
            AgentKind::Checkout => format!(
                "You are the checkout agent of the restaurant. The menu is: {}\n\
                 You are responsible for confirming the total cost of the order and then \
                 collecting the customer's name, phone number and credit card information, \
                 including the card number, expiry date and CVV, step by step.\n\
                 Once everything is collected, confirm the payment and say goodbye.\n{}",
                menu, NUMBER_STYLE
            ),
        }
    }

    /// Tools the model may call while this agent is current
    pub fn declared_tools(&self) -> Vec<Arc<dyn Tool>> {
        match self {
            AgentKind::Greeter => vec![Arc::new(ToReservation), Arc::new(ToTakeaway)],
            AgentKind::Reservation => vec![
                Arc::new(UpdateName),
                Arc::new(UpdatePhone),
                Arc::new(UpdateReservationTime),
                Arc::new(ConfirmReservation),
                Arc::new(ToGreeter),
            ],
            AgentKind::Takeaway => vec![
                Arc::new(UpdateOrder),
                Arc::new(ToCheckout),
                Arc::new(ToGreeter),
            ],
            AgentKind::Checkout => vec![
                Arc::new(UpdateName),
                Arc::new(UpdatePhone),
                Arc::new(ConfirmExpense),
                Arc::new(UpdateCreditCard),
                Arc::new(ConfirmCheckout),
                Arc::new(ToTakeaway),
                Arc::new(ToGreeter),
            ],
        }
    }

    /// Model and voice parameters; unset fields fall back to the settings
    pub fn options(&self) -> AgentOptions {
        let model = match self {
            AgentKind::Greeter => Some("gpt-4o-mini".to_string()),
            _ => None,
        };
        AgentOptions {
            model,
            temperature: None,
            voice: Some(VOICE_ID.to_string()),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown agent '{}'", s))
    }
}
