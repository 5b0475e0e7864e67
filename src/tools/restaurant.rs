//! Restaurant Tools
//!
//! Data tools overwrite one user data field and answer with a confirmation.
//! Transition tools check their guard against the shared user data and
//! either explain what is missing or hand off.

use super::{parse_args, HandoffDirective, Tool, ToolContext, ToolMetadata};
use crate::agents::AgentKind;
use crate::error::Result;
use crate::session::FieldUpdate;
use crate::{tool_metadata, transfer_tool};
use serde::Deserialize;
use serde_json::Value;

pub const MISSING_CONTACT: &str = "Please provide your name and phone number first.";
pub const MISSING_RESERVATION_TIME: &str = "Please provide reservation time first.";
pub const MISSING_ORDER: &str = "No takeaway order found. Please make an order first.";
pub const MISSING_EXPENSE: &str = "Please confirm the expense first.";
pub const MISSING_CARD: &str = "Please provide the credit card information first.";

transfer_tool!(
    ToGreeter,
    "to_greeter",
    AgentKind::Greeter.name(),
    "Called when the user asks for something outside the scope of the current agent, \
     or wants to go back to the receptionist."
);

transfer_tool!(
    ToReservation,
    "to_reservation",
    AgentKind::Reservation.name(),
    "Called when the user wants to make or update a table reservation."
);

transfer_tool!(
    ToTakeaway,
    "to_takeaway",
    AgentKind::Takeaway.name(),
    "Called when the user wants to order food for takeaway, or change an existing order."
);

#[derive(Deserialize)]
struct NameArgs {
    name: String,
}

pub struct UpdateName;

impl Tool for UpdateName {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "update_name",
            description: "Called when the user provides their name.",
            parameters: [
                {
                    name: "name",
                    type: "string",
                    description: "The customer's name",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: NameArgs = parse_args("update_name", args)?;
        let reply = format!("The name is updated to {}", args.name);
        apply_update(ctx, FieldUpdate::CustomerName(args.name), reply)
    }
}

#[derive(Deserialize)]
struct PhoneArgs {
    phone: String,
}

pub struct UpdatePhone;

impl Tool for UpdatePhone {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "update_phone",
            description: "Called when the user provides their phone number.",
            parameters: [
                {
                    name: "phone",
                    type: "string",
                    description: "The customer's phone number",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: PhoneArgs = parse_args("update_phone", args)?;
        let reply = format!("The phone number is updated to {}", args.phone);
        apply_update(ctx, FieldUpdate::CustomerPhone(args.phone), reply)
    }
}

#[derive(Deserialize)]
struct ReservationTimeArgs {
    time: String,
}

pub struct UpdateReservationTime;

impl Tool for UpdateReservationTime {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "update_reservation_time",
            description: "Called when the user provides the date and time of the reservation.",
            parameters: [
                {
                    name: "time",
                    type: "string",
                    description: "The reservation time",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: ReservationTimeArgs = parse_args("update_reservation_time", args)?;
        let reply = format!("The reservation time is updated to {}", args.time);
        apply_update(ctx, FieldUpdate::ReservationTime(args.time), reply)
    }
}

pub struct ConfirmReservation;

impl Tool for ConfirmReservation {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "confirm_reservation",
            description: "Called when the user confirms the reservation. \
                          Requires name, phone number and reservation time.",
            parameters: []
        }
    }

    fn handoff_target(&self) -> Option<&'static str> {
        Some(AgentKind::Greeter.name())
    }

    fn execute(&self, _args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        if !ctx.userdata.has_contact_details() {
            return Ok(HandoffDirective::reply(MISSING_CONTACT));
        }
        if !has_text(ctx.userdata.reservation_time()) {
            return Ok(HandoffDirective::reply(MISSING_RESERVATION_TIME));
        }
        ctx.transfer_to(AgentKind::Greeter.name())
    }
}

#[derive(Deserialize)]
struct OrderArgs {
    items: Vec<String>,
}

pub struct UpdateOrder;

impl Tool for UpdateOrder {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "update_order",
            description: "Called when the user creates or changes their order. \
                          Always pass the full order, it replaces the previous one.",
            parameters: [
                {
                    name: "items",
                    type: "array",
                    description: "The items of the full order",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: OrderArgs = parse_args("update_order", args)?;
        let reply = format!("The order is updated to {}", args.items.join(", "));
        apply_update(ctx, FieldUpdate::Order(args.items), reply)
    }
}

pub struct ToCheckout;

impl Tool for ToCheckout {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "to_checkout",
            description: "Called when the user confirms the order and wants to pay.",
            parameters: []
        }
    }

    fn handoff_target(&self) -> Option<&'static str> {
        Some(AgentKind::Checkout.name())
    }

    fn execute(&self, _args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        if ctx.userdata.order().is_empty() {
            return Ok(HandoffDirective::reply(MISSING_ORDER));
        }
        ctx.transfer_to(AgentKind::Checkout.name())
    }
}

#[derive(Deserialize)]
struct ExpenseArgs {
    expense: f64,
}

pub struct ConfirmExpense;

impl Tool for ConfirmExpense {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "confirm_expense",
            description: "Called when the user confirms the total cost of the order.",
            parameters: [
                {
                    name: "expense",
                    type: "number",
                    description: "The expense of the order",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: ExpenseArgs = parse_args("confirm_expense", args)?;
        let reply = format!("The expense is confirmed to be {}", args.expense);
        apply_update(ctx, FieldUpdate::Expense(args.expense), reply)
    }
}

#[derive(Deserialize)]
struct CreditCardArgs {
    number: String,
    expiry: String,
    cvv: String,
}

pub struct UpdateCreditCard;

impl Tool for UpdateCreditCard {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "update_credit_card",
            description: "Called when the user provides their credit card details.",
            parameters: [
                {
                    name: "number",
                    type: "string",
                    description: "The credit card number",
                    required: true
                },
                {
                    name: "expiry",
                    type: "string",
                    description: "The expiry date of the credit card",
                    required: true
                },
                {
                    name: "cvv",
                    type: "string",
                    description: "The CVV of the credit card",
                    required: true
                }
            ]
        }
    }

    fn execute(&self, args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        let args: CreditCardArgs = parse_args("update_credit_card", args)?;
        let reply = format!("The credit card number is updated to {}", args.number);
        for update in [
            FieldUpdate::CardNumber(args.number),
            FieldUpdate::CardExpiry(args.expiry),
            FieldUpdate::CardCvv(args.cvv),
        ] {
            if let Err(e) = ctx.userdata.apply(update) {
                return Ok(HandoffDirective::reply(e.to_string()));
            }
        }
        Ok(HandoffDirective::Reply(reply))
    }
}

pub struct ConfirmCheckout;

impl Tool for ConfirmCheckout {
    fn metadata(&self) -> ToolMetadata {
        tool_metadata! {
            name: "confirm_checkout",
            description: "Called when the user confirms the payment. \
                          Requires the expense and the full credit card details.",
            parameters: []
        }
    }

    fn handoff_target(&self) -> Option<&'static str> {
        Some(AgentKind::Greeter.name())
    }

    fn execute(&self, _args: Value, ctx: &mut ToolContext<'_>) -> Result<HandoffDirective> {
        if !ctx.userdata.has_expense() {
            return Ok(HandoffDirective::reply(MISSING_EXPENSE));
        }
        if !ctx.userdata.has_card_details() {
            return Ok(HandoffDirective::reply(MISSING_CARD));
        }

        let directive = ctx.transfer_to(AgentKind::Greeter.name())?;
        if let Err(e) = ctx.userdata.mark_checked_out() {
            return Ok(HandoffDirective::reply(e.to_string()));
        }
        Ok(directive)
    }
}

fn apply_update(
    ctx: &mut ToolContext<'_>,
    update: FieldUpdate,
    reply: String,
) -> Result<HandoffDirective> {
    match ctx.userdata.apply(update) {
        Ok(()) => Ok(HandoffDirective::Reply(reply)),
        Err(e) => Ok(HandoffDirective::reply(e.to_string())),
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
