//! Matching a requested recipe ingredient against pantry stock.
//!
//! Lookup is by exact inventory name. Units are opaque labels and are never
//! compared. Nothing here commits; the caller owns the transaction.

use diesel::prelude::*;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{format_quantity, parse_quantity, InventoryItem, Quantity};
use crate::query;
use crate::schema::inventory;

/// An inventory row whose quantity was rewritten by a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryUpdate {
    pub id: i32,
    pub name: String,
    pub old_quantity: String,
    pub new_quantity: String,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// No inventory item carries the requested name.
    NoMatch,
    Decremented(InventoryUpdate),
    /// Stock matched the request exactly; the row is gone. Holds the row as it was.
    Exhausted(InventoryItem),
    /// Stock fell short; the whole row was discarded. Holds the row as it was.
    InsufficientDeleted(InventoryItem),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StockDecision {
    Consume { remaining: f64 },
    Exhaust,
    Discard,
}

/// Pure stock policy. A NaN on either side never counts as sufficient.
pub fn decide(stored: f64, requested: f64) -> StockDecision {
    if stored >= requested {
        let remaining = stored - requested;
        if remaining == 0.0 {
            StockDecision::Exhaust
        } else {
            StockDecision::Consume { remaining }
        }
    } else {
        StockDecision::Discard
    }
}

pub fn reconcile(
    conn: &SqliteConnection,
    name: &str,
    requested: &Quantity,
) -> Result<Reconciliation, ApiError> {
    let item = match query::find_inventory_by_name(conn, name)? {
        Some(item) => item,
        None => return Ok(Reconciliation::NoMatch),
    };

    let invalid = || ApiError::InvalidQuantityFormat(name.to_string());
    let stored = parse_quantity(&item.quantity).ok_or_else(invalid)?;
    let wanted = requested.as_f64().ok_or_else(invalid)?;

    let outcome = match decide(stored, wanted) {
        StockDecision::Consume { remaining } => {
            let new_quantity = format_quantity(remaining);
            diesel::update(&item)
                .set(inventory::quantity.eq(&new_quantity))
                .execute(conn)?;
            Reconciliation::Decremented(InventoryUpdate {
                id: item.id,
                name: item.name,
                old_quantity: format_quantity(stored),
                new_quantity,
                unit: item.unit,
            })
        }
        StockDecision::Exhaust => {
            diesel::delete(&item).execute(conn)?;
            Reconciliation::Exhausted(item)
        }
        StockDecision::Discard => {
            diesel::delete(&item).execute(conn)?;
            Reconciliation::InsufficientDeleted(item)
        }
    };
    log::debug!("reconciled {:?}: {:?}", name, outcome);
    Ok(outcome)
}
