//! # Stock Module
//!
//! Stock movement arithmetic and sale line computation.
//!
//! ## Movement Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  IN      stock' = stock + q                                            │
//! │  OUT     stock' = max(0, stock - q)                                    │
//! │  DAMAGE  stock' = max(0, stock - q)                                    │
//! │                                                                         │
//! │  The ledger records the requested q even when the result is clamped.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database applies these rules in a single UPDATE statement so that
//! concurrent sales never read stale stock.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewSaleLine, TransactionType};

impl TransactionType {
    /// Whether this movement adds stock.
    #[inline]
    pub const fn is_inbound(&self) -> bool {
        matches!(self, TransactionType::In)
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// A priced sale line, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
}

/// Sale lines with their totals computed.
///
/// ## Flow
/// ```text
/// NewSale.items ──► SaleDraft::from_lines ──► verify_submitted_total
///                         │                          │
///                         │ each line: q × unit      │ client total must match
///                         ▼                          ▼
///                   PricedLine[]              total_amount_cents
///                         │
///                         ▼
///            SaleRepository::record_sale (one DB transaction)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    pub lines: Vec<PricedLine>,
    pub total_amount_cents: i64,
}

impl SaleDraft {
    /// Prices every line and sums the sale total.
    ///
    /// Fails on an empty sale, too many lines, an oversize quantity or
    /// arithmetic overflow.
    pub fn from_lines(lines: &[NewSaleLine]) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptySale);
        }

        if lines.len() > crate::MAX_SALE_ITEMS {
            return Err(CoreError::TooManyItems {
                max: crate::MAX_SALE_ITEMS,
            });
        }

        let mut total = Money::zero();
        let mut priced = Vec::with_capacity(lines.len());

        for line in lines {
            if line.quantity > crate::MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: line.quantity,
                    max: crate::MAX_ITEM_QUANTITY,
                });
            }

            let line_total = Money::from_cents(line.unit_price_cents)
                .checked_multiply_quantity(line.quantity)
                .ok_or(CoreError::AmountOverflow)?;
            total = total.checked_add(line_total).ok_or(CoreError::AmountOverflow)?;

            priced.push(PricedLine {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_price_cents: line_total.cents(),
            });
        }

        Ok(SaleDraft {
            lines: priced,
            total_amount_cents: total.cents(),
        })
    }

    /// Checks a client-supplied total against the computed one.
    pub fn verify_submitted_total(&self, submitted: Option<i64>) -> CoreResult<()> {
        match submitted {
            Some(submitted) if submitted != self.total_amount_cents => Err(CoreError::TotalMismatch {
                computed: self.total_amount_cents,
                submitted,
            }),
            _ => Ok(()),
        }
    }

    /// Total units across all lines.
    pub fn items_sold(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
