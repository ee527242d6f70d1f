use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::outcome::SaleOutcome;
use crate::models::position::Position;
use crate::models::search::SearchQuery;
use crate::services::input::{BuyOrder, PriceUpdate, SellOrder};

/// Applies buy/sell/price-update commands to a ledger and answers searches.
///
/// Pure business logic — no I/O, no logging. Every command validates fully
/// before it mutates, so a failed call leaves the ledger untouched.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Record a purchase.
    pub fn buy(&self, ledger: &mut Ledger, order: BuyOrder) -> Result<Position, CoreError> {
        let position = Position::new(
            order.kind,
            order.symbol,
            order.name,
            order.quantity,
            order.price,
        );
        self.absorb(ledger, position)
    }

    /// Add a lot to the ledger.
    ///
    /// A symbol already held is topped up: quantities are summed, the lot's
    /// book value is added and the price becomes the lot's price. The held
    /// name is kept. A lot whose kind differs from the held one is rejected.
    pub fn absorb(&self, ledger: &mut Ledger, lot: Position) -> Result<Position, CoreError> {
        if !lot.book_value.is_finite() {
            return Err(book_value_overflow(&lot.symbol));
        }
        let Some(idx) = ledger.index_of(&lot.symbol) else {
            ledger.push(lot.clone());
            return Ok(lot);
        };
        let existing = ledger.position_at_mut(idx);

        if existing.kind != lot.kind {
            return Err(CoreError::Validation(format!(
                "{} is already held as a {}, cannot buy it as a {}",
                existing.symbol, existing.kind, lot.kind
            )));
        }
        let quantity = existing.quantity.checked_add(lot.quantity).ok_or_else(|| {
            CoreError::Validation(format!("quantity of {} would overflow", existing.symbol))
        })?;
        let book_value = existing.book_value + lot.book_value;
        if !book_value.is_finite() {
            return Err(book_value_overflow(&existing.symbol));
        }

        existing.quantity = quantity;
        existing.book_value = book_value;
        existing.price = lot.price;
        Ok(existing.clone())
    }

    /// Sell units of a held position at its current price.
    ///
    /// Book value shrinks in proportion to the units kept. Selling the whole
    /// quantity removes the position.
    pub fn sell(&self, ledger: &mut Ledger, order: SellOrder) -> Result<SaleOutcome, CoreError> {
        let idx = ledger
            .index_of(&order.symbol)
            .ok_or_else(|| CoreError::NotFound(order.symbol.clone()))?;

        let held = ledger.positions()[idx].quantity;
        if order.quantity > held {
            return Err(CoreError::InsufficientQuantity {
                symbol: order.symbol,
                requested: order.quantity,
                held,
            });
        }

        let remaining_quantity = held - order.quantity;
        let position = &ledger.positions()[idx];
        let old_book_value = position.book_value;
        let new_book_value = if remaining_quantity == 0 {
            0.0
        } else {
            old_book_value * (remaining_quantity as f64 / held as f64)
        };
        let price = position.price;
        let proceeds = price * order.quantity as f64;
        let book_value_sold = old_book_value - new_book_value;

        let remaining = if remaining_quantity == 0 {
            ledger.remove_at(idx);
            None
        } else {
            let position = ledger.position_at_mut(idx);
            position.quantity = remaining_quantity;
            position.book_value = new_book_value;
            Some(position.clone())
        };

        Ok(SaleOutcome {
            symbol: order.symbol,
            quantity_sold: order.quantity,
            price,
            proceeds,
            book_value_sold,
            realized_gain: proceeds - book_value_sold,
            remaining,
        })
    }

    /// Set the market price of a held position. Quantity and book value stay as they are.
    pub fn update_price(&self, ledger: &mut Ledger, update: PriceUpdate) -> Result<Position, CoreError> {
        let position = ledger
            .get_mut(&update.symbol)
            .ok_or_else(|| CoreError::NotFound(update.symbol.clone()))?;
        position.price = update.price;
        Ok(position.clone())
    }

    /// All positions satisfying `predicate`, in ledger order.
    pub fn search<'a, P>(&self, ledger: &'a Ledger, predicate: P) -> Vec<&'a Position>
    where
        P: Fn(&Position) -> bool,
    {
        ledger.iter().filter(|p| predicate(p)).collect()
    }

    /// All positions matching every filter in `query`, in ledger order.
    pub fn search_query<'a>(&self, ledger: &'a Ledger, query: &SearchQuery) -> Vec<&'a Position> {
        self.search(ledger, |p| query.matches(p))
    }
}

fn book_value_overflow(symbol: &str) -> CoreError {
    CoreError::Validation(format!("book value of {symbol} is out of range"))
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
