//! Order pricing - pure calculation of subtotal, tax, and total.
//!
//! All money values are integer cents (never floats in storage!). The only
//! floating-point step is the tax percentage multiply, which is rounded
//! half away from zero back to whole cents.
//!
//! Nothing in this module touches the database or the network, so every
//! property here is unit-testable without fixtures.

/// Smallest quantity accepted for a single order line.
pub const MIN_LINE_QUANTITY: i32 = 1;

/// Largest quantity accepted for a single order line.
///
/// Prevents accidental over-ordering (e.g. typing 100 instead of 10).
pub const MAX_LINE_QUANTITY: i32 = 99;

/// One order line as priced: a unit price snapshot and a requested quantity.
#[derive(Debug, Clone, Copy)]
pub struct PricedLine {
    /// Menu price at the moment of ordering, in cents
    pub unit_price_cents: i64,

    /// Requested quantity (clamped before use)
    pub quantity: i32,
}

/// Computed totals for an order.
///
/// Derived, never stored independently of the lines that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    /// Sum of unit price x clamped quantity across all lines, in cents
    pub subtotal_cents: i64,

    /// round(subtotal x rate / 100), in cents
    pub tax_cents: i64,

    /// subtotal + tax, in cents
    pub total_cents: i64,
}

/// Clamp a requested quantity into the accepted range [1, 99].
///
/// Zero and negative quantities become 1 rather than an error: a line the
/// customer added is a line they want at least one of.
pub fn clamp_quantity(quantity: i32) -> i32 {
    quantity.clamp(MIN_LINE_QUANTITY, MAX_LINE_QUANTITY)
}

/// Price an order from its lines and the restaurant's tax rate.
///
/// # Contract
///
/// - Quantities are clamped to [1, 99] before multiplying
/// - `subtotal = Σ(unit_price_cents × clamped_quantity)`
/// - `tax = round(subtotal × tax_rate_percent / 100)`, half away from zero
/// - `total = subtotal + tax`
///
/// Deterministic, no side effects.
///
/// # Example
///
/// Two items at 650 cents with a 16% tax rate price to subtotal 1300,
/// tax 208, total 1508.
pub fn price_order(lines: &[PricedLine], tax_rate_percent: f64) -> OrderTotals {
    let subtotal_cents: i64 = lines
        .iter()
        .map(|line| line.unit_price_cents * i64::from(clamp_quantity(line.quantity)))
        .sum();

    let tax_cents = ((subtotal_cents as f64) * tax_rate_percent / 100.0).round() as i64;

    OrderTotals {
        subtotal_cents,
        tax_cents,
        total_cents: subtotal_cents + tax_cents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_clamps_into_range() {
        assert_eq!(clamp_quantity(0), 1);
        assert_eq!(clamp_quantity(-5), 1);
        assert_eq!(clamp_quantity(1), 1);
        assert_eq!(clamp_quantity(50), 50);
        assert_eq!(clamp_quantity(99), 99);
        assert_eq!(clamp_quantity(100), 99);
        assert_eq!(clamp_quantity(i32::MAX), 99);
    }

    #[test]
    fn reference_scenario_650_times_2_at_16_percent() {
        let totals = price_order(
            &[PricedLine {
                unit_price_cents: 650,
                quantity: 2,
            }],
            16.0,
        );

        assert_eq!(totals.subtotal_cents, 1300);
        assert_eq!(totals.tax_cents, 208);
        assert_eq!(totals.total_cents, 1508);
    }

    #[test]
    fn total_is_subtotal_plus_tax() {
        let lines = [
            PricedLine {
                unit_price_cents: 1099,
                quantity: 3,
            },
            PricedLine {
                unit_price_cents: 250,
                quantity: 1,
            },
        ];

        for rate in [0.0, 5.0, 8.25, 16.0, 21.0] {
            let totals = price_order(&lines, rate);
            assert_eq!(
                totals.total_cents,
                totals.subtotal_cents + totals.tax_cents,
                "rate {rate}"
            );
        }
    }

    #[test]
    fn zero_rate_means_zero_tax() {
        let totals = price_order(
            &[PricedLine {
                unit_price_cents: 500,
                quantity: 4,
            }],
            0.0,
        );

        assert_eq!(totals.subtotal_cents, 2000);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.total_cents, 2000);
    }

    #[test]
    fn tax_rounds_half_away_from_zero() {
        // 150 * 5% = 7.5 -> 8
        let totals = price_order(
            &[PricedLine {
                unit_price_cents: 150,
                quantity: 1,
            }],
            5.0,
        );
        assert_eq!(totals.tax_cents, 8);

        // 101 * 5% = 5.05 -> 5
        let totals = price_order(
            &[PricedLine {
                unit_price_cents: 101,
                quantity: 1,
            }],
            5.0,
        );
        assert_eq!(totals.tax_cents, 5);
    }

    #[test]
    fn empty_order_prices_to_zero() {
        let totals = price_order(&[], 16.0);
        assert_eq!(
            totals,
            OrderTotals {
                subtotal_cents: 0,
                tax_cents: 0,
                total_cents: 0
            }
        );
    }

    #[test]
    fn oversized_quantity_is_priced_as_99() {
        let totals = price_order(
            &[PricedLine {
                unit_price_cents: 100,
                quantity: 1000,
            }],
            0.0,
        );
        assert_eq!(totals.subtotal_cents, 9900);
    }
}
