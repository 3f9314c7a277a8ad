use std::fmt;

use rust_decimal::Decimal;

/// Running cost of the checked activities.
///
/// Costs are exact decimals, so no drift accumulates across toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningTotal {
    value: Decimal,
}

impl RunningTotal {
    pub fn new(seed: Decimal) -> Self {
        Self { value: seed }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Adds `cost` for a newly checked activity, subtracts it for a newly
    /// unchecked one.
    pub fn apply(
        &mut self,
        cost: Decimal,
        checked: bool,
    ) -> Decimal {
        if checked {
            self.value += cost;
        } else {
            self.value -= cost;
        }
        self.value
    }

    /// Text written into the total element: the plain number, without
    /// currency formatting or trailing zeros.
    pub fn render(&self) -> String {
        self.value.normalize().to_string()
    }
}

impl fmt::Display for RunningTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn apply_adds_and_subtracts() {
        let mut total = RunningTotal::default();

        assert_eq!(total.apply(dec!(200), true), dec!(200));
        assert_eq!(total.apply(dec!(100), true), dec!(300));
        assert_eq!(total.apply(dec!(200), false), dec!(100));
    }

    #[test]
    fn render_drops_trailing_zeros() {
        let total = RunningTotal::new(dec!(12.50));

        assert_eq!(total.render(), "12.5");
        assert_eq!(RunningTotal::new(dec!(300)).render(), "300");
        assert_eq!(RunningTotal::new(dec!(0.00)).render(), "0");
    }

    #[test]
    fn fractional_costs_do_not_drift() {
        let mut total = RunningTotal::default();
        for _ in 0..10 {
            total.apply(dec!(0.1), true);
        }

        assert_eq!(total.value(), dec!(1.0));
        assert_eq!(total.render(), "1");
    }
}
