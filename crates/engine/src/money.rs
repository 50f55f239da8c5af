use std::fmt;

/// Whole-rupiah amount with Indonesian display formatting.
///
/// IDR carries no fractional unit in this business, so the raw value is the
/// number of rupiah. Domain amounts stay plain `i64`; wrap one in this type
/// where it has to be rendered for people, such as the CSV exports.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyIdr;
///
/// let amount = MoneyIdr::new(1_500_000);
/// assert_eq!(amount.rupiah(), 1_500_000);
/// assert_eq!(amount.to_string(), "Rp1.500.000");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyIdr(i64);

impl MoneyIdr {
    /// Creates a new amount from whole rupiah.
    #[must_use]
    pub const fn new(rupiah: i64) -> Self {
        Self(rupiah)
    }

    /// Returns the raw value in rupiah.
    #[must_use]
    pub const fn rupiah(self) -> i64 {
        self.0
    }
}

impl From<i64> for MoneyIdr {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyIdr> for i64 {
    fn from(value: MoneyIdr) -> Self {
        value.0
    }
}

impl fmt::Display for MoneyIdr {
    /// Formats as `Rp1.234.567` with `.` thousand separators, Indonesian
    /// style.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, ch) in digits.chars().enumerate() {
            if i != 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}Rp{grouped}")
    }
}
