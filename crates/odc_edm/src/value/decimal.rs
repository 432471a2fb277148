use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

// -----------------------------------------------------------------------------
// Decimal

/// Largest mantissa representable by the protocol's 96-bit decimal.
const MAX_MANTISSA: i128 = (1_i128 << 96) - 1;

/// A base-10 fixed point number with the range of the protocol's `Edm.Decimal`.
///
/// The value is `mantissa * 10^-scale`, with `|mantissa| < 2^96` and
/// `scale <= 28`. Trailing zeros are kept (`1.50` formats as `1.50`), but
/// equality is numeric.
///
/// # Examples
///
/// ```
/// use odc_edm::Decimal;
///
/// let a: Decimal = "1.50".parse().unwrap();
/// let b: Decimal = "1.5".parse().unwrap();
///
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1.50");
/// ```
#[derive(Clone, Copy, Debug, Default, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u8,
}

impl Decimal {
    pub const MAX_SCALE: u8 = 28;

    pub const ZERO: Self = Self {
        mantissa: 0,
        scale: 0,
    };

    pub const MAX: Self = Self {
        mantissa: MAX_MANTISSA,
        scale: 0,
    };

    pub const MIN: Self = Self {
        mantissa: -MAX_MANTISSA,
        scale: 0,
    };

    /// Creates `mantissa * 10^-scale`, or `None` when out of range.
    #[inline]
    pub const fn new(mantissa: i128, scale: u8) -> Option<Self> {
        if mantissa > MAX_MANTISSA || mantissa < -MAX_MANTISSA || scale > Self::MAX_SCALE {
            None
        } else {
            Some(Self { mantissa, scale })
        }
    }

    #[inline]
    pub const fn from_i64(value: i64) -> Self {
        Self {
            mantissa: value as i128,
            scale: 0,
        }
    }

    #[inline]
    pub const fn mantissa(&self) -> i128 {
        self.mantissa
    }

    #[inline]
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Returns the value as an integer if it has no fractional part.
    ///
    /// ```
    /// use odc_edm::Decimal;
    ///
    /// assert_eq!("12.000".parse::<Decimal>().unwrap().to_integer(), Some(12));
    /// assert_eq!("12.5".parse::<Decimal>().unwrap().to_integer(), None);
    /// ```
    pub fn to_integer(&self) -> Option<i128> {
        let divisor = 10_i128.pow(self.scale as u32);
        if self.mantissa % divisor == 0 {
            Some(self.mantissa / divisor)
        } else {
            None
        }
    }

    /// Nearest `f64` to this value.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10_f64.powi(self.scale as i32)
    }

    /// Removes trailing fractional zeros.
    pub fn normalized(&self) -> Self {
        let mut out = *self;
        while out.scale > 0 && out.mantissa % 10 == 0 {
            out.mantissa /= 10;
            out.scale -= 1;
        }
        out
    }

    /// Parses a decimal literal, optionally with an exponent.
    ///
    /// Fractional digits beyond the representable precision are rounded
    /// half away from zero. An integral part that does not fit is an error.
    pub(crate) fn parse_literal(text: &str, allow_exponent: bool) -> Result<Self, &'static str> {
        let bytes = text.as_bytes();
        let mut index = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                index += 1;
                true
            }
            Some(b'+') => {
                index += 1;
                false
            }
            _ => false,
        };

        let mut mantissa: i128 = 0;
        let mut scale: i32 = 0;
        let mut digits = 0;
        let mut round_up = false;
        let mut truncated = false;

        while let Some(&c) = bytes.get(index) {
            if !c.is_ascii_digit() {
                break;
            }
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((c - b'0') as i128))
                .filter(|m| *m <= MAX_MANTISSA)
                .ok_or("value is outside the decimal range")?;
            digits += 1;
            index += 1;
        }

        if bytes.get(index) == Some(&b'.') {
            index += 1;
            while let Some(&c) = bytes.get(index) {
                if !c.is_ascii_digit() {
                    break;
                }
                digits += 1;
                index += 1;
                if truncated {
                    continue;
                }
                let next = mantissa
                    .checked_mul(10)
                    .and_then(|m| m.checked_add((c - b'0') as i128))
                    .filter(|m| *m <= MAX_MANTISSA);
                match next {
                    Some(next) if scale < Decimal::MAX_SCALE as i32 => {
                        mantissa = next;
                        scale += 1;
                    }
                    _ => {
                        round_up = c >= b'5';
                        truncated = true;
                    }
                }
            }
        }

        if digits == 0 {
            return Err("no digits");
        }

        if let Some(&c) = bytes.get(index) {
            if !(c == b'e' || c == b'E') || !allow_exponent {
                return Err("unexpected character");
            }
            index += 1;
            let exponent: i32 = text
                .get(index..)
                .and_then(|rest| rest.strip_prefix('+').unwrap_or(rest).parse().ok())
                .ok_or("invalid exponent")?;
            scale = scale.checked_sub(exponent).ok_or("invalid exponent")?;
            index = bytes.len();
        }
        debug_assert_eq!(index, bytes.len());

        const RANGE: &str = "value is outside the decimal range";
        let max_scale = Decimal::MAX_SCALE as i32;

        if round_up {
            mantissa += 1;
            if mantissa > MAX_MANTISSA {
                if scale <= 0 {
                    return Err(RANGE);
                }
                mantissa = (mantissa + 5) / 10;
                scale -= 1;
            }
        }

        if mantissa == 0 {
            return Ok(Self {
                mantissa: 0,
                scale: scale.clamp(0, max_scale) as u8,
            });
        }

        // A non-zero mantissa times 10^29 exceeds the range.
        if scale < 0 {
            if scale < -28 {
                return Err(RANGE);
            }
            mantissa = mantissa
                .checked_mul(10_i128.pow(scale.unsigned_abs()))
                .filter(|m| *m <= MAX_MANTISSA)
                .ok_or(RANGE)?;
            scale = 0;
        }

        if scale > max_scale {
            let excess = (scale - max_scale) as u32;
            mantissa = if excess > 29 {
                0
            } else {
                let divisor = 10_i128.pow(excess);
                let rounded = mantissa / divisor;
                if (mantissa % divisor) * 2 >= divisor { rounded + 1 } else { rounded }
            };
            scale = max_scale;
        }

        Ok(Self {
            mantissa: if negative { -mantissa } else { mantissa },
            scale: scale as u8,
        })
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        // Widening to a common scale can overflow an i128.
        let a = self.normalized();
        let b = other.normalized();
        let scale = a.scale.max(b.scale) as u32;
        let lhs = a.mantissa.checked_mul(10_i128.pow(scale - a.scale as u32));
        let rhs = b.mantissa.checked_mul(10_i128.pow(scale - b.scale as u32));
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
            _ => a.to_f64().total_cmp(&b.to_f64()),
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = alloc::format!("{}", self.mantissa.unsigned_abs());
        let scale = self.scale as usize;
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}

impl FromStr for Decimal {
    type Err = &'static str;

    /// Parses the plain `[-]digits[.digits]` form, without exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_literal(s, false)
    }
}

impl From<i64> for Decimal {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i32> for Decimal {
    #[inline]
    fn from(value: i32) -> Self {
        Self::from_i64(value as i64)
    }
}

// -----------------------------------------------------------------------------
// Tests
