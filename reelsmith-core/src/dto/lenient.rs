//! Lenient field deserializers
//!
//! Optional request fields that fall back to a default instead of failing the
//! whole request. Any value that cannot be read as the target type becomes
//! `None`. Numeric strings are accepted because query strings and the
//! provider wire format carry numbers as text.

use serde::{Deserialize, Deserializer, de::IgnoredAny};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Loose {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            Loose::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Loose::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// `Option<String>` that also takes numbers, rendered as text
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Loose::Text(s) => Some(s),
        Loose::Int(n) => Some(n.to_string()),
        Loose::Float(f) => Some(f.to_string()),
        Loose::Other(_) => None,
    }))
}

/// `Option<u32>`; anything other than a whole number in range becomes `None`
pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Loose::as_i64)
        .and_then(|n| u32::try_from(n).ok()))
}

/// `Option<i64>`; non-numeric values become `None`
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Loose::as_i64))
}
