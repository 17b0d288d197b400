//! Parameter declarations and values.

use serde::{Deserialize, Serialize};

/// A named parameter, used both for module declarations (where `value` is
/// the default) and for instance overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Default value, or the override value on an instance. `None` on a
    /// declaration makes the parameter mandatory.
    #[serde(default)]
    pub value: Option<ParamValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

impl Param {
    /// Create a parameter with a value.
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            desc: None,
        }
    }

    /// Create a parameter declaration without a default.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            desc: None,
        }
    }

    /// Attach a description.
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

/// A parameter value. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    Int(i64),
    Double(f64),
    /// String literal, netlisted in double quotes.
    String(String),
    /// Raw literal, netlisted verbatim. Typically an expression.
    Literal(String),
    /// Number with an SI prefix.
    Prefixed(Prefixed),
}

impl ParamValue {
    /// A raw (unquoted) literal such as an expression.
    pub fn literal(s: impl Into<String>) -> Self {
        ParamValue::Literal(s.into())
    }

    /// A quoted string value.
    pub fn string(s: impl Into<String>) -> Self {
        ParamValue::String(s.into())
    }

    /// A number scaled by an SI prefix.
    pub fn prefixed(number: impl Into<PrefixedNumber>, prefix: SiPrefix) -> Self {
        ParamValue::Prefixed(Prefixed {
            prefix,
            number: number.into(),
        })
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Double(v)
    }
}

impl From<Prefixed> for ParamValue {
    fn from(v: Prefixed) -> Self {
        ParamValue::Prefixed(v)
    }
}

/// Mantissa and SI prefix, e.g. `1` and `Kilo` for 1k.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefixed {
    pub prefix: SiPrefix,
    pub number: PrefixedNumber,
}

/// Mantissa of a [`Prefixed`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixedNumber {
    Int(i64),
    Double(f64),
    /// Decimal string, kept verbatim.
    String(String),
}

impl From<i64> for PrefixedNumber {
    fn from(v: i64) -> Self {
        PrefixedNumber::Int(v)
    }
}

impl From<i32> for PrefixedNumber {
    fn from(v: i32) -> Self {
        PrefixedNumber::Int(v.into())
    }
}

impl From<f64> for PrefixedNumber {
    fn from(v: f64) -> Self {
        PrefixedNumber::Double(v)
    }
}

impl From<&str> for PrefixedNumber {
    fn from(v: &str) -> Self {
        PrefixedNumber::String(v.to_string())
    }
}

/// SI prefixes, yocto through yotta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiPrefix {
    Yocto,
    Zepto,
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    /// No scaling.
    Unit,
    Deca,
    Hecto,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Zetta,
    Yotta,
}

impl SiPrefix {
    /// Power-of-ten exponent of this prefix.
    pub fn exponent(self) -> i32 {
        match self {
            SiPrefix::Yocto => -24,
            SiPrefix::Zepto => -21,
            SiPrefix::Atto => -18,
            SiPrefix::Femto => -15,
            SiPrefix::Pico => -12,
            SiPrefix::Nano => -9,
            SiPrefix::Micro => -6,
            SiPrefix::Milli => -3,
            SiPrefix::Centi => -2,
            SiPrefix::Deci => -1,
            SiPrefix::Unit => 0,
            SiPrefix::Deca => 1,
            SiPrefix::Hecto => 2,
            SiPrefix::Kilo => 3,
            SiPrefix::Mega => 6,
            SiPrefix::Giga => 9,
            SiPrefix::Tera => 12,
            SiPrefix::Peta => 15,
            SiPrefix::Exa => 18,
            SiPrefix::Zetta => 21,
            SiPrefix::Yotta => 24,
        }
    }
}
