//! Parameter value conversion and instance parameter resolution.

use indexmap::IndexMap;
use spicenet_ir::{Param, ParamValue, PrefixedNumber};

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// A parameter value converted to netlist text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamText {
    pub text: String,
    /// Came from a raw literal, and is wrapped as an expression on output.
    pub expr: bool,
}

impl ParamText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expr: false,
        }
    }

    /// Final text in `dialect`.
    pub fn render(&self, dialect: Dialect) -> String {
        if self.expr {
            dialect.expression(&self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Format a double as the shortest decimal that reads back to the same value.
///
/// Integral values keep a trailing `.0`; very large and very small
/// magnitudes use exponent notation, e.g. `1e-12`.
pub fn format_double(value: f64) -> String {
    format!("{value:?}")
}

/// Convert one parameter value to netlist text.
pub fn param_text(dialect: Dialect, name: &str, value: &ParamValue) -> Result<ParamText> {
    let invalid = |reason: &str| Error::InvalidParamValue {
        param: name.to_string(),
        reason: reason.to_string(),
    };
    match value {
        ParamValue::Int(i) => Ok(ParamText::plain(i.to_string())),
        ParamValue::Double(d) if !d.is_finite() => Err(invalid("non-finite double")),
        ParamValue::Double(d) => Ok(ParamText::plain(format_double(*d))),
        ParamValue::String(s) => Ok(ParamText::plain(format!("\"{s}\""))),
        ParamValue::Literal(s) => Ok(ParamText {
            text: s.clone(),
            expr: true,
        }),
        ParamValue::Prefixed(p) => {
            let mantissa = match &p.number {
                PrefixedNumber::Int(i) => i.to_string(),
                PrefixedNumber::Double(d) if !d.is_finite() => {
                    return Err(invalid("non-finite mantissa"));
                }
                PrefixedNumber::Double(d) => format_double(*d),
                PrefixedNumber::String(s) => {
                    if s.trim().parse::<f64>().is_err() {
                        return Err(invalid("mantissa is not a number"));
                    }
                    s.trim().to_string()
                }
            };
            let suffix = dialect.si_suffix(p.prefix);
            if suffix.starts_with('e') && mantissa.contains(|c: char| c == 'e' || c == 'E') {
                return Err(invalid("exponent mantissa cannot take an exponent prefix"));
            }
            Ok(ParamText::plain(format!("{mantissa}{suffix}")))
        }
    }
}

/// Ordered name to value table for one instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParams {
    values: IndexMap<String, ParamText>,
}

impl ResolvedParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ParamText> {
        self.values.get(name)
    }

    /// Insert or replace, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: ParamText) {
        self.values.insert(name.into(), value);
    }

    /// Insert at the front.
    pub fn set_first(&mut self, name: impl Into<String>, value: ParamText) {
        self.values.shift_insert(0, name.into(), value);
    }

    /// Remove and return a value, preserving the order of the rest.
    pub fn pop(&mut self, name: &str) -> Result<ParamText> {
        self.values
            .shift_remove(name)
            .ok_or_else(|| Error::MissingParameter {
                param: name.to_string(),
            })
    }

    /// Pop several values, in the given order.
    pub fn pop_many(&mut self, names: &[&str]) -> Result<Vec<ParamText>> {
        names.iter().map(|n| self.pop(n)).collect()
    }

    /// Rename an entry in place. Missing entries are left alone.
    pub fn rename(&mut self, from: &str, to: &str) {
        if let Some((index, _, value)) = self.values.shift_remove_full(from) {
            self.values.shift_insert(index, to.to_string(), value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamText)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `name=value` pairs in order, rendered for `dialect`.
    pub fn assignments(&self, dialect: Dialect) -> Vec<String> {
        self.iter()
            .map(|(k, v)| format!("{k}={}", v.render(dialect)))
            .collect()
    }
}

/// Merge instance overrides with the declared parameters of its target.
///
/// Declared parameters come first, in declaration order, taking the override
/// if present and the default otherwise. Overrides the target does not
/// declare follow in their original order.
pub fn resolve_params(
    dialect: Dialect,
    overrides: &[Param],
    declared: &[Param],
) -> Result<ResolvedParams> {
    let mut given: IndexMap<&str, ParamText> = IndexMap::with_capacity(overrides.len());
    for p in overrides {
        let value = p.value.as_ref().ok_or_else(|| Error::InvalidParamValue {
            param: p.name.clone(),
            reason: "override has no value".to_string(),
        })?;
        given.insert(p.name.as_str(), param_text(dialect, &p.name, value)?);
    }

    let mut resolved = ResolvedParams::new();
    for decl in declared {
        let value = match given.shift_remove(decl.name.as_str()) {
            Some(v) => v,
            None => match &decl.value {
                Some(default) => param_text(dialect, &decl.name, default)?,
                None => {
                    return Err(Error::MissingParameter {
                        param: decl.name.clone(),
                    });
                }
            },
        };
        resolved.set(decl.name.clone(), value);
    }

    for (name, value) in given {
        log::warn!("passing through undeclared parameter `{name}`");
        resolved.set(name, value);
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spicenet_ir::SiPrefix;

    fn text(dialect: Dialect, value: ParamValue) -> String {
        param_text(dialect, "p", &value)
            .expect("value should convert")
            .render(dialect)
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(1e3), "1000.0");
        assert_eq!(format_double(0.5), "0.5");
        assert_eq!(format_double(1e-12), "1e-12");
        assert_eq!(format_double(-2.0), "-2.0");
    }

    #[test]
    fn test_value_variants() {
        let d = Dialect::Spice;
        assert_eq!(text(d, ParamValue::Int(5)), "5");
        assert_eq!(text(d, ParamValue::Double(1e3)), "1000.0");
        assert_eq!(text(d, ParamValue::string("tt")), "\"tt\"");
        assert_eq!(text(d, ParamValue::literal("1k")), "'1k'");
        assert_eq!(text(Dialect::Xyce, ParamValue::literal("w*2")), "{w*2}");
        assert_eq!(text(d, ParamValue::prefixed(1, SiPrefix::Kilo)), "1k");
        assert_eq!(text(d, ParamValue::prefixed(2.5, SiPrefix::Nano)), "2.5n");
        assert_eq!(text(d, ParamValue::prefixed("3", SiPrefix::Centi)), "3e-2");
        assert_eq!(
            text(Dialect::Verilog, ParamValue::prefixed(4, SiPrefix::Micro)),
            "4e-6"
        );
    }

    #[test]
    fn test_malformed_values() {
        let d = Dialect::Spice;
        assert!(param_text(d, "p", &ParamValue::Double(f64::NAN)).is_err());
        assert!(param_text(d, "p", &ParamValue::prefixed("", SiPrefix::Kilo)).is_err());
        assert!(param_text(d, "p", &ParamValue::prefixed("abc", SiPrefix::Kilo)).is_err());
        assert!(param_text(d, "p", &ParamValue::prefixed(1e-30, SiPrefix::Centi)).is_err());
        let err = param_text(d, "w", &ParamValue::Double(f64::INFINITY)).unwrap_err();
        assert!(matches!(err, Error::InvalidParamValue { ref param, .. } if param == "w"));
    }

    #[test]
    fn test_precedence() {
        let declared = vec![Param::new("r", ParamValue::literal("1k"))];
        let d = Dialect::Spice;

        let defaulted = resolve_params(d, &[], &declared).unwrap();
        assert_eq!(defaulted.get("r").unwrap().text, "1k");

        let overridden = resolve_params(d, &[Param::new("r", 500)], &declared).unwrap();
        assert_eq!(overridden.assignments(d), vec!["r=500".to_string()]);

        let required = vec![Param::required("r")];
        let err = resolve_params(d, &[], &required).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { ref param } if param == "r"));
    }

    #[test]
    fn test_declared_order_then_extras() {
        let declared = vec![
            Param::new("w", 1),
            Param::new("l", 2),
            Param::required("nf"),
        ];
        let overrides = vec![
            Param::new("mult", 4),
            Param::new("nf", 2),
            Param::new("l", 3),
            Param::new("extra", ParamValue::literal("x")),
        ];
        let resolved = resolve_params(Dialect::Spice, &overrides, &declared).unwrap();
        let names: Vec<_> = resolved.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["w", "l", "nf", "mult", "extra"]);
        assert_eq!(resolved.get("l").unwrap().text, "3");
    }

    #[test]
    fn test_override_without_value() {
        let err = resolve_params(Dialect::Spice, &[Param::required("w")], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidParamValue { .. }));
    }

    #[test]
    fn test_pop_and_rename() {
        let mut params = ResolvedParams::new();
        params.set("a", ParamText::plain("1"));
        params.set("b", ParamText::plain("2"));
        params.set("c", ParamText::plain("3"));

        params.rename("b", "bee");
        params.set_first("type", ParamText::plain("dc"));
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["type", "a", "bee", "c"]);

        let popped = params.pop_many(&["c", "a"]).unwrap();
        assert_eq!(popped[0].text, "3");
        assert_eq!(popped[1].text, "1");
        assert_eq!(params.len(), 2);
        assert!(params.pop("zzz").is_err());
    }
}
