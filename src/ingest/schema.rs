//! Field schemas and typed row conversion.

use super::Row;
use crate::{Error, Result};

/// Numeric type a field must convert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float. `nan`/`inf` are accepted and left to the evaluator.
    Real,
    /// Boolean written either as an integer (non-zero = true) or `true`/`false`.
    Flag,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::Int => "integer",
            FieldKind::Real => "real",
            FieldKind::Flag => "flag",
        }
    }

    /// Convert a raw field value, or `None` if it does not fit this kind.
    pub fn parse(self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        match self {
            FieldKind::Int => raw.parse::<i64>().ok().map(Value::Int),
            FieldKind::Real => raw.parse::<f64>().ok().map(Value::Real),
            FieldKind::Flag => {
                if let Ok(i) = raw.parse::<i64>() {
                    return Some(Value::Flag(i != 0));
                }
                if raw.eq_ignore_ascii_case("true") {
                    Some(Value::Flag(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Value::Flag(false))
                } else {
                    None
                }
            }
        }
    }
}

/// A converted field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Flag(bool),
}

/// A required field: canonical name, kind, and accepted alternative names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub aliases: &'static [&'static str],
}

impl Field {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
            aliases: &[],
        }
    }

    pub const fn real(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Real,
            aliases: &[],
        }
    }

    pub const fn flag(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Flag,
            aliases: &[],
        }
    }

    /// Accept `aliases` as alternative column names for this field.
    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }

    /// The first of (name, aliases...) for which `has_key` returns true.
    fn resolve(&self, has_key: impl Fn(&str) -> bool) -> Option<&'static str> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .find(|key| has_key(*key))
    }
}

/// Ordered list of required fields for one kind of row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [Field]) -> Self {
        Self { name, fields }
    }

    /// Check that every required field is present in `keys`.
    ///
    /// Used once against a file header so a missing column fails before any
    /// row is converted.
    pub fn check_keys<'k, I>(&self, keys: I, line: usize) -> Result<()>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let keys: Vec<&str> = keys.into_iter().collect();
        for field in self.fields {
            if field.resolve(|k| keys.contains(&k)).is_none() {
                return Err(Error::Schema {
                    field: field.name.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    /// Convert every required field of `row` to its kind.
    ///
    /// Fields are checked for presence before any value is converted, so a
    /// row that is both short and malformed reports the schema problem.
    pub fn parse(&self, row: &Row) -> Result<TypedRow> {
        let mut present = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let key = field
                .resolve(|k| row.contains_key(k))
                .ok_or_else(|| Error::Schema {
                    field: field.name.to_string(),
                    line: row.line(),
                })?;
            present.push((field, key));
        }

        let mut values = Vec::with_capacity(present.len());
        for (field, key) in present {
            let raw = row.get(key).unwrap_or_default();
            let value = field.kind.parse(raw).ok_or_else(|| Error::Parse {
                field: key.to_string(),
                value: raw.to_string(),
                expected: field.kind.name(),
                line: row.line(),
            })?;
            values.push((field.name, value));
        }

        Ok(TypedRow {
            line: row.line(),
            values,
        })
    }
}

/// A row whose required fields have all been converted.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRow {
    line: usize,
    values: Vec<(&'static str, Value)>,
}

impl TypedRow {
    pub fn line(&self) -> usize {
        self.line
    }

    fn value(&self, name: &str) -> Result<Value> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| Error::Schema {
                field: name.to_string(),
                line: self.line,
            })
    }

    fn mismatch(&self, name: &str, value: Value, expected: &'static str) -> Error {
        Error::Parse {
            field: name.to_string(),
            value: format!("{:?}", value),
            expected,
            line: self.line,
        }
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        match self.value(name)? {
            Value::Int(i) => Ok(i),
            other => Err(self.mismatch(name, other, FieldKind::Int.name())),
        }
    }

    pub fn real(&self, name: &str) -> Result<f64> {
        match self.value(name)? {
            Value::Real(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            other => Err(self.mismatch(name, other, FieldKind::Real.name())),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool> {
        match self.value(name)? {
            Value::Flag(b) => Ok(b),
            other => Err(self.mismatch(name, other, FieldKind::Flag.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT_FIELDS: &[Field] = &[
        Field::int("step"),
        Field::real("x"),
        Field::flag("ok"),
        Field::int("hits_window").with_aliases(&["hits"]),
    ];

    static POINT_SCHEMA: Schema = Schema::new("point", POINT_FIELDS);

    fn full_row() -> Row {
        Row::new(2)
            .with("step", "5")
            .with("x", " 1.5 ")
            .with("ok", "1")
            .with("hits_window", "3")
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!(FieldKind::Int.parse("-12"), Some(Value::Int(-12)));
        assert_eq!(FieldKind::Int.parse("1.0"), None);
        assert_eq!(FieldKind::Real.parse("2.5e-3"), Some(Value::Real(2.5e-3)));
        assert_eq!(FieldKind::Real.parse("abc"), None);
        assert_eq!(FieldKind::Flag.parse("0"), Some(Value::Flag(false)));
        assert_eq!(FieldKind::Flag.parse("2"), Some(Value::Flag(true)));
        assert_eq!(FieldKind::Flag.parse("TRUE"), Some(Value::Flag(true)));
        assert_eq!(FieldKind::Flag.parse("yes"), None);

        match FieldKind::Real.parse("nan") {
            Some(Value::Real(x)) => assert!(x.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_row() {
        let typed = POINT_SCHEMA.parse(&full_row()).unwrap();
        assert_eq!(typed.line(), 2);
        assert_eq!(typed.int("step").unwrap(), 5);
        assert_eq!(typed.real("x").unwrap(), 1.5);
        assert!(typed.flag("ok").unwrap());
        assert_eq!(typed.int("hits_window").unwrap(), 3);
    }

    #[test]
    fn test_alias_is_accepted() {
        let mut row = full_row();
        row.remove("hits_window");
        row.insert("hits", "9");

        let typed = POINT_SCHEMA.parse(&row).unwrap();
        assert_eq!(typed.int("hits_window").unwrap(), 9);
    }

    #[test]
    fn test_missing_field_is_schema_error() {
        let mut row = full_row();
        row.remove("x");
        row.insert("ok", "not-a-flag");

        match POINT_SCHEMA.parse(&row) {
            Err(Error::Schema { field, line }) => {
                assert_eq!(field, "x");
                assert_eq!(line, 2);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_value_is_parse_error() {
        let row = full_row().with("step", "four");

        match POINT_SCHEMA.parse(&row) {
            Err(Error::Parse {
                field,
                value,
                expected,
                line,
            }) => {
                assert_eq!(field, "step");
                assert_eq!(value, "four");
                assert_eq!(expected, "integer");
                assert_eq!(line, 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_keys() {
        let header = ["step", "x", "ok", "hits", "extra"];
        assert!(POINT_SCHEMA.check_keys(header, 1).is_ok());

        let short = ["step", "ok", "hits"];
        match POINT_SCHEMA.check_keys(short, 1) {
            Err(Error::Schema { field, .. }) => assert_eq!(field, "x"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }
}
