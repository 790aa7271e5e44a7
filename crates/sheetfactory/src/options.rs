//! Named writer options.
//!
//! A [`WriterOptions`] map pairs operation names (`setDelimiter`,
//! `set_use_bom`, ...) with their arguments. Each writer publishes a table of
//! [`OptionDef`]s; names are matched ignoring ASCII case and underscores, so
//! `setDelimiter`, `set_delimiter` and `SETDELIMITER` select the same setter.
//! Names a writer does not know are skipped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OptionError;
use crate::writer::SpreadsheetWriter;

/// Setter implementation signature
pub type OptionImpl<W> = fn(&mut W, &OptionArgs<'_>) -> Result<(), OptionError>;

/// One named setter of a writer
pub struct OptionDef<W> {
    /// Operation name (snake_case)
    pub name: &'static str,
    /// Arguments the setter needs; extra arguments are ignored
    pub min_args: usize,
    /// Implementation
    pub implementation: OptionImpl<W>,
}

impl<W> OptionDef<W> {
    /// Check the argument count and run the setter
    pub fn invoke(&self, target: &mut W, values: &[Value]) -> Result<(), OptionError> {
        if values.len() < self.min_args {
            return Err(OptionError::MissingArgument {
                operation: self.name,
                expected: self.min_args,
                actual: values.len(),
            });
        }
        (self.implementation)(
            target,
            &OptionArgs {
                operation: self.name,
                values,
            },
        )
    }
}

/// Find the setter matching a requested operation name
pub fn find_option<'t, W>(table: &'t [OptionDef<W>], requested: &str) -> Option<&'t OptionDef<W>> {
    table.iter().find(|def| same_operation(def.name, requested))
}

/// Compare operation names ignoring ASCII case and underscores
pub fn same_operation(a: &str, b: &str) -> bool {
    fn fold(s: &str) -> impl Iterator<Item = u8> + '_ {
        s.bytes()
            .filter(|b| *b != b'_')
            .map(|b| b.to_ascii_lowercase())
    }
    fold(a).eq(fold(b))
}

/// Arguments handed to a setter, with typed accessors
#[derive(Debug, Clone, Copy)]
pub struct OptionArgs<'a> {
    operation: &'static str,
    values: &'a [Value],
}

impl<'a> OptionArgs<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw argument at `index`
    pub fn value(&self, index: usize) -> Result<&'a Value, OptionError> {
        self.values.get(index).ok_or(OptionError::MissingArgument {
            operation: self.operation,
            expected: index + 1,
            actual: self.values.len(),
        })
    }

    pub fn bool(&self, index: usize) -> Result<bool, OptionError> {
        let value = self.value(index)?;
        value
            .as_bool()
            .ok_or_else(|| self.invalid(index, "a boolean", value))
    }

    pub fn usize(&self, index: usize) -> Result<usize, OptionError> {
        let value = self.value(index)?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.invalid(index, "a non-negative integer", value))
    }

    pub fn str(&self, index: usize) -> Result<&'a str, OptionError> {
        let value = self.value(index)?;
        value
            .as_str()
            .ok_or_else(|| self.invalid(index, "a string", value))
    }

    /// A string holding exactly one ASCII character
    pub fn ascii_char(&self, index: usize) -> Result<u8, OptionError> {
        let value = self.value(index)?;
        match value.as_str().map(str::as_bytes) {
            Some([byte]) if byte.is_ascii() => Ok(*byte),
            _ => Err(self.invalid(index, "a single ASCII character", value)),
        }
    }

    /// Build an [`OptionError::InvalidArgument`] for the argument at `index`
    pub fn invalid(&self, index: usize, expected: &'static str, found: &Value) -> OptionError {
        OptionError::InvalidArgument {
            operation: self.operation,
            index,
            expected,
            found: found.to_string(),
        }
    }
}

/// Operation name to argument(s) map applied to a writer.
///
/// Entries are applied in insertion order. A JSON array is the argument
/// list; any other value is a single argument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriterOptions(Map<String, Value>);

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous one with the same name
    pub fn set<K: Into<String>, V: Into<Value>>(mut self, name: K, arguments: V) -> Self {
        self.insert(name, arguments);
        self
    }

    /// Add an entry, replacing any previous one with the same name
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, arguments: V) -> &mut Self {
        self.0.insert(name.into(), arguments.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in application order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl From<Map<String, Value>> for WriterOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for WriterOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = WriterOptions::new();
        for (name, value) in iter {
            options.insert(name, value);
        }
        options
    }
}

/// The argument list a map value stands for
pub fn argument_list(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        other => std::slice::from_ref(other),
    }
}

/// Apply every entry of `options` to `writer`.
///
/// Unknown operation names are logged and skipped unless `strict` is set,
/// in which case they fail with [`OptionError::UnknownOperation`]. The first
/// setter that rejects its arguments stops the run.
pub fn apply_writer_options(
    writer: &mut dyn SpreadsheetWriter,
    options: &WriterOptions,
    strict: bool,
) -> Result<(), OptionError> {
    for (name, value) in options.iter() {
        if writer.set_option(name, argument_list(value))? {
            continue;
        }
        if strict {
            return Err(OptionError::UnknownOperation {
                format: writer.format().to_string(),
                name: name.to_string(),
            });
        }
        log::debug!("{} writer has no option '{}', skipping", writer.format(), name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Default)]
    struct Target {
        flag: bool,
        count: usize,
    }

    fn set_flag(target: &mut Target, args: &OptionArgs<'_>) -> Result<(), OptionError> {
        target.flag = args.bool(0)?;
        Ok(())
    }

    fn bump(target: &mut Target, _: &OptionArgs<'_>) -> Result<(), OptionError> {
        target.count += 1;
        Ok(())
    }

    static TABLE: &[OptionDef<Target>] = &[
        OptionDef {
            name: "set_flag",
            min_args: 1,
            implementation: set_flag,
        },
        OptionDef {
            name: "bump",
            min_args: 0,
            implementation: bump,
        },
    ];

    #[test]
    fn test_same_operation() {
        assert!(same_operation("set_delimiter", "setDelimiter"));
        assert!(same_operation("set_use_bom", "setUseBOM"));
        assert!(same_operation("write_all_sheets", "WRITEALLSHEETS"));
        assert!(!same_operation("set_delimiter", "set_enclosure"));
    }

    #[test]
    fn test_invoke_checks_arguments() {
        let mut target = Target::default();
        let def = find_option(TABLE, "setFlag").unwrap();

        def.invoke(&mut target, &[json!(true)]).unwrap();
        assert!(target.flag);

        let err = def.invoke(&mut target, &[]).unwrap_err();
        assert_eq!(
            err,
            OptionError::MissingArgument {
                operation: "set_flag",
                expected: 1,
                actual: 0
            }
        );

        let err = def.invoke(&mut target, &[json!("yes")]).unwrap_err();
        assert!(matches!(err, OptionError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let mut target = Target::default();
        find_option(TABLE, "bump")
            .unwrap()
            .invoke(&mut target, &[json!(1), json!(2)])
            .unwrap();
        assert_eq!(target.count, 1);
    }

    #[test]
    fn test_argument_list() {
        assert_eq!(argument_list(&json!(";")), &[json!(";")]);
        assert_eq!(argument_list(&json!([1, 2])), &[json!(1), json!(2)]);
        assert!(argument_list(&json!([])).is_empty());
    }

    #[test]
    fn test_ascii_char() {
        let values = [json!(";"), json!(""), json!("ab"), json!("é")];
        let args = OptionArgs {
            operation: "set_delimiter",
            values: &values,
        };
        assert_eq!(args.ascii_char(0).unwrap(), b';');
        assert!(args.ascii_char(1).is_err());
        assert!(args.ascii_char(2).is_err());
        assert!(args.ascii_char(3).is_err());
    }

    #[test]
    fn test_options_keep_insertion_order_and_last_wins() {
        let options: WriterOptions = serde_json::from_str(
            r#"{"setUseBOM": true, "setDelimiter": ",", "setDelimiter": ";"}"#,
        )
        .unwrap();

        let names: Vec<&str> = options.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["setUseBOM", "setDelimiter"]);
        assert_eq!(options.get("setDelimiter"), Some(&json!(";")));
    }
}
