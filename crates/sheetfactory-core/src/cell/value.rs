//! Cell value types

use std::fmt;
use std::str::FromStr;

static EMPTY: CellValue = CellValue::Empty;

/// Value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value; dates and times are kept as spreadsheet serial numbers
    Number(f64),

    /// String value
    String(String),

    /// Error value (#VALUE!, #REF!, etc.)
    Error(CellError),

    /// Formula with the result last computed by the producing application
    Formula {
        /// Formula text without the leading `=`
        text: String,
        /// Cached result, if the source carried one
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Create a formula value without a cached result.
    ///
    /// A leading `=` is stripped so formulas read from text and from
    /// workbook files compare equal.
    pub fn formula<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        let text = match text.strip_prefix('=') {
            Some(stripped) => stripped.to_string(),
            None => text,
        };
        CellValue::Formula {
            text,
            cached_value: None,
        }
    }

    /// Create a formula value carrying a cached result
    pub fn formula_with_result<S: Into<String>>(text: S, result: CellValue) -> Self {
        match Self::formula(text) {
            CellValue::Formula { text, .. } => CellValue::Formula {
                text,
                cached_value: Some(Box::new(result)),
            },
            other => other,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula { .. })
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self.effective_value() {
            CellValue::Number(n) => Some(*n),
            CellValue::Boolean(true) => Some(1.0),
            CellValue::Boolean(false) => Some(0.0),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_string(&self) -> Option<&str> {
        match self.effective_value() {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Cached result for formulas, the value itself otherwise.
    ///
    /// A formula without a cached result resolves to [`CellValue::Empty`].
    pub fn effective_value(&self) -> &CellValue {
        match self {
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => v.effective_value(),
            CellValue::Formula {
                cached_value: None, ..
            } => &EMPTY,
            _ => self,
        }
    }

    /// Text written to flat formats.
    ///
    /// With `calculated` the cached result of a formula is rendered, otherwise
    /// its source text prefixed with `=`.
    pub fn to_text(&self, calculated: bool) -> String {
        match self {
            CellValue::Formula { text, .. } if !calculated => format!("={text}"),
            other => other.effective_value().to_string(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => f.write_str(s),
            CellValue::Error(e) => write!(f, "{e}"),
            CellValue::Formula {
                cached_value: Some(v),
                ..
            } => write!(f, "{v}"),
            CellValue::Formula { text, .. } => write!(f, "={text}"),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<CellError> for CellValue {
    fn from(e: CellError) -> Self {
        CellValue::Error(e)
    }
}

/// Spreadsheet error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    /// #NULL!
    Null,
    /// #DIV/0!
    Div0,
    /// #VALUE!
    Value,
    /// #REF!
    Ref,
    /// #NAME?
    Name,
    /// #NUM!
    Num,
    /// #N/A
    Na,
    /// #GETTING_DATA
    GettingData,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Null => "#NULL!",
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
            CellError::Na => "#N/A",
            CellError::GettingData => "#GETTING_DATA",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellError {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "#NULL!" => Ok(CellError::Null),
            "#DIV/0!" => Ok(CellError::Div0),
            "#VALUE!" => Ok(CellError::Value),
            "#REF!" => Ok(CellError::Ref),
            "#NAME?" => Ok(CellError::Name),
            "#NUM!" => Ok(CellError::Num),
            "#N/A" => Ok(CellError::Na),
            "#GETTING_DATA" => Ok(CellError::GettingData),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Number(42.0));
        assert_eq!(CellValue::from(true), CellValue::Boolean(true));
        assert_eq!(CellValue::from("hello").as_string(), Some("hello"));
    }

    #[test]
    fn test_formula_strips_leading_equals() {
        assert_eq!(CellValue::formula("=SUM(A1:A3)").formula_text(), Some("SUM(A1:A3)"));
        assert_eq!(CellValue::formula("A1*2").formula_text(), Some("A1*2"));
    }

    #[test]
    fn test_effective_value() {
        let f = CellValue::formula_with_result("B1*2", CellValue::Number(84.0));
        assert_eq!(f.as_number(), Some(84.0));
        assert_eq!(CellValue::formula("B1*2").effective_value(), &CellValue::Empty);
    }

    #[test]
    fn test_to_text() {
        let f = CellValue::formula_with_result("B1*2", CellValue::Number(84.0));
        assert_eq!(f.to_text(true), "84");
        assert_eq!(f.to_text(false), "=B1*2");
        assert_eq!(CellValue::Number(1.5).to_text(false), "1.5");
        assert_eq!(CellValue::Boolean(false).to_text(true), "FALSE");
    }

    #[test]
    fn test_cell_error_parse() {
        assert_eq!("#DIV/0!".parse::<CellError>(), Ok(CellError::Div0));
        assert_eq!("#n/a".parse::<CellError>(), Ok(CellError::Na));
        assert!("oops".parse::<CellError>().is_err());
        assert_eq!(CellError::Value.to_string(), "#VALUE!");
    }
}
