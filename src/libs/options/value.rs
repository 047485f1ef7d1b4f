use std::fmt;

/// The type an option's values must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Str,
}

/// A typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Kind {
    /// Converts raw text (from a config file or a built-in default) into a value of this kind.
    ///
    /// ```
    /// use pbalign::libs::options::{Kind, Value};
    ///
    /// assert_eq!(Kind::Bool.parse("Yes"), Some(Value::Bool(true)));
    /// assert_eq!(Kind::Int.parse(" 12 "), Some(Value::Int(12)));
    /// assert_eq!(Kind::Float.parse("seventy"), None);
    /// assert_eq!(Kind::Float.parse("nan"), None);
    /// ```
    pub fn parse(&self, raw: &str) -> Option<Value> {
        match self {
            Kind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            Kind::Int => raw.trim().parse::<i64>().ok().map(Value::Int),
            Kind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Value::Float),
            Kind::Str => Some(Value::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::Str => "string",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Strips exactly one layer of matching `'` or `"` quotes.
///
/// ```
/// use pbalign::libs::options::unquote;
///
/// assert_eq!(unquote("'\"-z 3\"'"), "\"-z 3\"");
/// assert_eq!(unquote("\"-z 3\""), "-z 3");
/// assert_eq!(unquote("'mixed\""), "'mixed\"");
/// assert_eq!(unquote("'"), "'");
/// ```
pub fn unquote(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}
