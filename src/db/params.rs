//! Named parameters for command text.
//!
//! Commands are written with `$name` placeholders. Before execution each
//! placeholder is rewritten into the backend's positional form and its value is
//! pushed onto the bound value list, so values never reach the SQL text.

use sea_orm::{DbBackend, Value};

use super::GatewayError;

/// Ordered set of named values bound into a command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Vec<(String, Value)>,
}

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Binds `value` to `$name`, replacing an earlier binding of the same name.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment,
}

/// Rewrites `$name` placeholders into positional ones for `backend`.
///
/// Placeholders inside quoted literals, quoted identifiers and comments are
/// left alone, as are already-positional `$1` forms. A name that appears twice
/// is bound twice, which keeps the output valid for backends without numbered
/// parameters.
pub fn compile(
    sql: &str,
    params: &Params,
    backend: DbBackend,
) -> Result<(String, Vec<Value>), GatewayError> {
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut state = Scan::Code;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            Scan::Code => match c {
                '\'' => {
                    state = Scan::SingleQuoted;
                    out.push(c);
                }
                '"' => {
                    state = Scan::DoubleQuoted;
                    out.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    state = Scan::LineComment;
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'*') => {
                    state = Scan::BlockComment;
                    out.push(c);
                    if let Some(star) = chars.next() {
                        out.push(star);
                    }
                }
                '$' if chars.peek().is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') => {
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }

                    let value = params
                        .get(&name)
                        .ok_or_else(|| GatewayError::MissingParameter(name.clone()))?;
                    values.push(value.clone());

                    match backend {
                        DbBackend::Postgres => {
                            out.push('$');
                            out.push_str(&values.len().to_string());
                        }
                        _ => out.push('?'),
                    }
                }
                _ => out.push(c),
            },
            Scan::SingleQuoted => {
                out.push(c);
                if c == '\'' {
                    state = Scan::Code;
                }
            }
            Scan::DoubleQuoted => {
                out.push(c);
                if c == '"' {
                    state = Scan::Code;
                }
            }
            Scan::LineComment => {
                out.push(c);
                if c == '\n' {
                    state = Scan::Code;
                }
            }
            Scan::BlockComment => {
                out.push(c);
                if c == '*' && chars.peek() == Some(&'/') {
                    if let Some(slash) = chars.next() {
                        out.push(slash);
                    }
                    state = Scan::Code;
                }
            }
        }
    }

    Ok((out, values))
}
