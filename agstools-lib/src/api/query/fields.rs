//! `outFields` selection

/// Which attribute fields a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutFields {
    /// Every field (`*`).
    #[default]
    All,
    /// An explicit list of field names.
    List(Vec<String>),
}

impl OutFields {
    /// Builds an explicit field list.
    pub fn list<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(Into::into)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        if fields.is_empty() || fields.iter().any(|f| f == "*") {
            Self::All
        } else {
            Self::List(fields)
        }
    }

    /// Returns the value of the `outFields` parameter.
    pub fn to_param(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::List(fields) => fields.join(","),
        }
    }
}

/// Parses `"*"` or a comma-separated list such as `"NAME, STATUS"`.
impl From<&str> for OutFields {
    fn from(value: &str) -> Self {
        Self::list(value.split(','))
    }
}

impl From<String> for OutFields {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Vec<String>> for OutFields {
    fn from(fields: Vec<String>) -> Self {
        Self::list(fields)
    }
}

impl From<&[&str]> for OutFields {
    fn from(fields: &[&str]) -> Self {
        Self::list(fields.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for OutFields {
    fn from(fields: [&str; N]) -> Self {
        Self::list(fields)
    }
}
