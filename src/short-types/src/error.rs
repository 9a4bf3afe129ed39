use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// How many selector segments a volume type accepts in `vol_id`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SelectorArity {
    Exactly(usize),
    Between(usize, usize),
}

impl SelectorArity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            SelectorArity::Exactly(n) => count == n,
            SelectorArity::Between(min, max) => count >= min && count <= max,
        }
    }
}

impl fmt::Display for SelectorArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorArity::Exactly(n) => write!(f, "{n}"),
            SelectorArity::Between(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ShortError {
    /// input is not the JSON kind that was expected, or a required key is missing
    #[error("expected {expected}, got {}", describe(.found))]
    Shape {
        expected: String,
        found: Option<Value>,
    },
    /// input has the right kind but a value outside what is accepted
    #[error("invalid value ({value}): {reason}")]
    Value { value: String, reason: String },
    #[error("unsupported volume type ({0})")]
    UnsupportedVariant(String),
    #[error("expected {expected} selector segments for {vol_type}, got {} ({})", .found.len(), .found.join(":"))]
    SelectorArity {
        vol_type: &'static str,
        expected: SelectorArity,
        found: Vec<String>,
    },
    #[error("empty volume definition")]
    EmptyVariant,
    #[error("more than one volume source set ({})", .0.join(", "))]
    MultipleVariants(Vec<&'static str>),
    /// in-memory value that can't be written out
    #[error("invalid instance ({instance}): {reason}")]
    InvalidInstance { instance: String, reason: String },
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ShortError>,
    },
}

fn describe(found: &Option<Value>) -> String {
    match found {
        None => "nothing".to_owned(),
        Some(value) => value.to_string(),
    }
}

impl ShortError {
    pub fn shape<E: Into<String>>(expected: E, found: Option<&Value>) -> Self {
        ShortError::Shape {
            expected: expected.into(),
            found: found.cloned(),
        }
    }

    pub fn missing_key(key: &str) -> Self {
        ShortError::Shape {
            expected: format!("key \"{key}\""),
            found: None,
        }
    }

    pub fn value<V: ToString, R: Into<String>>(value: V, reason: R) -> Self {
        ShortError::Value {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_instance<I: fmt::Debug, R: Into<String>>(instance: &I, reason: R) -> Self {
        ShortError::InvalidInstance {
            instance: format!("{instance:?}"),
            reason: reason.into(),
        }
    }

    /// wrap self with an outer operation name
    pub fn context<C: Into<String>>(self, context: C) -> Self {
        ShortError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// innermost error, with every context layer removed
    pub fn root(&self) -> &ShortError {
        let mut current = self;
        while let ShortError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// context labels from outermost to innermost
    pub fn context_chain(&self) -> Vec<&str> {
        let mut chain = vec![];
        let mut current = self;
        while let ShortError::Context { context, source } = current {
            chain.push(context.as_str());
            current = source;
        }
        chain
    }
}

pub trait ResultExt<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T, ShortError>;
}

impl<T> ResultExt<T> for Result<T, ShortError> {
    fn context<C: Into<String>>(self, context: C) -> Result<T, ShortError> {
        self.map_err(|err| err.context(context))
    }
}
