//! Invocation context and response envelope.

use crate::error::{ContractError, ErrorKind};
use crate::function::Function;

/// Status code of a successful response.
pub const OK: u16 = 200;

/// Status code of a failed response.
pub const ERROR: u16 = 500;

/// What the host supplies for one call: a function name and its positional
/// string arguments.
pub trait InvocationContext {
    fn function_name(&self) -> &str;
    fn args(&self) -> &[String];
}

/// Owned [`InvocationContext`] built by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    function: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new<I, A>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Invocation of a known function.
    pub fn call<I, A>(function: Function, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::new(function.name(), args)
    }
}

impl InvocationContext for Invocation {
    fn function_name(&self) -> &str {
        &self.function
    }

    fn args(&self) -> &[String] {
        &self.args
    }
}

/// Outcome of one invocation.
///
/// Successful responses carry a payload; error responses carry a message
/// and an [`ErrorKind`] and no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub kind: Option<ErrorKind>,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            kind: None,
            payload,
        }
    }

    pub fn error(err: &ContractError) -> Self {
        Self {
            status: ERROR,
            message: err.to_string(),
            kind: Some(err.kind()),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OK
    }
}
