use num_bigint::BigInt;
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::types::future::Future;

/// Deferred reference to the Nth signer, resolved at execution time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountRuntimeValue {
    pub account_index: i64,
}

impl AccountRuntimeValue {
    pub fn new(account_index: i64) -> Self {
        Self { account_index }
    }
}

/// Literal value a module parameter can resolve to
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(Number),
    BigInt(BigInt),
    String(String),
    Bool(bool),
}

impl ParameterValue {
    /// Runtime type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Number(_) => "number",
            ParameterValue::BigInt(_) => "bigint",
            ParameterValue::String(_) => "string",
            ParameterValue::Bool(_) => "boolean",
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<u64> for ParameterValue {
    fn from(value: u64) -> Self {
        ParameterValue::Number(value.into())
    }
}

impl From<BigInt> for ParameterValue {
    fn from(value: BigInt) -> Self {
        ParameterValue::BigInt(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

/// Deferred reference to a named module input, optionally defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleParameterRuntimeValue {
    pub module_id: String,
    pub name: String,
    pub default_value: Option<ParameterValue>,
}

/// Argument passed to a constructor, call or static call.
///
/// Arrays and objects nest arbitrarily; futures and runtime values may
/// appear at any depth.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Bool(bool),
    Number(Number),
    BigInt(BigInt),
    String(String),
    Array(Vec<ArgumentValue>),
    Object(BTreeMap<String, ArgumentValue>),
    Future(Arc<Future>),
    Account(AccountRuntimeValue),
    ModuleParameter(ModuleParameterRuntimeValue),
}

impl ArgumentValue {
    /// Build an object argument from key/value pairs
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ArgumentValue>,
    {
        ArgumentValue::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ArgumentValue>,
    {
        ArgumentValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for ArgumentValue {
    fn from(value: bool) -> Self {
        ArgumentValue::Bool(value)
    }
}

impl From<i32> for ArgumentValue {
    fn from(value: i32) -> Self {
        ArgumentValue::Number(value.into())
    }
}

impl From<i64> for ArgumentValue {
    fn from(value: i64) -> Self {
        ArgumentValue::Number(value.into())
    }
}

impl From<u64> for ArgumentValue {
    fn from(value: u64) -> Self {
        ArgumentValue::Number(value.into())
    }
}

impl From<BigInt> for ArgumentValue {
    fn from(value: BigInt) -> Self {
        ArgumentValue::BigInt(value)
    }
}

impl From<&str> for ArgumentValue {
    fn from(value: &str) -> Self {
        ArgumentValue::String(value.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(value: String) -> Self {
        ArgumentValue::String(value)
    }
}

impl From<Arc<Future>> for ArgumentValue {
    fn from(value: Arc<Future>) -> Self {
        ArgumentValue::Future(value)
    }
}

impl From<&Arc<Future>> for ArgumentValue {
    fn from(value: &Arc<Future>) -> Self {
        ArgumentValue::Future(Arc::clone(value))
    }
}

impl From<AccountRuntimeValue> for ArgumentValue {
    fn from(value: AccountRuntimeValue) -> Self {
        ArgumentValue::Account(value)
    }
}

impl From<ModuleParameterRuntimeValue> for ArgumentValue {
    fn from(value: ModuleParameterRuntimeValue) -> Self {
        ArgumentValue::ModuleParameter(value)
    }
}

impl From<&ModuleParameterRuntimeValue> for ArgumentValue {
    fn from(value: &ModuleParameterRuntimeValue) -> Self {
        ArgumentValue::ModuleParameter(value.clone())
    }
}

impl From<Vec<ArgumentValue>> for ArgumentValue {
    fn from(value: Vec<ArgumentValue>) -> Self {
        ArgumentValue::Array(value)
    }
}

/// Build a `Vec<ArgumentValue>` from heterogeneous expressions.
///
/// ```ignore
/// let args = args![contract1, 42, "name", true];
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::types::ArgumentValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        vec![$($crate::types::ArgumentValue::from($value)),+]
    };
}

/// Amount sent along with a payable deployment or call
#[derive(Debug, Clone, PartialEq)]
pub enum PayableValue {
    Amount(BigInt),
    Parameter(ModuleParameterRuntimeValue),
}

impl Default for PayableValue {
    fn default() -> Self {
        PayableValue::Amount(BigInt::from(0))
    }
}

impl From<BigInt> for PayableValue {
    fn from(value: BigInt) -> Self {
        PayableValue::Amount(value)
    }
}

impl From<ModuleParameterRuntimeValue> for PayableValue {
    fn from(value: ModuleParameterRuntimeValue) -> Self {
        PayableValue::Parameter(value)
    }
}

/// Sender of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum FromAddress {
    Address(String),
    Account(AccountRuntimeValue),
}

impl From<&str> for FromAddress {
    fn from(value: &str) -> Self {
        FromAddress::Address(value.to_string())
    }
}

impl From<AccountRuntimeValue> for FromAddress {
    fn from(value: AccountRuntimeValue) -> Self {
        FromAddress::Account(value)
    }
}

/// Address of an already deployed contract
#[derive(Debug, Clone, PartialEq)]
pub enum ContractAddress {
    Literal(String),
    /// Result of a static call returning an address
    Future(Arc<Future>),
}

impl From<&str> for ContractAddress {
    fn from(value: &str) -> Self {
        ContractAddress::Literal(value.to_string())
    }
}

impl From<&Arc<Future>> for ContractAddress {
    fn from(value: &Arc<Future>) -> Self {
        ContractAddress::Future(Arc::clone(value))
    }
}

/// Event argument selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArgument {
    Name(String),
    Index(u64),
}

impl From<&str> for EventArgument {
    fn from(value: &str) -> Self {
        EventArgument::Name(value.to_string())
    }
}

impl From<u64> for EventArgument {
    fn from(value: u64) -> Self {
        EventArgument::Index(value)
    }
}

impl fmt::Display for EventArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventArgument::Name(name) => write!(f, "{name}"),
            EventArgument::Index(index) => write!(f, "{index}"),
        }
    }
}
