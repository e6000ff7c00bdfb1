//! Generic fold over argument trees.
//!
//! Dependency inference, validation and serialization all walk arguments
//! through [`fold_argument`], so they agree on what counts as a future
//! reference or a runtime value at any nesting depth.

use num_bigint::BigInt;
use serde_json::Number;
use std::collections::{BTreeMap, HashSet};
use std::convert::Infallible;
use std::sync::Arc;

use crate::types::future::Future;
use crate::types::value::{AccountRuntimeValue, ArgumentValue, ModuleParameterRuntimeValue};

/// Leaf of an argument tree that carries no reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Bool(bool),
    Number(&'a Number),
    BigInt(&'a BigInt),
    String(&'a str),
}

pub trait ArgumentFold {
    type Output;
    type Error;

    fn fold_literal(&mut self, literal: Literal<'_>) -> Result<Self::Output, Self::Error>;

    fn fold_future(&mut self, future: &Arc<Future>) -> Result<Self::Output, Self::Error>;

    fn fold_account(&mut self, account: &AccountRuntimeValue)
        -> Result<Self::Output, Self::Error>;

    fn fold_parameter(
        &mut self,
        parameter: &ModuleParameterRuntimeValue,
    ) -> Result<Self::Output, Self::Error>;

    fn fold_array(&mut self, items: Vec<Self::Output>) -> Result<Self::Output, Self::Error>;

    fn fold_object(
        &mut self,
        entries: BTreeMap<String, Self::Output>,
    ) -> Result<Self::Output, Self::Error>;
}

pub fn fold_argument<F>(value: &ArgumentValue, folder: &mut F) -> Result<F::Output, F::Error>
where
    F: ArgumentFold + ?Sized,
{
    match value {
        ArgumentValue::Bool(b) => folder.fold_literal(Literal::Bool(*b)),
        ArgumentValue::Number(n) => folder.fold_literal(Literal::Number(n)),
        ArgumentValue::BigInt(b) => folder.fold_literal(Literal::BigInt(b)),
        ArgumentValue::String(s) => folder.fold_literal(Literal::String(s)),
        ArgumentValue::Array(items) => {
            let folded = items
                .iter()
                .map(|item| fold_argument(item, folder))
                .collect::<Result<Vec<_>, _>>()?;
            folder.fold_array(folded)
        }
        ArgumentValue::Object(entries) => {
            let folded = entries
                .iter()
                .map(|(key, item)| Ok((key.clone(), fold_argument(item, folder)?)))
                .collect::<Result<BTreeMap<_, _>, F::Error>>()?;
            folder.fold_object(folded)
        }
        ArgumentValue::Future(future) => folder.fold_future(future),
        ArgumentValue::Account(account) => folder.fold_account(account),
        ArgumentValue::ModuleParameter(parameter) => folder.fold_parameter(parameter),
    }
}

/// Fold every argument of a list with the same folder
pub fn fold_arguments<F>(values: &[ArgumentValue], folder: &mut F) -> Result<Vec<F::Output>, F::Error>
where
    F: ArgumentFold + ?Sized,
{
    values.iter().map(|value| fold_argument(value, folder)).collect()
}

/// Everything that is not a literal, collected in first-seen order
#[derive(Debug, Default)]
pub struct ReferenceCollector {
    seen_futures: HashSet<String>,
    pub futures: Vec<Arc<Future>>,
    pub accounts: Vec<AccountRuntimeValue>,
    pub parameters: Vec<ModuleParameterRuntimeValue>,
}

impl ReferenceCollector {
    pub fn collect(values: &[ArgumentValue]) -> Self {
        let mut collector = Self::default();
        match fold_arguments(values, &mut collector) {
            Ok(_) => collector,
            Err(never) => match never {},
        }
    }
}

impl ArgumentFold for ReferenceCollector {
    type Output = ();
    type Error = Infallible;

    fn fold_literal(&mut self, _literal: Literal<'_>) -> Result<(), Infallible> {
        Ok(())
    }

    fn fold_future(&mut self, future: &Arc<Future>) -> Result<(), Infallible> {
        if self.seen_futures.insert(future.id.clone()) {
            self.futures.push(Arc::clone(future));
        }
        Ok(())
    }

    fn fold_account(&mut self, account: &AccountRuntimeValue) -> Result<(), Infallible> {
        self.accounts.push(*account);
        Ok(())
    }

    fn fold_parameter(&mut self, parameter: &ModuleParameterRuntimeValue) -> Result<(), Infallible> {
        self.parameters.push(parameter.clone());
        Ok(())
    }

    fn fold_array(&mut self, _items: Vec<()>) -> Result<(), Infallible> {
        Ok(())
    }

    fn fold_object(&mut self, _entries: BTreeMap<String, ()>) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Futures referenced anywhere inside the arguments
pub fn collect_futures(values: &[ArgumentValue]) -> Vec<Arc<Future>> {
    ReferenceCollector::collect(values).futures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::future::FutureKind;

    fn library(id: &str) -> Arc<Future> {
        Arc::new(Future {
            id: id.to_string(),
            module_id: "Module1".to_string(),
            dependencies: vec![],
            kind: FutureKind::NamedLibraryDeployment {
                contract_name: id.to_string(),
                libraries: BTreeMap::new(),
                from: None,
            },
        })
    }

    #[test]
    fn test_collects_nested_references_once() {
        let lib = library("Module1:Lib");
        let parameter = ModuleParameterRuntimeValue {
            module_id: "Module1".to_string(),
            name: "p".to_string(),
            default_value: None,
        };
        let values = vec![
            ArgumentValue::from(&lib),
            ArgumentValue::object([(
                "nested",
                ArgumentValue::array([
                    ArgumentValue::from(&lib),
                    ArgumentValue::from(AccountRuntimeValue::new(2)),
                    ArgumentValue::from(parameter.clone()),
                ]),
            )]),
            ArgumentValue::from(7),
        ];

        let collected = ReferenceCollector::collect(&values);

        assert_eq!(collected.futures.len(), 1);
        assert_eq!(collected.futures[0].id, "Module1:Lib");
        assert_eq!(collected.accounts, vec![AccountRuntimeValue::new(2)]);
        assert_eq!(collected.parameters, vec![parameter]);
    }

    #[test]
    fn test_literals_have_no_references() {
        let values = vec![
            ArgumentValue::from(true),
            ArgumentValue::from("text"),
            ArgumentValue::array([1, 2, 3]),
        ];

        assert!(collect_futures(&values).is_empty());
    }

    /// Renders every leaf so literal kinds stay distinguishable
    struct LeafPrinter;

    impl ArgumentFold for LeafPrinter {
        type Output = String;
        type Error = Infallible;

        fn fold_literal(&mut self, literal: Literal<'_>) -> Result<String, Infallible> {
            Ok(match literal {
                Literal::Bool(b) => format!("bool:{b}"),
                Literal::Number(n) => format!("number:{n}"),
                Literal::BigInt(b) => format!("bigint:{b}"),
                Literal::String(s) => format!("string:{s}"),
            })
        }

        fn fold_future(&mut self, future: &Arc<Future>) -> Result<String, Infallible> {
            Ok(format!("future:{}", future.id))
        }

        fn fold_account(&mut self, account: &AccountRuntimeValue) -> Result<String, Infallible> {
            Ok(format!("account:{}", account.account_index))
        }

        fn fold_parameter(
            &mut self,
            parameter: &ModuleParameterRuntimeValue,
        ) -> Result<String, Infallible> {
            Ok(format!("parameter:{}", parameter.name))
        }

        fn fold_array(&mut self, items: Vec<String>) -> Result<String, Infallible> {
            Ok(format!("[{}]", items.join(",")))
        }

        fn fold_object(&mut self, entries: BTreeMap<String, String>) -> Result<String, Infallible> {
            let fields: Vec<String> = entries.into_iter().map(|(k, v)| format!("{k}={v}")).collect();
            Ok(format!("{{{}}}", fields.join(",")))
        }
    }

    #[test]
    fn test_every_literal_kind_reaches_fold_literal() {
        let values = vec![
            ArgumentValue::from(false),
            ArgumentValue::from(42),
            ArgumentValue::BigInt("1000000000000000000000000000000".parse().unwrap()),
            ArgumentValue::object([("name", ArgumentValue::from("token"))]),
        ];

        let rendered = fold_arguments(&values, &mut LeafPrinter).unwrap();

        assert_eq!(
            rendered,
            vec![
                "bool:false".to_string(),
                "number:42".to_string(),
                "bigint:1000000000000000000000000000000".to_string(),
                "{name=string:token}".to_string(),
            ]
        );
    }
}
