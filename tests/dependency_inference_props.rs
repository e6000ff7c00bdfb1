//! Property tests for dependency inference over arbitrary argument trees

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use rustle_onchain::builder::{build_module, define_module, ContractOptions, LibraryOptions};
use rustle_onchain::serialization::{from_json_str, to_json_string};
use rustle_onchain::types::{
    results, AccountRuntimeValue, ArgumentValue, DeploymentDetails, Future, StoredDeployment,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

const LIBRARIES: usize = 5;

/// Argument tree with futures replaced by indices into a library pool
#[derive(Debug, Clone)]
enum Shape {
    Number(i64),
    Text(String),
    Account(i64),
    Library(usize),
    Array(Vec<Shape>),
    Object(BTreeMap<String, Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(Shape::Number),
        "[a-z ]{0,8}".prop_map(Shape::Text),
        (0..3i64).prop_map(Shape::Account),
        (0..LIBRARIES).prop_map(Shape::Library),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Shape::Array),
            btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Shape::Object),
        ]
    })
}

fn to_argument(shape: &Shape, libraries: &[Arc<Future>]) -> ArgumentValue {
    match shape {
        Shape::Number(n) => ArgumentValue::from(*n),
        Shape::Text(text) => ArgumentValue::from(text.as_str()),
        Shape::Account(index) => ArgumentValue::from(AccountRuntimeValue::new(*index)),
        Shape::Library(index) => ArgumentValue::from(&libraries[*index]),
        Shape::Array(items) => {
            ArgumentValue::Array(items.iter().map(|s| to_argument(s, libraries)).collect())
        }
        Shape::Object(entries) => ArgumentValue::Object(
            entries
                .iter()
                .map(|(key, s)| (key.clone(), to_argument(s, libraries)))
                .collect(),
        ),
    }
}

/// Library indices in first-seen depth-first order
fn referenced(shape: &Shape, seen: &mut HashSet<usize>, order: &mut Vec<usize>) {
    match shape {
        Shape::Library(index) => {
            if seen.insert(*index) {
                order.push(*index);
            }
        }
        Shape::Array(items) => items.iter().for_each(|s| referenced(s, seen, order)),
        Shape::Object(entries) => entries.values().for_each(|s| referenced(s, seen, order)),
        Shape::Number(_) | Shape::Text(_) | Shape::Account(_) => {}
    }
}

fn deployment(args: Vec<Shape>, after: Vec<usize>) -> StoredDeployment {
    let definition = define_module("Props", move |m| {
        let libraries = (0..LIBRARIES)
            .map(|i| m.library(&format!("Lib{i}"), LibraryOptions::default()))
            .collect::<Result<Vec<_>, _>>()?;
        let arguments = args.iter().map(|s| to_argument(s, &libraries)).collect();
        let target = m.contract(
            "Target",
            arguments,
            ContractOptions::default().after(after.iter().map(|&i| &libraries[i])),
        )?;
        Ok(results([("target", target)]))
    });
    let module = build_module(&definition).unwrap();
    StoredDeployment::new(
        DeploymentDetails {
            network_name: "hardhat".to_string(),
            chain_id: 31337,
        },
        module,
    )
}

proptest! {
    /// Dependencies are the distinct futures in the arguments, in first-seen
    /// order, followed by the `after` futures not already present
    #[test]
    fn test_dependencies_match_referenced_futures(
        args in vec(shape_strategy(), 0..4),
        after in vec(0..LIBRARIES, 0..3),
    ) {
        let deployment = deployment(args.clone(), after.clone());
        let target = &deployment.module.futures["Props:Target"];

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for shape in &args {
            referenced(shape, &mut seen, &mut order);
        }
        for index in after {
            if seen.insert(index) {
                order.push(index);
            }
        }

        let expected: Vec<String> = order.iter().map(|i| format!("Props:Lib{i}")).collect();
        prop_assert_eq!(target.dependency_ids(), expected);

        for dependency in &target.dependencies {
            prop_assert!(Arc::ptr_eq(dependency, &deployment.module.futures[&dependency.id]));
        }
    }

    /// Storing and loading keeps the argument trees and their identities
    #[test]
    fn test_stored_arguments_survive_reload(args in vec(shape_strategy(), 0..4)) {
        let deployment = deployment(args, Vec::new());
        let json = to_json_string(&deployment).unwrap();
        let reloaded = from_json_str(&json).unwrap();

        prop_assert_eq!(&deployment, &reloaded);
        prop_assert_eq!(to_json_string(&reloaded).unwrap(), json);

        let target = &reloaded.module.futures["Props:Target"];
        for dependency in &target.dependencies {
            prop_assert!(Arc::ptr_eq(dependency, &reloaded.module.futures[&dependency.id]));
        }
    }
}
