use rustle_onchain::args;
use rustle_onchain::builder::{build_module, define_module, CallOptions, ContractOptions};
use rustle_onchain::execution::{batch_futures, ExecutionError};
use rustle_onchain::types::{results, Future, FutureKind, Module};
use std::collections::BTreeMap;
use std::sync::Arc;

fn batch_ids(module: &Arc<Module>) -> Vec<Vec<String>> {
    batch_futures(module)
        .unwrap()
        .iter()
        .map(|batch| batch.iter().map(|f| f.id.clone()).collect())
        .collect()
}

#[test]
fn test_submodule_futures_are_scheduled_first() {
    let tokens = define_module("Tokens", |m| {
        let token = m.contract("Token", args![], ContractOptions::default())?;
        Ok(results([("token", token)]))
    });
    let definition = define_module("Main", move |m| {
        let tokens = m.use_module(&tokens)?;
        let token = m.result_of(&tokens, "token")?;
        let exchange = m.contract("Exchange", args![&token], ContractOptions::default())?;
        m.call(&exchange, "init", args![], CallOptions::default())?;
        Ok(results([("exchange", exchange)]))
    });
    let module = build_module(&definition).unwrap();

    assert_eq!(
        batch_ids(&module),
        vec![
            vec!["Tokens:Token".to_string()],
            vec!["Main:Exchange".to_string()],
            vec!["Main:Exchange#init".to_string()],
        ]
    );
}

#[test]
fn test_shared_submodule_is_batched_once() {
    let shared = define_module("Shared", |m| {
        let lib = m.library("Lib", Default::default())?;
        Ok(results([("lib", lib)]))
    });
    let left_shared = shared.clone();
    let left = define_module("Left", move |m| {
        let shared = m.use_module(&left_shared)?;
        let lib = m.result_of(&shared, "lib")?;
        let a = m.contract("A", args![&lib], ContractOptions::default())?;
        Ok(results([("a", a)]))
    });
    let right_shared = shared.clone();
    let right = define_module("Right", move |m| {
        let shared = m.use_module(&right_shared)?;
        let lib = m.result_of(&shared, "lib")?;
        let b = m.contract("B", args![&lib], ContractOptions::default())?;
        Ok(results([("b", b)]))
    });
    let definition = define_module("Top", move |m| {
        let left = m.use_module(&left)?;
        let right = m.use_module(&right)?;
        let a = m.result_of(&left, "a")?;
        let b = m.result_of(&right, "b")?;
        let c = m.contract("C", args![&a, &b], ContractOptions::default())?;
        Ok(results([("c", c)]))
    });
    let module = build_module(&definition).unwrap();

    assert_eq!(
        batch_ids(&module),
        vec![
            vec!["Shared:Lib".to_string()],
            vec!["Left:A".to_string(), "Right:B".to_string()],
            vec!["Top:C".to_string()],
        ]
    );
}

#[test]
fn test_dependency_outside_the_tree_is_rejected() {
    let outsider = Arc::new(Future {
        id: "Elsewhere:Lib".to_string(),
        module_id: "Elsewhere".to_string(),
        dependencies: Vec::new(),
        kind: FutureKind::NamedLibraryDeployment {
            contract_name: "Lib".to_string(),
            libraries: BTreeMap::new(),
            from: None,
        },
    });
    let dependent = Arc::new(Future {
        id: "Module:Lib".to_string(),
        module_id: "Module".to_string(),
        dependencies: vec![Arc::clone(&outsider)],
        kind: FutureKind::NamedLibraryDeployment {
            contract_name: "Lib".to_string(),
            libraries: BTreeMap::new(),
            from: None,
        },
    });
    let module = Arc::new(Module {
        id: "Module".to_string(),
        futures: BTreeMap::from([(dependent.id.clone(), Arc::clone(&dependent))]),
        submodules: BTreeMap::new(),
        results: results([("lib", dependent)]),
    });

    match batch_futures(&module) {
        Err(ExecutionError::MissingDependency {
            future_id,
            dependency,
        }) => {
            assert_eq!(future_id, "Module:Lib");
            assert_eq!(dependency, "Elsewhere:Lib");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}
