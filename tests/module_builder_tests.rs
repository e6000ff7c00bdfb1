use rustle_onchain::args;
use rustle_onchain::builder::{
    build_module, define_module, CallOptions, ConstructionError, ContractAtOptions,
    ContractOptions, LibraryOptions, ModuleConstructor, ModuleDefinition,
    ReadEventArgumentOptions, StaticCallOptions,
};
use rustle_onchain::types::{
    results, AccountRuntimeValue, Artifact, ArgumentValue, ContractAddress, FromAddress,
    FutureKind, FutureType, ModuleResults, ParameterValue, PayableValue,
};
use num_bigint::BigInt;
use std::sync::{Arc, OnceLock};

#[test]
fn test_contract_ids_and_types() {
    let definition = define_module("Module1", |m| {
        let contract1 = m.contract("Contract1", args![], ContractOptions::default())?;
        let named = m.contract(
            "Contract1",
            args![],
            ContractOptions::default().with_id("Second"),
        )?;
        let from_artifact = m.contract_from_artifact(
            "Contract2",
            Artifact::new("Contract2", "0x00"),
            args![],
            ContractOptions::default(),
        )?;
        Ok(results([
            ("contract1", contract1),
            ("named", named),
            ("fromArtifact", from_artifact),
        ]))
    });

    let module = build_module(&definition).unwrap();

    assert_eq!(module.id, "Module1");
    assert_eq!(module.futures.len(), 3);
    let contract1 = module.result("contract1").unwrap();
    assert_eq!(contract1.id, "Module1:Contract1");
    assert_eq!(contract1.module_id, "Module1");
    assert_eq!(contract1.future_type(), FutureType::NamedContractDeployment);
    assert_eq!(module.result("named").unwrap().id, "Module1:Second");
    assert_eq!(
        module.result("fromArtifact").unwrap().future_type(),
        FutureType::ArtifactContractDeployment
    );
}

#[test]
fn test_call_and_static_call_ids() {
    let definition = define_module("Module1", |m| {
        let example = m.contract("Example", args![], ContractOptions::default())?;
        let call = m.call(&example, "test", args![1, "a"], CallOptions::default())?;
        let read = m.static_call(&example, "owner", args![], StaticCallOptions::default())?;
        let second = m.call(
            &example,
            "test",
            args![],
            CallOptions::default().with_id("second"),
        )?;
        Ok(results([
            ("example", example),
            ("call", call),
            ("read", read),
            ("second", second),
        ]))
    });

    let module = build_module(&definition).unwrap();

    let call = module.result("call").unwrap();
    assert_eq!(call.id, "Module1:Example#test");
    assert_eq!(call.dependency_ids(), vec!["Module1:Example"]);
    assert_eq!(module.result("read").unwrap().id, "Module1:Example#owner");
    assert_eq!(module.result("second").unwrap().id, "Module1:second");
}

#[test]
fn test_duplicate_contract_id_fails() {
    let definition = define_module("Module1", |m| {
        let first = m.contract("SameContract", args![], ContractOptions::default())?;
        let second = m.contract("SameContract", args![], ContractOptions::default())?;
        Ok(results([("first", first), ("second", second)]))
    });

    let err = build_module(&definition).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Duplicated id Module1:SameContract found in module Module1"
    );
}

#[test]
fn test_duplicate_explicit_id_fails() {
    let definition = define_module("Module1", |m| {
        let first = m.contract("First", args![], ContractOptions::default().with_id("same"))?;
        let second = m.library("Second", LibraryOptions::default().with_id("same"))?;
        Ok(results([("first", first), ("second", second)]))
    });

    let err = build_module(&definition).unwrap_err();
    assert_eq!(err.to_string(), "Duplicated id Module1:same found in module Module1");
}

#[test]
fn test_duplicate_call_id_fails() {
    let definition = define_module("Module1", |m| {
        let contract = m.contract("SameContract", args![], ContractOptions::default())?;
        m.call(&contract, "test", args![], CallOptions::default())?;
        m.call(&contract, "test", args![], CallOptions::default())?;
        Ok(results([("contract", contract)]))
    });

    let err = build_module(&definition).unwrap_err();
    assert!(matches!(
        err,
        ConstructionError::DuplicateId { ref id, ref module_id }
            if id == "Module1:SameContract#test" && module_id == "Module1"
    ));
}

#[test]
fn test_dependencies_from_nested_args_libraries_and_after() {
    let definition = define_module("Module1", |m| {
        let lib = m.library("Lib", LibraryOptions::default())?;
        let a = m.contract("A", args![], ContractOptions::default())?;
        let b = m.contract("B", args![], ContractOptions::default())?;
        let c = m.contract("C", args![], ContractOptions::default())?;
        let account = m.get_account(1);
        let parameter = m.get_parameter("p");

        let target = m.contract(
            "Target",
            args![
                ArgumentValue::array([ArgumentValue::from(&a), ArgumentValue::from(5)]),
                ArgumentValue::object([(
                    "deeply",
                    ArgumentValue::object([("nested", ArgumentValue::array([&a, &b]))]),
                )]),
                account,
                &parameter
            ],
            ContractOptions::default().library("Lib", &lib).after([&c]),
        )?;
        Ok(results([("target", target)]))
    });

    let module = build_module(&definition).unwrap();
    let target = module.result("target").unwrap();

    assert_eq!(
        target.dependency_ids(),
        vec!["Module1:A", "Module1:B", "Module1:Lib", "Module1:C"]
    );
    assert!(Arc::ptr_eq(&target.dependencies[0], &module.futures["Module1:A"]));
}

#[test]
fn test_runtime_values_are_not_dependencies() {
    let definition = define_module("Module1", |m| {
        let account = m.get_account(0);
        let parameter = m.get_parameter_or("p", 42);
        let contract = m.contract(
            "Contract",
            args![account, &parameter],
            ContractOptions::default()
                .from(account)
                .value(parameter.clone()),
        )?;
        Ok(results([("contract", contract)]))
    });

    let module = build_module(&definition).unwrap();
    let contract = module.result("contract").unwrap();

    assert!(contract.dependencies.is_empty());
    match &contract.kind {
        FutureKind::NamedContractDeployment { value, from, .. } => {
            assert_eq!(from, &Some(FromAddress::Account(AccountRuntimeValue::new(0))));
            match value {
                PayableValue::Parameter(p) => {
                    assert_eq!(p.module_id, "Module1");
                    assert_eq!(p.default_value, Some(ParameterValue::from(42)));
                }
                other => panic!("unexpected value {other:?}"),
            }
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_value_defaults_to_zero() {
    let definition = define_module("Module1", |m| {
        let contract = m.contract("Contract", args![], ContractOptions::default())?;
        let paid = m.contract(
            "Paid",
            args![],
            ContractOptions::default().value(BigInt::from(42)),
        )?;
        Ok(results([("contract", contract), ("paid", paid)]))
    });

    let module = build_module(&definition).unwrap();
    match &module.result("contract").unwrap().kind {
        FutureKind::NamedContractDeployment { value, .. } => {
            assert_eq!(value, &PayableValue::Amount(BigInt::from(0)))
        }
        other => panic!("unexpected kind {other:?}"),
    }
    match &module.result("paid").unwrap().kind {
        FutureKind::NamedContractDeployment { value, .. } => {
            assert_eq!(value, &PayableValue::Amount(BigInt::from(42)))
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_non_contract_library_fails() {
    let definition = define_module("Module1", |m| {
        let another = m.contract("Another", args![], ContractOptions::default())?;
        let call = m.call(&another, "test", args![], CallOptions::default())?;
        let test = m.contract(
            "Test",
            args![],
            ContractOptions::default().library("Call", &call),
        )?;
        Ok(results([("another", another), ("test", test)]))
    });

    let err = build_module(&definition).unwrap_err();
    assert_eq!(err.to_string(), "Given library 'Call' is not a valid Future");
}

#[test]
fn test_call_on_non_contract_fails() {
    let definition = define_module("Module1", |m| {
        let another = m.contract("Another", args![], ContractOptions::default())?;
        let call = m.call(&another, "test", args![], CallOptions::default())?;
        m.call(&call, "again", args![], CallOptions::default())?;
        Ok(ModuleResults::new())
    });

    let err = build_module(&definition).unwrap_err();
    assert!(matches!(err, ConstructionError::InvalidContractFuture { .. }));
}

#[test]
fn test_from_address_must_be_hex() {
    let valid = define_module("Module1", |m| {
        let contract = m.contract("Contract", args![], ContractOptions::default().from("0x2"))?;
        Ok(results([("contract", contract)]))
    });
    assert!(build_module(&valid).is_ok());

    let invalid = define_module("Module1", |m| {
        let contract = m.contract(
            "Contract",
            args![],
            ContractOptions::default().from("not an address"),
        )?;
        Ok(results([("contract", contract)]))
    });
    assert!(matches!(
        build_module(&invalid).unwrap_err(),
        ConstructionError::InvalidAddress { .. }
    ));
}

#[test]
fn test_contract_at_with_literal_and_static_call_address() {
    let definition = define_module("Module1", |m| {
        let factory = m.contract("Factory", args![], ContractOptions::default())?;
        let address = m.static_call(&factory, "deployed", args![], StaticCallOptions::default())?;
        let existing = m.contract_at("Token", "0xabc", ContractAtOptions::default())?;
        let produced = m.contract_at(
            "Token",
            &address,
            ContractAtOptions::default().with_id("Produced"),
        )?;
        Ok(results([("existing", existing), ("produced", produced)]))
    });

    let module = build_module(&definition).unwrap();
    let existing = module.result("existing").unwrap();
    assert_eq!(existing.id, "Module1:Token");
    assert!(existing.dependencies.is_empty());

    let produced = module.result("produced").unwrap();
    assert_eq!(produced.dependency_ids(), vec!["Module1:Factory#deployed"]);
    match &produced.kind {
        FutureKind::ContractAt { address, .. } => {
            assert!(matches!(address, ContractAddress::Future(f) if f.id == "Module1:Factory#deployed"))
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_contract_at_rejects_bad_addresses() {
    let literal = define_module("Module1", |m| {
        let token = m.contract_at("Token", "somewhere", ContractAtOptions::default())?;
        Ok(results([("token", token)]))
    });
    assert!(matches!(
        build_module(&literal).unwrap_err(),
        ConstructionError::InvalidAddress { .. }
    ));

    let future = define_module("Module1", |m| {
        let other = m.contract("Other", args![], ContractOptions::default())?;
        let token = m.contract_at("Token", &other, ContractAtOptions::default())?;
        Ok(results([("token", token)]))
    });
    assert!(matches!(
        build_module(&future).unwrap_err(),
        ConstructionError::InvalidAddressFuture { .. }
    ));
}

#[test]
fn test_read_event_argument_ids_and_emitter() {
    let definition = define_module("Module1", |m| {
        let token = m.contract("Token", args![], ContractOptions::default())?;
        let mint = m.call(&token, "mint", args![], CallOptions::default())?;
        let from_deploy =
            m.read_event_argument(&token, "Created", "owner", ReadEventArgumentOptions::default())?;
        let from_call = m.read_event_argument(
            &mint,
            "Transfer",
            2u64,
            ReadEventArgumentOptions::default().event_index(1),
        )?;
        Ok(results([("fromDeploy", from_deploy), ("fromCall", from_call)]))
    });

    let module = build_module(&definition).unwrap();

    let from_deploy = module.result("fromDeploy").unwrap();
    assert_eq!(from_deploy.id, "Module1:Token#Created#owner#0");
    assert_eq!(from_deploy.dependency_ids(), vec!["Module1:Token"]);

    let from_call = module.result("fromCall").unwrap();
    assert_eq!(from_call.id, "Module1:Token#Transfer#2#1");
    assert_eq!(
        from_call.dependency_ids(),
        vec!["Module1:Token#mint", "Module1:Token"]
    );
}

fn bottom_module() -> ModuleDefinition {
    define_module("BottomModule", |m| {
        let contract = m.contract("Contract1", args![], ContractOptions::default())?;
        Ok(results([("bottomContract", contract)]))
    })
}

#[test]
fn test_diamond_use_module_shares_futures() {
    let bottom = bottom_module();
    let left = {
        let bottom = bottom.clone();
        define_module("LeftModule", move |m| {
            let sub = m.use_module(&bottom)?;
            let contract = m.result_of(&sub, "bottomContract")?;
            Ok(results([("leftContract", contract)]))
        })
    };
    let right = {
        let bottom = bottom.clone();
        define_module("RightModule", move |m| {
            let sub = m.use_module(&bottom)?;
            let contract = m.result_of(&sub, "bottomContract")?;
            Ok(results([("rightContract", contract)]))
        })
    };
    let top = define_module("TopModule", move |m| {
        let left_sub = m.use_module(&left)?;
        let right_sub = m.use_module(&right)?;
        Ok(results([
            ("leftContract", m.result_of(&left_sub, "leftContract")?),
            ("rightContract", m.result_of(&right_sub, "rightContract")?),
        ]))
    });

    let module = build_module(&top).unwrap();

    let left_contract = module.result("leftContract").unwrap();
    let right_contract = module.result("rightContract").unwrap();
    assert!(Arc::ptr_eq(left_contract, right_contract));

    let left_bottom = &module.submodules["LeftModule"].submodules["BottomModule"];
    let right_bottom = &module.submodules["RightModule"].submodules["BottomModule"];
    assert!(Arc::ptr_eq(left_bottom, right_bottom));

    assert_eq!(module.all_modules().len(), 4);
    assert_eq!(module.all_futures().len(), 1);
}

#[test]
fn test_dependencies_cross_module_boundaries() {
    let bottom = bottom_module();
    let definition = define_module("Module", move |m| {
        let sub = m.use_module(&bottom)?;
        let contract1 = m.result_of(&sub, "bottomContract")?;
        let contract2 = m.contract("Contract2", args![&contract1], ContractOptions::default())?;
        Ok(results([("contract1", contract1), ("contract2", contract2)]))
    });

    let module = build_module(&definition).unwrap();
    let contract2 = module.result("contract2").unwrap();
    assert_eq!(contract2.dependency_ids(), vec!["BottomModule:Contract1"]);
    assert!(Arc::ptr_eq(
        &contract2.dependencies[0],
        module.result("contract1").unwrap()
    ));
}

#[test]
fn test_nested_results() {
    let definition = define_module("Module1", |m| {
        let token = m.contract("Token", args![], ContractOptions::default())?;
        Ok(results([("tokens", results([("main", token)]))]))
    });

    let module = build_module(&definition).unwrap();
    assert_eq!(
        module.result_at(&["tokens", "main"]).unwrap().id,
        "Module1:Token"
    );
    assert!(module.result("tokens").is_none());
}

#[test]
fn test_unknown_submodule_result() {
    let bottom = bottom_module();
    let definition = define_module("Module", move |m| {
        let sub = m.use_module(&bottom)?;
        let missing = m.result_of(&sub, "missing")?;
        Ok(results([("missing", missing)]))
    });

    assert!(matches!(
        build_module(&definition).unwrap_err(),
        ConstructionError::UnknownResult { .. }
    ));
}

#[test]
fn test_result_from_outside_the_module_fails() {
    let outside = build_module(&bottom_module()).unwrap();
    let foreign = Arc::clone(outside.result("bottomContract").unwrap());

    let definition = define_module("Module", move |_m| {
        Ok(results([("foreign", Arc::clone(&foreign))]))
    });

    assert!(matches!(
        build_module(&definition).unwrap_err(),
        ConstructionError::ForeignResult { .. }
    ));
}

#[test]
fn test_cyclic_module_use_fails() {
    let slot: Arc<OnceLock<ModuleDefinition>> = Arc::new(OnceLock::new());
    let inner = Arc::clone(&slot);
    let definition = define_module("Loop", move |m| {
        if let Some(itself) = inner.get() {
            m.use_module(itself)?;
        }
        Ok(ModuleResults::new())
    });
    slot.set(definition.clone()).unwrap();

    let err = build_module(&definition).unwrap_err();
    assert!(matches!(err, ConstructionError::CyclicModuleUse { ref module_id, .. } if module_id == "Loop"));
}

#[test]
fn test_two_definitions_with_one_id_fail() {
    let first = bottom_module();
    let second = bottom_module();
    let definition = define_module("Module", move |m| {
        m.use_module(&first)?;
        m.use_module(&second)?;
        Ok(ModuleResults::new())
    });

    assert!(matches!(
        build_module(&definition).unwrap_err(),
        ConstructionError::DuplicateModuleId { .. }
    ));
}

#[test]
fn test_accounts_are_visible_to_definitions() {
    let definition = define_module("Module1", |m| {
        assert_eq!(m.accounts(), ["0x01".to_string(), "0x02".to_string()]);
        assert_eq!(m.get_account(1), AccountRuntimeValue::new(1));
        Ok(ModuleResults::new())
    });

    let mut constructor = ModuleConstructor::new(vec!["0x01".to_string(), "0x02".to_string()]);
    assert!(constructor.construct(&definition).is_ok());
}
