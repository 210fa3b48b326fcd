use crate::{
    environment::prelude::{Environment, Properties, Value, NULL},
    eval::prelude::RuntimeErrorType
};

#[test]
fn test_declare_and_lookup() {
    let root = Environment::root();

    root.borrow_mut().declare("x", Value::number(1.0), false).unwrap();

    assert_eq!(root.borrow().lookup("x").unwrap(), Value::number(1.0));

    let err = root.borrow().lookup("y").unwrap_err();
    assert_eq!(err.error, RuntimeErrorType::UnresolvedIdentifier { name: "y".into() });
}

#[test]
fn test_duplicate_declaration() {
    let root = Environment::root();

    root.borrow_mut().declare("x", NULL, false).unwrap();
    let err = root.borrow_mut().declare("x", NULL, true).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::DuplicateDeclaration { name: "x".into() });
}

#[test]
fn test_shadowing_leaves_parent_untouched() {
    let root = Environment::root();
    root.borrow_mut().declare("x", Value::number(1.0), false).unwrap();

    let child = Environment::child(&root);
    child.borrow_mut().declare("x", Value::number(2.0), false).unwrap();
    child.borrow_mut().assign("x", Value::number(3.0)).unwrap();

    assert_eq!(child.borrow().lookup("x").unwrap(), Value::number(3.0));
    assert_eq!(root.borrow().lookup("x").unwrap(), Value::number(1.0));
}

#[test]
fn test_assign_walks_up_the_chain() {
    let root = Environment::root();
    root.borrow_mut().declare("count", Value::number(0.0), false).unwrap();

    let grandchild = Environment::child(&Environment::child(&root));
    grandchild.borrow_mut().assign("count", Value::number(5.0)).unwrap();

    assert_eq!(root.borrow().get("count"), Some(Value::number(5.0)));
    assert_eq!(grandchild.borrow().get("count"), None);

    let err = grandchild.borrow_mut().assign("missing", NULL).unwrap_err();
    assert_eq!(err.error, RuntimeErrorType::UnresolvedIdentifier { name: "missing".into() });
}

#[test]
fn test_constant_reassignment() {
    let root = Environment::root();
    root.borrow_mut().declare("PI", Value::number(3.14), true).unwrap();

    let child = Environment::child(&root);
    let err = child.borrow_mut().assign("PI", Value::number(3.0)).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::ConstantReassignment { name: "PI".into() });
    assert_eq!(root.borrow().lookup("PI").unwrap(), Value::number(3.14));
}

#[test]
fn test_truthiness() {
    let falsy = vec![NULL, Value::boolean(false), Value::number(0.0), Value::string("")];
    let truthy = vec![
        Value::boolean(true),
        Value::number(-1.0),
        Value::string("0"),
        Value::array(vec![]),
        Value::object(Properties::new()),
    ];

    for value in falsy {
        assert!(!value.is_truthy(), "{value:?} should be falsy");
    }

    for value in truthy {
        assert!(value.is_truthy(), "{value:?} should be truthy");
    }
}

#[test]
fn test_string_coercion() {
    let nested = Value::array(vec![
        Value::number(1.0),
        Value::array(vec![Value::number(2.5), Value::string("a")]),
        NULL,
    ]);

    assert_eq!(nested.to_string(), "1,2.5,a,null");
    assert_eq!(Value::number(-0.0).to_string(), "0");
    assert_eq!(Value::number(1.0 / 0.0).to_string(), "Infinity");
    assert_eq!(Value::object(Properties::new()).to_string(), "[object Object]");
}

#[test]
fn test_inspect_quotes_nested_strings() {
    let properties = Properties::from_iter([
        ("name".to_string(), Value::string("Sara")),
        ("tags".to_string(), Value::array(vec![Value::string("a"), Value::number(2.0)])),
    ]);

    assert_eq!(Value::string("plain").inspect(), "plain");
    assert_eq!(Value::object(properties).inspect(), r#"{ name: "Sara", tags: ["a", 2] }"#);
    assert_eq!(Value::object(Properties::new()).inspect(), "{}");
}

#[test]
fn test_self_containing_values_print_circular() {
    let array = Value::array(vec![Value::number(1.0)]);
    let object = Value::object(Properties::new());

    if let (Value::Array { values }, Value::Object { properties }) = (&array, &object) {
        values.borrow_mut().push(array.clone());
        values.borrow_mut().push(object.clone());
        properties.borrow_mut().insert("self", object.clone());
        properties.borrow_mut().insert("list", array.clone());
    }

    assert_eq!(array.inspect(), "[1, [Circular], { self: [Circular], list: [Circular] }]");
    assert_eq!(object.inspect(), "{ self: [Circular], list: [1, [Circular], [Circular]] }");
    assert_eq!(array.to_string(), "1,,[object Object]");
}

#[test]
fn test_shared_values_are_not_circular() {
    let shared = Value::array(vec![Value::number(2.0)]);
    let outer = Value::array(vec![shared.clone(), shared]);

    assert_eq!(outer.inspect(), "[[2], [2]]");
    assert_eq!(outer.to_string(), "2,2");
}

#[test]
fn test_properties_keep_insertion_order() {
    let mut properties = Properties::new();

    properties.insert("b", Value::number(1.0));
    properties.insert("a", Value::number(2.0));
    properties.insert("b", Value::number(3.0));

    let keys = properties.iter().map(|(key, _)| key.as_str()).collect::<Vec<&str>>();

    assert_eq!(keys, vec!["b", "a"]);
    assert_eq!(properties.get("b"), Some(&Value::number(3.0)));
}
