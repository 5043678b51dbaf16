//! Shape tables generated by `#[derive(Record)]`.

use std::any::Any;

use recast_api::error::FieldError;
use recast_api::mapping::{CopyPlan, Strategy};
use recast_api::schema::TypeInfo;
use recast_api::value::BoxedValue;
use recast_api::Record;

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Person {
    name: Option<String>,
    age: i32,
    email: String,
    #[record(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct PersonDto {
    name: Option<String>,
    age: Option<i64>,
    nickname: String,
    r#type: u8,
}

#[derive(Record, Debug, Clone)]
#[record(no_default)]
#[allow(dead_code)]
struct Sealed {
    id: u64,
}

#[test]
fn shape_lists_fields_in_declaration_order() {
    let shape = Person::shape();
    let names: Vec<_> = shape.fields().iter().map(|f| f.name).collect();
    assert_eq!(names, ["name", "age", "email"]);
    assert_eq!(shape.ty(), TypeInfo::of::<Person>());
    assert_eq!(shape.len(), 3);
}

#[test]
fn option_fields_are_declared_by_inner_type() {
    let name = Person::shape().field("name").unwrap();
    assert!(name.nullable);
    assert_eq!(name.ty, TypeInfo::of::<String>());

    let age = Person::shape().field("age").unwrap();
    assert!(!age.nullable);
    assert_eq!(age.ty, TypeInfo::of::<i32>());
}

#[test]
fn raw_identifiers_are_unprefixed() {
    assert!(PersonDto::shape().field("type").is_some());
}

#[test]
fn shape_is_built_once() {
    assert!(std::ptr::eq(Person::shape(), Person::shape()));
}

#[test]
fn getters_report_null_for_none() {
    let p = Person {
        name: None,
        age: 30,
        ..Default::default()
    };
    let shape = Person::shape();
    assert!((shape.field("name").unwrap().get)(&p).is_none());

    let age = (shape.field("age").unwrap().get)(&p).unwrap();
    assert_eq!(age.downcast_ref::<i32>(), Some(&30));
}

#[test]
fn assign_and_store_write_through() {
    let mut p = Person::default();
    let shape = Person::shape();

    let name = String::from("Alice");
    (shape.field("name").unwrap().assign)(&mut p, Some(&name as &dyn Any)).unwrap();
    (shape.field("age").unwrap().store)(&mut p, Some(Box::new(30_i32) as BoxedValue)).unwrap();
    assert_eq!(p.name.as_deref(), Some("Alice"));
    assert_eq!(p.age, 30);

    (shape.field("name").unwrap().assign)(&mut p, None).unwrap();
    assert_eq!(p.name, None);

    let err = (shape.field("email").unwrap().assign)(&mut p, None).unwrap_err();
    assert_eq!(err, FieldError::NotNullable { field: "email" });
}

#[test]
fn instantiate_follows_default_or_fails() {
    assert_eq!(Person::instantiate().unwrap(), Person::default());

    let err = Sealed::instantiate().unwrap_err();
    assert!(err.type_name.ends_with("Sealed"));
}

#[test]
fn plan_links_by_exact_name_in_destination_order() {
    let plan = CopyPlan::build::<Person, PersonDto>();
    let links: Vec<_> = plan.links().iter().map(|l| (l.name, l.strategy)).collect();
    assert_eq!(
        links,
        [("name", Strategy::Passthrough), ("age", Strategy::Convert)]
    );
    assert_eq!(plan.conversions(), 1);
    assert_eq!(plan.source(), TypeInfo::of::<Person>());
    assert_eq!(plan.target(), TypeInfo::of::<PersonDto>());
}
