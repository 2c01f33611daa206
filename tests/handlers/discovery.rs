//! Discovery drivers over the support domain.

use std::cell::RefCell;
use std::sync::Arc;

use wired_rust::{
    discover, discover_type, discover_types, handler_types, HandlerShape, HandlerType,
    InstanceFactory,
};

use crate::support::billing::Billing;
use crate::support::messages::{
    CancelOrder, ChargeCard, Escalate, Forward, Notify, PlaceOrder, ShipOrder,
};
use crate::support::orders::Orders;
use crate::support::relay::Relay;
use crate::support::shipping::Shipping;
use crate::support;
use crate::support::audit::Archive;

#[test]
fn discover_returns_marked_methods_in_declaration_order() {
    let descriptors = discover::<Orders>(InstanceFactory::default_of::<Orders>()).unwrap();

    let methods: Vec<_> = descriptors.iter().map(|d| d.method()).collect();
    assert_eq!(methods, vec!["place", "cancel"]);
    assert!(descriptors[0].message_type().is::<PlaceOrder>());
    assert!(descriptors[1].message_type().is::<CancelOrder>());
    assert!(descriptors.iter().all(|d| d.declaring_type().is::<Orders>()));
}

#[test]
fn flags_for_the_three_legal_shapes() {
    let sync = discover::<Orders>(InstanceFactory::default_of::<Orders>()).unwrap();
    let fut = discover::<Billing>(InstanceFactory::default_of::<Billing>()).unwrap();
    let cancellable = discover::<Shipping>(InstanceFactory::default_of::<Shipping>()).unwrap();

    assert!(!sync[0].is_async());
    assert!(!sync[0].supports_cancellation());

    assert!(fut[0].is_async());
    assert!(!fut[0].supports_cancellation());

    assert!(cancellable[0].is_async());
    assert!(cancellable[0].supports_cancellation());
    assert!(cancellable[0].message_type().is::<ShipOrder>());
}

#[test]
fn impl_future_return_is_asynchronous() {
    let descriptors = discover::<Billing>(InstanceFactory::default_of::<Billing>()).unwrap();

    let notify = descriptors.iter().find(|d| d.method() == "notify").unwrap();
    assert_eq!(notify.shape(), HandlerShape::Async);
    assert!(notify.message_type().is::<Notify>());

    let charge = descriptors.iter().find(|d| d.method() == "charge").unwrap();
    assert!(charge.message_type().is::<ChargeCard>());
}

#[test]
fn boxed_future_returns_are_asynchronous() {
    let descriptors = discover::<Relay>(InstanceFactory::default_of::<Relay>()).unwrap();

    let found: Vec<_> = descriptors.iter().map(|d| (d.method(), d.shape())).collect();
    assert_eq!(
        found,
        vec![("forward", HandlerShape::Async), ("escalate", HandlerShape::Async)]
    );
    assert!(descriptors[0].message_type().is::<Forward>());
    assert!(descriptors[1].message_type().is::<Escalate>());
}

#[test]
fn type_without_marked_methods_yields_nothing() {
    let descriptors = discover::<Archive>(InstanceFactory::default_of::<Archive>()).unwrap();
    assert!(descriptors.is_empty());
}

#[test]
fn discover_types_concatenates_in_input_order() {
    let asked = RefCell::new(Vec::new());
    let descriptors = discover_types(handler_types![Shipping, Archive, Orders], |ty| {
        asked.borrow_mut().push(ty.name());
        support::factory_for(ty)
    })
    .unwrap();

    let methods: Vec<_> = descriptors.iter().map(|d| d.method()).collect();
    assert_eq!(methods, vec!["ship", "place", "cancel"]);

    let asked = asked.into_inner();
    assert_eq!(asked.len(), 2);
    assert!(asked[0].ends_with("Shipping"));
    assert!(asked[1].ends_with("Orders"));
}

#[test]
fn empty_type_set_is_not_an_error() {
    let descriptors = discover_types(Vec::<HandlerType>::new(), support::factory_for).unwrap();
    assert!(descriptors.is_empty());
}

#[test]
fn rescanning_produces_independent_descriptors() {
    let orders = Arc::new(Orders::default());
    let first = discover::<Orders>(InstanceFactory::shared(orders.clone())).unwrap();
    let second = discover_type(
        HandlerType::of::<Orders>(),
        InstanceFactory::shared(orders),
    )
    .unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.summary(), b.summary());
    }
}

#[test]
fn summaries_describe_each_handler() {
    let descriptors = discover::<Shipping>(InstanceFactory::default_of::<Shipping>()).unwrap();
    let json = serde_json::to_value(descriptors[0].summary()).unwrap();

    assert_eq!(json["method"], "ship");
    assert_eq!(json["is_async"], true);
    assert_eq!(json["supports_cancellation"], true);
    assert!(json["declaring_type"].as_str().unwrap().ends_with("Shipping"));
    assert!(json["message_type"].as_str().unwrap().ends_with("ShipOrder"));
}
