//! Component units: explicit and link-time collected.

use wired_rust::{discover_unit, discover_units, ComponentUnit, HandlerType};

use crate::support::audit::Archive;
use crate::support::billing::Billing;
use crate::support::orders::Orders;
use crate::support::shipping::Shipping;
use crate::support;

#[test]
fn unit_scan_covers_every_type() {
    let unit = ComponentUnit::new("sales")
        .with::<Orders>()
        .with::<Archive>()
        .with::<Billing>();

    let descriptors = discover_unit(&unit, support::factory_for).unwrap();
    let methods: Vec<_> = descriptors.iter().map(|d| d.method()).collect();
    assert_eq!(methods, vec!["place", "cancel", "charge", "notify"]);
}

#[test]
fn units_are_concatenated_in_order() {
    let sales = ComponentUnit::new("sales").with::<Orders>();
    let logistics = ComponentUnit::new("logistics").with_type(HandlerType::of::<Shipping>());
    let empty = ComponentUnit::new("empty");

    let descriptors = discover_units([&logistics, &empty, &sales], support::factory_for).unwrap();
    let methods: Vec<_> = descriptors.iter().map(|d| d.method()).collect();
    assert_eq!(methods, vec!["ship", "place", "cancel"]);
}

#[test]
fn unit_of_types_without_handlers_is_empty() {
    let unit = ComponentUnit::new("archive").with::<Archive>();
    let descriptors = discover_unit(&unit, |_| unreachable!("no factory needed")).unwrap();
    assert!(descriptors.is_empty());
}

#[test]
fn unit_from_iterator() {
    let unit: ComponentUnit = vec![HandlerType::of::<Orders>(), HandlerType::of::<Shipping>()]
        .into_iter()
        .collect();
    assert_eq!(unit.len(), 2);
    assert_eq!(discover_unit(&unit, support::factory_for).unwrap().len(), 3);
}

#[cfg(feature = "inventory")]
mod collected {
    use super::*;

    #[test]
    fn collect_finds_types_by_module() {
        let unit = ComponentUnit::collect("handlers::support::shipping");
        assert_eq!(unit.name(), "handlers::support::shipping");
        assert_eq!(unit.types(), &[HandlerType::of::<Shipping>()]);
    }

    #[test]
    fn collect_includes_submodules_and_sorts_by_name() {
        let unit = ComponentUnit::collect("handlers::support");

        let names: Vec<_> = unit.types().iter().map(|ty| ty.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);

        for expected in [
            HandlerType::of::<Orders>(),
            HandlerType::of::<Billing>(),
            HandlerType::of::<Shipping>(),
            HandlerType::of::<Archive>(),
        ] {
            assert!(unit.types().contains(&expected));
        }
        assert!(unit
            .types()
            .iter()
            .all(|ty| ty.module_path().starts_with("handlers::support::")));
    }

    #[test]
    fn collected_unit_discovers_cleanly() {
        let unit = ComponentUnit::collect("handlers::support");
        let descriptors = discover_unit(&unit, support::factory_for).unwrap();

        // orders 2, billing 2, shipping 1, faulty 1, audit 1, relay 2
        assert_eq!(descriptors.len(), 9);
    }

    #[test]
    fn collect_with_unknown_prefix_is_empty() {
        assert!(ComponentUnit::collect("handlers::nowhere").is_empty());
    }
}
