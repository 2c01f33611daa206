//! Marked methods whose shape discovery must refuse.

use wired_rust::{discover, handler, handlers, CancellationToken, Handlers, InstanceFactory, ShapeViolation};

use crate::support::messages::PlaceOrder;

#[derive(Default)]
pub struct NoMessage;

#[handlers]
impl NoMessage {
    #[handler]
    pub fn tick(&self) {}
}

#[derive(Default)]
pub struct ScalarMessage;

#[handlers]
impl ScalarMessage {
    #[handler]
    pub fn add(&self, _cents: u64) {}
}

#[derive(Default)]
pub struct StringMessage;

#[handlers]
impl StringMessage {
    #[handler]
    pub fn greet(&self, _name: String) {}
}

#[derive(Default)]
pub struct BorrowedMessage;

#[handlers]
impl BorrowedMessage {
    #[handler]
    pub fn place(&self, _command: &PlaceOrder) {}
}

#[derive(Default)]
pub struct ReturnsValue;

#[handlers]
impl ReturnsValue {
    #[handler]
    pub fn place(&self, _command: PlaceOrder) -> u32 {
        0
    }
}

#[derive(Default)]
pub struct ReturnsResultValue;

#[handlers]
impl ReturnsResultValue {
    #[handler]
    pub async fn place(&self, _command: PlaceOrder) -> Result<u32, String> {
        Ok(0)
    }
}

#[derive(Default)]
pub struct SyncWithToken;

#[handlers]
impl SyncWithToken {
    #[handler]
    pub fn place(&self, _command: PlaceOrder, _token: CancellationToken) {}
}

#[derive(Default)]
pub struct TokenFirst;

#[handlers]
impl TokenFirst {
    #[handler]
    pub async fn place(&self, _token: CancellationToken, _command: PlaceOrder) {}
}

#[derive(Default)]
pub struct TokenNotLast;

#[handlers]
impl TokenNotLast {
    #[handler]
    pub async fn place(&self, _command: PlaceOrder, _token: CancellationToken, _retries: u8) {}
}

#[derive(Default)]
pub struct ExtraParameter;

#[handlers]
impl ExtraParameter {
    #[handler]
    pub async fn place(&self, _command: PlaceOrder, _retries: u8) {}
}

fn violation_of<T: Handlers + Default>() -> ShapeViolation {
    discover::<T>(InstanceFactory::default_of::<T>())
        .unwrap_err()
        .violation
}

#[test]
fn zero_parameters_are_rejected() {
    let err = discover::<NoMessage>(InstanceFactory::default_of::<NoMessage>()).unwrap_err();

    assert_eq!(err.violation, ShapeViolation::MissingMessage);
    assert_eq!(err.method, "tick");
    let message = err.to_string();
    assert!(message.contains("NoMessage::tick"));
    assert!(message.contains("handler must accept a message parameter"));
}

#[test]
fn sync_with_token_is_rejected() {
    let err = discover::<SyncWithToken>(InstanceFactory::default_of::<SyncWithToken>()).unwrap_err();

    assert_eq!(err.violation, ShapeViolation::CancellationOnSync);
    assert!(err
        .to_string()
        .contains("cancellation is only supported on asynchronous handlers"));
}

#[test]
fn scalar_messages_are_rejected() {
    assert_eq!(
        violation_of::<ScalarMessage>(),
        ShapeViolation::MessageNotComposite("u64")
    );
    assert!(matches!(
        violation_of::<StringMessage>(),
        ShapeViolation::MessageNotComposite(name) if name.ends_with("String")
    ));
}

#[test]
fn borrowed_messages_are_rejected() {
    assert!(matches!(
        violation_of::<BorrowedMessage>(),
        ShapeViolation::MessageNotComposite(text) if text.contains("PlaceOrder")
    ));
}

#[test]
fn value_returns_are_rejected() {
    assert_eq!(
        violation_of::<ReturnsValue>(),
        ShapeViolation::UnsupportedReturn("u32")
    );
    assert!(matches!(
        violation_of::<ReturnsResultValue>(),
        ShapeViolation::UnsupportedReturn(text) if text.contains("Result")
    ));
}

#[test]
fn token_placement_is_enforced() {
    assert_eq!(violation_of::<TokenFirst>(), ShapeViolation::MissingMessage);
    assert_eq!(violation_of::<TokenNotLast>(), ShapeViolation::CancellationNotLast);
}

#[test]
fn extra_parameters_are_rejected() {
    assert_eq!(
        violation_of::<ExtraParameter>(),
        ShapeViolation::TooManyParameters(2)
    );
}
