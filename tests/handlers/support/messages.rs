#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancelOrder {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipOrder {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeCard {
    pub cents: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notify {
    Email(String),
    Sms(String),
}

#[derive(Debug)]
pub struct Detonate;

#[derive(Debug, Clone, PartialEq)]
pub struct Forward {
    pub id: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Escalate {
    pub id: u32,
}
