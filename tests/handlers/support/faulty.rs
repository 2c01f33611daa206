use wired_rust::{handler, handlers};

use super::messages::Detonate;

#[derive(Default)]
pub struct Faulty;

#[handlers]
impl Faulty {
    #[handler]
    pub fn explode(&self, _: Detonate) {
        panic!("detonated");
    }
}
