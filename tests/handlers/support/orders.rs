use std::sync::Mutex;

use thiserror::Error;
use wired_rust::{handler, handlers};

use super::messages::{CancelOrder, PlaceOrder};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("unknown order {0}")]
    Unknown(u32),
}

#[derive(Default)]
pub struct Orders {
    pub placed: Mutex<Vec<u32>>,
    pub cancelled: Mutex<Vec<u32>>,
}

#[handlers]
impl Orders {
    #[handler]
    pub fn place(&self, command: PlaceOrder) {
        self.placed.lock().unwrap().push(command.id);
    }

    #[handler]
    pub fn cancel(&self, command: CancelOrder) -> Result<(), OrderError> {
        let mut placed = self.placed.lock().unwrap();
        let Some(index) = placed.iter().position(|id| *id == command.id) else {
            return Err(OrderError::Unknown(command.id));
        };
        placed.remove(index);
        self.cancelled.lock().unwrap().push(command.id);
        Ok(())
    }

    pub fn placed(&self) -> Vec<u32> {
        self.placed.lock().unwrap().clone()
    }
}
