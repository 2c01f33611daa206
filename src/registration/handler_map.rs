//! In-memory handler map: one adapter per message type.
//!
//! ```ignore
//! let mut map = HandlerMap::new();
//! register_all(&mut map, discover::<Billing>(InstanceFactory::new(|| Billing))?)?;
//!
//! map.dispatch_message(Charge { cents: 500 }, CancellationToken::new()).await?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::RegistrationTarget;
use crate::adapter::Adapter;
use crate::descriptor::HandlerSummary;
use crate::error::InvocationError;
use crate::message::AnyMessage;
use crate::metadata::TypeInfo;

/// What to do when a second handler claims a message type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Keep the first handler and report the newcomer.
    #[default]
    Reject,
    /// Keep the newcomer.
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("message `{message_type}` is already handled by `{existing}`; refusing `{incoming}`")]
    Duplicate {
        message_type: &'static str,
        existing: String,
        incoming: String,
    },
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no handler registered for message `{message_type}`")]
    NoHandler { message_type: &'static str },

    #[error(transparent)]
    Invocation(#[from] InvocationError),
}

/// Routes each message to the single adapter registered for its type.
#[derive(Debug, Clone, Default)]
pub struct HandlerMap {
    adapters: HashMap<TypeId, Adapter>,
    policy: ConflictPolicy,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            adapters: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn get(&self, message_type: TypeId) -> Option<&Adapter> {
        self.adapters.get(&message_type)
    }

    pub fn get_for<M: Any>(&self) -> Option<&Adapter> {
        self.get(TypeId::of::<M>())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Registered message types, in no particular order.
    pub fn message_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.adapters.values().map(Adapter::message_type)
    }

    /// One summary per registration, sorted by message type name.
    pub fn summaries(&self) -> Vec<HandlerSummary> {
        let mut summaries: Vec<_> = self.adapters.values().map(Adapter::summary).collect();
        summaries.sort_by(|a, b| a.message_type.cmp(&b.message_type));
        summaries
    }

    /// Route a message to its handler and wait for it to settle.
    pub async fn dispatch(
        &self,
        message: AnyMessage,
        token: CancellationToken,
    ) -> Result<(), DispatchError> {
        let Some(adapter) = self.adapters.get(&message.type_id()) else {
            tracing::debug!(message = message.type_name(), "no handler for message");
            return Err(DispatchError::NoHandler {
                message_type: message.type_name(),
            });
        };
        adapter.call(message, token).await?;
        Ok(())
    }

    pub async fn dispatch_message<M: Any + Send>(
        &self,
        message: M,
        token: CancellationToken,
    ) -> Result<(), DispatchError> {
        self.dispatch(AnyMessage::new(message), token).await
    }
}

impl RegistrationTarget for HandlerMap {
    type Error = RegistrationError;

    fn register(&mut self, message_type: TypeInfo, adapter: Adapter) -> Result<(), RegistrationError> {
        if let Some(existing) = self.adapters.get(&message_type.id()) {
            let existing = label(existing);
            let incoming = label(&adapter);
            match self.policy {
                ConflictPolicy::Reject => {
                    return Err(RegistrationError::Duplicate {
                        message_type: message_type.name(),
                        existing,
                        incoming,
                    });
                }
                ConflictPolicy::Replace => {
                    tracing::warn!(
                        message = %message_type,
                        %existing,
                        %incoming,
                        "replacing handler"
                    );
                }
            }
        }
        self.adapters.insert(message_type.id(), adapter);
        Ok(())
    }
}

fn label(adapter: &Adapter) -> String {
    format!("{}::{}", adapter.declaring_type().name(), adapter.method())
}
