//! Sending payloads to a resolved instance

use async_trait::async_trait;
use printlink_core::{select_auto, Error, Instance, Registry};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::base::Notifier;

/// Opaque job data handed to the transport unchanged
#[derive(Clone, PartialEq, Eq)]
pub struct Payload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("filename", &self.filename)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct DispatchError {
    pub reason: String,
}

impl DispatchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Final result of one send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { instance_id: String },
    Failed { instance_id: String, reason: String },
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }

    /// Convert into a `Result`, yielding the target id on success
    pub fn into_result(self) -> Result<String, Error> {
        match self {
            DispatchOutcome::Sent { instance_id } => Ok(instance_id),
            DispatchOutcome::Failed {
                instance_id,
                reason,
            } => Err(Error::Dispatch {
                target: instance_id,
                reason,
            }),
        }
    }
}

/// Moves a payload to a printer
#[async_trait]
pub trait Transport: Send + Sync {
    async fn transmit(&self, instance: &Instance, payload: &Payload) -> Result<(), DispatchError>;

    /// Message shown to the user after a successful transmit
    fn success_message(&self, instance: &Instance, payload: &Payload) -> String {
        format!(
            "Sent {} to {} at {}",
            payload.filename,
            instance.display_name(),
            instance.url
        )
    }
}

/// Transport that only logs; no network I/O happens
#[derive(Debug, Clone, Copy, Default)]
pub struct StubTransport;

#[async_trait]
impl Transport for StubTransport {
    async fn transmit(&self, instance: &Instance, payload: &Payload) -> Result<(), DispatchError> {
        info!(
            target_name = %instance.display_name(),
            url = %instance.url,
            file = %payload.filename,
            bytes = payload.len(),
            "would send job"
        );
        Ok(())
    }

    fn success_message(&self, instance: &Instance, _payload: &Payload) -> String {
        format!(
            "(Demo) Would send G-code to {} at {}",
            instance.display_name(),
            instance.url
        )
    }
}

/// Performs one send and reports the outcome
#[derive(Clone)]
pub struct DispatchGateway {
    transport: Arc<dyn Transport>,
}

impl DispatchGateway {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Single-shot send: no retry, no timeout
    pub async fn send(
        &self,
        instance: &Instance,
        payload: &Payload,
        notifier: &dyn Notifier,
    ) -> DispatchOutcome {
        match self.transport.transmit(instance, payload).await {
            Ok(()) => {
                info!(id = %instance.id, "send completed");
                notifier.notify(&self.transport.success_message(instance, payload));
                DispatchOutcome::Sent {
                    instance_id: instance.id.clone(),
                }
            }
            Err(e) => {
                warn!(id = %instance.id, reason = %e, "send failed");
                notifier.notify(&format!(
                    "Send to {} failed: {}",
                    instance.display_name(),
                    e
                ));
                DispatchOutcome::Failed {
                    instance_id: instance.id.clone(),
                    reason: e.reason,
                }
            }
        }
    }
}

impl Default for DispatchGateway {
    fn default() -> Self {
        Self::new(Arc::new(StubTransport))
    }
}

/// Programmatic entry point for other collaborators.
///
/// Never prompts: the target is the default instance, else the first one.
#[derive(Clone)]
pub struct Actions {
    registry: Arc<Registry>,
    gateway: DispatchGateway,
    notifier: Arc<dyn Notifier>,
}

impl Actions {
    pub fn new(
        registry: Arc<Registry>,
        gateway: DispatchGateway,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            registry,
            gateway,
            notifier,
        }
    }

    pub async fn send(&self, payload: Payload) -> Result<DispatchOutcome, Error> {
        self.dispatch(None, payload).await
    }

    /// Send to a specific instance, falling back like `send` when `id` is stale
    pub async fn send_to(&self, id: &str, payload: Payload) -> Result<DispatchOutcome, Error> {
        self.dispatch(Some(id), payload).await
    }

    async fn dispatch(
        &self,
        explicit: Option<&str>,
        payload: Payload,
    ) -> Result<DispatchOutcome, Error> {
        let instances = self.registry.list();
        let target = match select_auto(&instances, explicit) {
            Ok(target) => target,
            Err(e) => {
                self.notifier.notify(&e.to_string());
                return Err(e);
            }
        };
        Ok(self
            .gateway
            .send(&target, &payload, self.notifier.as_ref())
            .await)
    }
}
