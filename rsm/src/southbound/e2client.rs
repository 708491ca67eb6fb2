//! e2client - the E2 transport contract the core consumes

use crate::E2NodeId;
use crate::errors::Result;
use async_channel::Sender;
use async_trait::async_trait;

/// An encoded control message: opaque service-model header and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E2ControlRequest {
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
}

/// The RAN's response to a control message.  The transport may complete a
/// call without a response; dispatch treats that as a failure.
#[derive(Debug, Clone, Default)]
pub struct E2ControlResponse {
    pub payload: Vec<u8>,
}

/// One RIC indication as delivered by a subscription.
#[derive(Debug, Clone)]
pub struct Indication {
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubsequentActionType {
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeToWait {
    Zero,
}

/// A subscription action.  The manager subscribes a single report action
/// with continue / zero-wait, so indications arrive unbatched in arrival
/// order.
#[derive(Debug, Clone)]
pub struct SubscriptionAction {
    pub id: i32,
    pub action_type: ActionType,
    pub subsequent_action: SubsequentActionType,
    pub time_to_wait: TimeToWait,
}

impl SubscriptionAction {
    pub fn report() -> Self {
        SubscriptionAction {
            id: 0,
            action_type: ActionType::Report,
            subsequent_action: SubsequentActionType::Continue,
            time_to_wait: TimeToWait::Zero,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubscriptionSpec {
    pub event_trigger: Vec<u8>,
    pub actions: Vec<SubscriptionAction>,
}

/// The E2 client SDK surface: synchronous control call-outs and push-style
/// subscriptions.  Dial/stream plumbing lives behind the implementation.
#[async_trait]
pub trait E2Client: Send + Sync + Clone + 'static {
    /// Send one control message and wait for the RAN's response.  `Ok(None)`
    /// means the transport completed without a response message.
    async fn control(
        &self,
        node: &E2NodeId,
        request: E2ControlRequest,
    ) -> Result<Option<E2ControlResponse>>;

    /// Open a subscription; indications are pushed into `sink` until the
    /// subscription ends or the receiver is dropped.
    async fn subscribe(
        &self,
        node: &E2NodeId,
        name: &str,
        spec: SubscriptionSpec,
        sink: Sender<Indication>,
    ) -> Result<()>;
}
