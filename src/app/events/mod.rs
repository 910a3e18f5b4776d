//! Intents, Commands und die beiden Event-Kanäle (intern/extern).

mod bus;
mod command;
mod engine_event;
mod host_event;
mod intent;

pub use bus::{EventBus, SubscriptionId};
pub use command::EngineCommand;
pub use engine_event::{CreateKind, EngineEvent};
pub use host_event::{HostEvent, PointerContext};
pub use intent::{CameraAction, EngineIntent, EntityType, ImportPayload};
