pub mod background;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod registry;
pub mod session;
pub mod snapshot;
pub mod solo;

pub use background::BackgroundMuteEngine;
pub use controller::MixerController;
pub use error::MixerError;
pub use gateway::{
    AudioDeviceGateway, FocusReceiver, FocusSender, FocusSubscription, GatewayError,
    SubscriptionId, WindowFocusGateway,
};
pub use memory::InMemoryMixer;
pub use registry::SessionRegistry;
pub use session::{
    MasterState, SYSTEM_SESSION_NAME, Session, SessionRecord, application_name, parse_pid,
};
pub use snapshot::{SessionSnapshot, SessionSnapshotProducer};
pub use solo::{SoloEngine, SoloOutcome};
