//! armonizador-services: reference host runtime for armonizador instances

pub mod outlet;
pub mod runtime;
pub mod scheduler;

pub use outlet::{ChannelOutlet, OutletEvent};
pub use runtime::{InstanceId, Runtime, RuntimeError, CLASS_NAME, MAX_ADVANCE_MS};
pub use scheduler::{ClockId, Scheduler, SchedulerClock};
