pub mod domain;
pub mod ports;
pub mod sample;
pub mod store;

pub use domain::{Day, Event};
pub use ports::{PortError, PortResult, ScheduleRepository};
pub use store::{EventUpdate, NewEvent, ScheduleStore, StoreError, StoreResult};
