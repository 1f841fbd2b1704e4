pub mod cli_controller;
pub mod download_trigger;
pub mod poller;
pub mod scheduler;

pub use cli_controller::ejecutar_cli;
pub use download_trigger::DownloadTrigger;
pub use poller::AvailabilityPoller;
pub use scheduler::{CycleReport, Scheduler, SchedulerState};
