pub mod config;
pub mod enums;
pub mod error;
pub mod market;
pub mod services;
pub mod scheduler;
pub mod view;
pub mod app;

pub use config::Config;
pub use enums::{ TokenStatus, BadgeType, BadgeIcon, SortOption, MetricSize, CardMetric };
pub use error::{ AppError, Result };
pub use app::{ PulseApp, TickOutcome };
pub use scheduler::{ Scheduler, SchedulerConfig, TickEvent };
