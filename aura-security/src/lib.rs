pub mod log_channels;
pub mod raid;
pub mod service;
pub mod settings;
pub mod strikes;

pub use raid::{RAID_INTERVAL, RAID_THRESHOLD};
pub use service::SecurityService;
pub use settings::{Feature, GuildSettings};
pub use strikes::STRIKE_THRESHOLD;
