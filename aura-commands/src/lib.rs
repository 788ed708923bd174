pub mod logschannel;
pub mod security;

use aura_core::{Data, Error};

/// Every slash command the bot registers, in one place.
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        security::antinuke::antinuke(),
        security::antibotadd::antibotadd(),
        security::antiraid::antiraid(),
        security::antiall::antiall(),
        logschannel::logschannel(),
    ]
}
