use aura_security::SecurityService;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub security: SecurityService,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
