use clap::Parser;

use crate::{
    config::HarperArgs,
    payload::{Payload, PayloadError},
};

/// Publishers: one-shot with a literal, continuous without.
#[derive(Parser, Debug)]
#[command(version)]
pub struct PublishCli {
    #[command(flatten)]
    pub harper: HarperArgs,

    /// JSON payload to publish once, e.g. '{"temp":72.5,"location":"test"}'.
    /// Without it, generated readings are published every five seconds.
    pub payload: Option<String>,
}

impl PublishCli {
    /// The validated one-shot payload, if one was given.
    pub fn one_shot(&self) -> Result<Option<Payload>, PayloadError> {
        self.payload.as_deref().map(Payload::parse).transpose()
    }
}

/// Test publishers: a single publish of a required literal.
#[derive(Parser, Debug)]
#[command(version)]
pub struct OneShotCli {
    #[command(flatten)]
    pub harper: HarperArgs,

    /// JSON payload to publish, e.g. '{"temp":72.5,"location":"test-lab"}'.
    pub payload: String,
}

impl OneShotCli {
    pub fn payload(&self) -> Result<Payload, PayloadError> {
        Payload::parse(&self.payload)
    }
}

#[derive(Parser, Debug)]
#[command(version)]
pub struct SubscribeCli {
    #[command(flatten)]
    pub harper: HarperArgs,
}
