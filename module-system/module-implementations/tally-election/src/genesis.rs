use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tally_modules_api::Context;
use tally_state::WorkingSet;
use tracing::info;

use crate::types::ElectionMetadata;
use crate::{Election, ElectionError};

/// Initial configuration of the election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C::Address: Serialize + serde::de::DeserializeOwned")]
pub struct ElectionConfig<C: Context> {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// First second at which ballots are accepted.
    pub opens_at: u64,
    /// Last second at which ballots are accepted.
    pub closes_at: u64,
    /// The only identity allowed to register candidates and voters.
    pub admin: C::Address,
}

impl<C: Context> Election<C> {
    pub(crate) fn init_module(
        &self,
        config: &<Self as tally_modules_api::Module>::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        ensure!(
            self.metadata.get(working_set).is_none(),
            ElectionError::<C::Address>::AlreadyInitialized
        );
        ensure!(
            !config.title.trim().is_empty(),
            ElectionError::<C::Address>::InvalidConfig("the title must not be empty".to_owned())
        );
        ensure!(
            config.opens_at <= config.closes_at,
            ElectionError::<C::Address>::InvalidSchedule {
                opens_at: config.opens_at,
                closes_at: config.closes_at,
            }
        );

        let metadata = ElectionMetadata {
            title: config.title.clone(),
            description: config.description.clone(),
            opens_at: config.opens_at,
            closes_at: config.closes_at,
            admin: config.admin,
        };
        self.metadata.set(&metadata, working_set);
        self.total_votes.set(&0, working_set);
        self.eligible_voter_count.set(&0, working_set);

        info!(
            title = %metadata.title,
            opens_at = metadata.opens_at,
            closes_at = metadata.closes_at,
            admin = %metadata.admin,
            "Election created"
        );
        Ok(())
    }
}
