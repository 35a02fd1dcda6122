//! Shared bot state.
//!
//! [`Bot`] bundles the services the connection, the handlers, the timer tasks
//! and the dashboard all reach into. It is built once at startup and passed
//! around as `Arc<Bot>`; there are no globals.

use crate::api::Fetcher;
use crate::config::Config;
use crate::db::Database;
use crate::network::Outbound;
use crate::sync::{ChatterSync, FollowerSync, FollowersEndpoint};
use std::sync::Arc;

/// Central shared state container.
pub struct Bot {
    /// Joined channel, `#`-prefixed.
    pub channel: String,

    /// Nickname the bot authenticates as.
    pub nick: String,

    /// Follower snapshot and announcements.
    pub followers: Arc<FollowerSync>,

    /// Roster polling and watch-time accumulation.
    pub chatters: Arc<ChatterSync>,

    /// Watch-time store.
    pub db: Database,

    /// Queue towards the relay.
    pub outbound: Outbound,
}

impl Bot {
    /// Wire up the syncs for the channel named in `config`.
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn Fetcher>,
        db: Database,
        outbound: Outbound,
    ) -> Arc<Self> {
        let channel = config.relay.irc_channel();
        let owner = config.relay.owner();

        let followers = FollowerSync::new(
            fetcher.clone(),
            FollowersEndpoint {
                url: config.api.followers_url(owner),
                accept: config.api.accept.clone(),
                client_id: config.api.client_id.clone(),
            },
            channel.clone(),
            outbound.clone(),
        );

        let chatters = ChatterSync::new(
            fetcher,
            config.roster.chatters_url(owner),
            db.clone(),
            owner,
        );

        Arc::new(Self {
            channel,
            nick: config.relay.nick.clone(),
            followers: Arc::new(followers),
            chatters: Arc::new(chatters),
            db,
            outbound,
        })
    }
}
