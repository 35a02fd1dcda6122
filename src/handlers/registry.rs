//! Command handler registry and dispatch.
//!
//! Maps a command token to a [`Handler`] descriptor. The descriptor's variant
//! fixes which parts of the line the handler receives, so dispatch is a table
//! lookup followed by a typed call.

use super::context::Context;
use crate::error::HandlerResult;
use crate::handlers::{connection, messaging};
use std::collections::HashMap;
use streambot_proto::ProtocolLine;
use tracing::info;

/// Parts of a line a handler asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Needs {
    pub prefix: bool,
    pub params: bool,
    pub message: bool,
}

/// Handler descriptor.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Invoked with no line arguments.
    Bare(fn(&Context<'_>) -> HandlerResult),
    /// Invoked with params and the trailing message.
    Payload(fn(&Context<'_>, &[&str], &str) -> HandlerResult),
    /// Invoked with the prefix, params and the trailing message.
    Sourced(fn(&Context<'_>, &str, &[&str], &str) -> HandlerResult),
}

impl Handler {
    /// Line parts this handler is supplied with.
    pub fn needs(&self) -> Needs {
        match self {
            Handler::Bare(_) => Needs::default(),
            Handler::Payload(_) => Needs {
                params: true,
                message: true,
                ..Needs::default()
            },
            Handler::Sourced(_) => Needs {
                prefix: true,
                params: true,
                message: true,
            },
        }
    }

    fn invoke(&self, ctx: &Context<'_>, line: &ProtocolLine<'_>) -> HandlerResult {
        match self {
            Handler::Bare(f) => f(ctx),
            Handler::Payload(f) => f(ctx, &line.params, &line.message),
            Handler::Sourced(f) => f(ctx, line.prefix, &line.params, &line.message),
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handler").field(&self.needs()).finish()
    }
}

/// Whether a line reached a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Unhandled,
}

/// Registry of line handlers.
#[derive(Debug)]
pub struct Registry {
    handlers: HashMap<&'static str, Handler>,
}

impl Registry {
    /// Create a registry with the relay handlers registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Keep-alive
        registry.register("PING", Handler::Payload(connection::ping));
        // End of MOTD: registration burst is over
        registry.register("376", Handler::Bare(connection::end_of_motd));
        // Chat
        registry.register("PRIVMSG", Handler::Sourced(messaging::privmsg));

        registry
    }

    /// A registry with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register (or replace) the handler for `command`.
    pub fn register(&mut self, command: &'static str, handler: Handler) {
        self.handlers.insert(command, handler);
    }

    /// Descriptor registered for `command`. Matching is exact.
    pub fn get(&self, command: &str) -> Option<&Handler> {
        self.handlers.get(command)
    }

    /// Registered command tokens, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut commands: Vec<_> = self.handlers.keys().copied().collect();
        commands.sort_unstable();
        commands
    }

    /// Dispatch one parsed line.
    ///
    /// Unknown commands are logged and counted, never an error. The handler
    /// runs synchronously; any slow work it starts is spawned.
    pub fn dispatch(&self, ctx: &Context<'_>, line: &ProtocolLine<'_>) -> HandlerResult<Dispatch> {
        crate::metrics::record_line();

        let Some(handler) = self.get(line.command) else {
            crate::metrics::record_unhandled();
            info!(
                prefix = %line.prefix,
                command = %line.command,
                params = ?line.params.as_slice(),
                message = %line.message,
                "Unhandled line"
            );
            return Ok(Dispatch::Unhandled);
        };

        handler.invoke(ctx, line)?;
        Ok(Dispatch::Handled)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
