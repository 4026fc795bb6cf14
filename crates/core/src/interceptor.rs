//! Chat interceptor chain
//!
//! Every chat line is wrapped in a [`ChatMessage`] and handed to each
//! interceptor in order. An interceptor returning `false` ends the walk. The
//! message's `broadcast_forward` flag, read after the walk, is the answer
//! given back to the host.

use std::sync::Arc;

use crate::command::CommandResolver;
use crate::error::Result;
use crate::host::HostRoom;
use crate::models::ChatMessage;

/// One step of chat processing
pub trait MessageInterceptor: Send + Sync {
    /// Inspect or rewrite `message`. Return false to stop the chain.
    fn intercept(&self, message: &mut ChatMessage, host: &dyn HostRoom) -> Result<bool>;
}

/// Ordered interceptors, frozen when the room is built
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn MessageInterceptor>>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Arc<dyn MessageInterceptor>>) -> Self {
        Self { interceptors }
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Walk the chain and return whether the host should relay the message.
    ///
    /// The first interceptor error aborts the walk and is returned as is.
    pub fn run(&self, message: &mut ChatMessage, host: &dyn HostRoom) -> Result<bool> {
        for (index, interceptor) in self.interceptors.iter().enumerate() {
            if !interceptor.intercept(message, host)? {
                tracing::debug!(
                    player_id = message.sent_by().id,
                    step = index,
                    "Interceptor stopped the chain"
                );
                break;
            }
        }
        Ok(message.broadcast_forward)
    }
}

/// Attaches the command named by the first word, if any. Never stops the chain.
pub struct CommandSettingInterceptor {
    resolver: Arc<dyn CommandResolver>,
}

impl CommandSettingInterceptor {
    pub fn new(resolver: Arc<dyn CommandResolver>) -> Self {
        Self { resolver }
    }
}

impl MessageInterceptor for CommandSettingInterceptor {
    fn intercept(&self, message: &mut ChatMessage, _host: &dyn HostRoom) -> Result<bool> {
        let command = match message.words().first() {
            Some(word) if self.resolver.is_command(word) => self.resolver.command_by_name(word),
            _ => None,
        };
        if command.is_some() {
            message.set_command(command);
        }
        Ok(true)
    }
}

/// What to do with a command the sender may not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeniedCommand {
    /// Leave the message alone and let the chain continue
    #[default]
    PassThrough,
    /// Hide the message and stop the chain, optionally telling the sender
    Swallow { notify: bool },
}

/// Runs the attached command when the sender is allowed to.
///
/// An executed command is never relayed and stops the chain.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutionInterceptor {
    on_denied: DeniedCommand,
}

impl CommandExecutionInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_denied(mut self, policy: DeniedCommand) -> Self {
        self.on_denied = policy;
        self
    }
}

impl MessageInterceptor for CommandExecutionInterceptor {
    fn intercept(&self, message: &mut ChatMessage, host: &dyn HostRoom) -> Result<bool> {
        let Some(command) = message.command().cloned() else {
            return Ok(true);
        };

        let sender_id = message.sent_by().id;
        let name = message.words().first().cloned().unwrap_or_default();
        if !command.can_execute(message.sent_by()) {
            tracing::info!(player_id = sender_id, command = %name, "Command denied");
            return match self.on_denied {
                DeniedCommand::PassThrough => Ok(true),
                DeniedCommand::Swallow { notify } => {
                    message.broadcast_forward = false;
                    if notify {
                        host.send_chat("You are not allowed to use this command.", Some(sender_id));
                    }
                    Ok(false)
                }
            };
        }

        message.broadcast_forward = false;
        let params = message.command_parameters().unwrap_or_default();
        tracing::info!(
            player_id = sender_id,
            command = %name,
            params = params.len(),
            "Executing command"
        );
        command.execute(host, message.sent_by(), params)?;
        Ok(false)
    }
}
