//! Server builder and accept loop.
//!
//! Ties the layers together: protocol ← session ← {semaphore, guild, mail}
//! services, one handler task per accepted TCP connection.

use std::sync::Arc;

use ravengate_guild::GuildService;
use ravengate_mail::MailService;
use ravengate_semaphore::SemaphoreManager;
use ravengate_session::SessionRegistry;
use sqlx::SqlitePool;
use tokio::net::TcpListener;

use crate::bridge::ChatBridge;
use crate::handler::handle_connection;
use crate::RavengateError;

/// Server-level configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the TCP listener binds to.
    pub bind_addr: String,
    /// External chat channel relayed in-game; events from any other
    /// channel are dropped at the bridge.
    pub bridge_channel_id: u64,
    /// The bridge's own author id, so relayed lines are never echoed back.
    pub bridge_self_id: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:54001".to_string(),
            bridge_channel_id: 0,
            bridge_self_id: 0,
        }
    }
}

/// Shared server state handed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) registry: Arc<SessionRegistry>,
    pub(crate) semaphores: SemaphoreManager,
    pub(crate) guilds: GuildService,
    pub(crate) mail: MailService,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a Ravengate server.
pub struct RavengateServerBuilder {
    config: ServerConfig,
}

impl RavengateServerBuilder {
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Configures the chat-bridge channel and self id.
    pub fn bridge_channel(mut self, channel_id: u64, self_id: u64) -> Self {
        self.config.bridge_channel_id = channel_id;
        self.config.bridge_self_id = self_id;
        self
    }

    /// Binds the listener and wires the services around the given pool.
    pub async fn build(
        self,
        pool: SqlitePool,
    ) -> Result<RavengateServer, RavengateError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        let state = Arc::new(ServerState {
            registry: Arc::new(SessionRegistry::new()),
            semaphores: SemaphoreManager::new(),
            guilds: GuildService::new(pool.clone()),
            mail: MailService::new(pool),
            config: self.config,
        });
        Ok(RavengateServer { listener, state })
    }
}

impl Default for RavengateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Ravengate channel server.
pub struct RavengateServer {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl RavengateServer {
    pub fn builder() -> RavengateServerBuilder {
        RavengateServerBuilder::new()
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// A handle the external chat integration feeds events into.
    pub fn bridge(&self) -> ChatBridge {
        ChatBridge::new(
            Arc::clone(&self.state.registry),
            self.state.config.bridge_channel_id,
            self.state.config.bridge_self_id,
        )
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), RavengateError> {
        tracing::info!(
            addr = %self.listener.local_addr()?,
            "ravengate server running"
        );
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, state).await
                        {
                            tracing::debug!(
                                %peer,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
