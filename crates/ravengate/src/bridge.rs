//! Chat bridge: relays lines from an external chat channel to every
//! connected session.
//!
//! The integration that talks to the external service lives outside this
//! crate; it feeds [`BridgeEvent`]s into a [`ChatBridge`] handle. The
//! bridge filters out its own echoes and foreign channels, then formats
//! and broadcasts the rest as in-game chat.

use std::sync::Arc;

use ravengate_protocol::binpacket::{binary_message_type, ChatMessage};
use ravengate_protocol::packets::MsgSysCastedBinary;
use ravengate_protocol::{FrameWriter, Message};
use ravengate_session::SessionRegistry;

use crate::RavengateError;

/// One message observed on the external chat service.
#[derive(Debug, Clone)]
pub struct BridgeEvent {
    pub author_id: u64,
    pub author_name: String,
    pub channel_id: u64,
    pub text: String,
}

/// Handle the external chat integration pushes events through.
#[derive(Clone)]
pub struct ChatBridge {
    registry: Arc<SessionRegistry>,
    channel_id: u64,
    self_id: u64,
}

impl ChatBridge {
    pub(crate) fn new(
        registry: Arc<SessionRegistry>,
        channel_id: u64,
        self_id: u64,
    ) -> Self {
        Self {
            registry,
            channel_id,
            self_id,
        }
    }

    /// Relays one event. Returns how many sessions it was delivered to;
    /// zero for filtered events.
    ///
    /// # Errors
    /// [`RavengateError::Protocol`] if the formatted line cannot be
    /// transcoded for the wire.
    pub async fn handle_event(
        &self,
        event: &BridgeEvent,
    ) -> Result<usize, RavengateError> {
        if event.author_id == self.self_id {
            return Ok(0);
        }
        if event.channel_id != self.channel_id {
            tracing::debug!(
                channel_id = event.channel_id,
                "bridge event from foreign channel dropped"
            );
            return Ok(0);
        }

        let line = format!("{}: {}", event.author_name, event.text);
        let mut w = FrameWriter::new();
        ChatMessage { kind: 0, text: line }.build(&mut w)?;

        let message = Message::SysCastedBinary(MsgSysCastedBinary {
            char_id: 0,
            broadcast_type: 0x00,
            message_type: binary_message_type::CHAT,
            payload: w.into_vec(),
        });
        let delivered = self.registry.broadcast(&message).await;
        tracing::debug!(
            author = event.author_name.as_str(),
            delivered,
            "bridge line relayed"
        );
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ravengate_session::Session;

    fn event(author_id: u64, channel_id: u64, text: &str) -> BridgeEvent {
        BridgeEvent {
            author_id,
            author_name: "Ann".into(),
            channel_id,
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn test_relays_to_all_sessions() {
        let registry = Arc::new(SessionRegistry::new());
        let (a, mut rx_a) = Session::new(1, "Rin".into());
        let (b, mut rx_b) = Session::new(2, "Kai".into());
        registry.insert(a.link()).await;
        registry.insert(b.link()).await;

        let bridge = ChatBridge::new(Arc::clone(&registry), 500, 99);
        let delivered =
            bridge.handle_event(&event(7, 500, "hello")).await.unwrap();

        assert_eq!(delivered, 2);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_ignores_own_echo_and_foreign_channels() {
        let registry = Arc::new(SessionRegistry::new());
        let (a, mut rx) = Session::new(1, "Rin".into());
        registry.insert(a.link()).await;

        let bridge = ChatBridge::new(Arc::clone(&registry), 500, 99);

        // Self-authored.
        assert_eq!(
            bridge.handle_event(&event(99, 500, "echo")).await.unwrap(),
            0
        );
        // Wrong channel.
        assert_eq!(
            bridge.handle_event(&event(7, 501, "psst")).await.unwrap(),
            0
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_untranscodable_line_is_an_error() {
        let registry = Arc::new(SessionRegistry::new());
        let bridge = ChatBridge::new(registry, 500, 99);

        let result = bridge.handle_event(&event(7, 500, "🦀")).await;
        assert!(matches!(result, Err(RavengateError::Protocol(_))));
    }
}
