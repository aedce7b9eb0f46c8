use crate::chat::{ChatCommand, HELP_TEXT, parse_command};
use crate::error::RelayError;
use crate::registry::Registry;
use crate::transport::EventSink;
use beacon_core::{ChatScope, ServerEvent, SessionId};
use tracing::{debug, warn};

/// Outcome of one routed chat message. Failures are per recipient and
/// never abort the rest of the fan-out.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    pub scope: ChatScope,
    pub delivered: usize,
    /// Usernames whose transport write failed.
    pub failed: Vec<String>,
}

impl DeliveryResult {
    fn empty(scope: ChatScope) -> Self {
        Self {
            scope,
            delivered: 0,
            failed: Vec::new(),
        }
    }
}

/// Parses the chat grammar, computes the fan-out set and delivers.
/// Stateless; all session truth comes from the registry.
pub struct ChatRouter;

impl ChatRouter {
    pub fn new() -> Self {
        Self
    }

    pub async fn route(
        &self,
        registry: &Registry,
        sink: &dyn EventSink,
        from: SessionId,
        frame_scope: Option<ChatScope>,
        frame_target: Option<String>,
        body: String,
    ) -> DeliveryResult {
        let Some(sender) = registry.lookup_by_id(from) else {
            // Only reachable if a frame races its own disconnect.
            warn!(%from, "chat from unknown session dropped");
            return DeliveryResult::empty(ChatScope::Room);
        };
        let sender_name = sender.username.clone();
        let sender_room = sender.room.clone();

        match parse_command(&body) {
            ChatCommand::Help => {
                let event = ServerEvent::ChatMessage {
                    from: "server".into(),
                    scope: ChatScope::Private,
                    body: HELP_TEXT.into(),
                };
                let _ = sink.deliver(from, event).await;
                DeliveryResult {
                    scope: ChatScope::Private,
                    delivered: 1,
                    failed: Vec::new(),
                }
            }
            ChatCommand::Invalid(detail) => {
                let _ = sink
                    .deliver(from, RelayError::ProtocolViolation(detail).to_event())
                    .await;
                DeliveryResult::empty(ChatScope::Room)
            }
            ChatCommand::Private { to, text } => {
                self.route_private(registry, sink, from, &sender_name, &to, text)
                    .await
            }
            ChatCommand::Global { text } => {
                let recipients: Vec<SessionId> = registry
                    .all_sessions()
                    .map(|s| s.id)
                    .filter(|id| *id != from)
                    .collect();
                self.fan_out(
                    registry,
                    sink,
                    from,
                    &sender_name,
                    ChatScope::Global,
                    recipients,
                    text,
                )
                .await
            }
            ChatCommand::Plain(text) => match frame_scope.unwrap_or(ChatScope::Room) {
                ChatScope::Private => {
                    let Some(target) = frame_target else {
                        let err = RelayError::ProtocolViolation(
                            "private chat needs a target username".into(),
                        );
                        let _ = sink.deliver(from, err.to_event()).await;
                        return DeliveryResult::empty(ChatScope::Private);
                    };
                    self.route_private(registry, sink, from, &sender_name, &target, text)
                        .await
                }
                ChatScope::Global => {
                    let recipients: Vec<SessionId> = registry
                        .all_sessions()
                        .map(|s| s.id)
                        .filter(|id| *id != from)
                        .collect();
                    self.fan_out(
                        registry,
                        sink,
                        from,
                        &sender_name,
                        ChatScope::Global,
                        recipients,
                        text,
                    )
                    .await
                }
                ChatScope::Room => {
                    let recipients: Vec<SessionId> = registry
                        .room_members(&sender_room)
                        .into_iter()
                        .filter(|id| *id != from)
                        .collect();
                    self.fan_out(
                        registry,
                        sink,
                        from,
                        &sender_name,
                        ChatScope::Room,
                        recipients,
                        text,
                    )
                    .await
                }
            },
        }
    }

    /// Exactly one recipient plus a receipt to the sender. An unknown
    /// target is reported to the sender only; the named user never
    /// learns of the attempt.
    async fn route_private(
        &self,
        registry: &Registry,
        sink: &dyn EventSink,
        from: SessionId,
        sender_name: &str,
        target: &str,
        text: String,
    ) -> DeliveryResult {
        let Some(recipient) = registry.lookup_by_username(target) else {
            let err = RelayError::UnknownRecipient(target.to_string());
            let _ = sink.deliver(from, err.to_event()).await;
            return DeliveryResult::empty(ChatScope::Private);
        };

        let event = ServerEvent::ChatMessage {
            from: sender_name.to_string(),
            scope: ChatScope::Private,
            body: text,
        };
        let result = match sink.deliver(recipient.id, event).await {
            Ok(()) => DeliveryResult {
                scope: ChatScope::Private,
                delivered: 1,
                failed: Vec::new(),
            },
            Err(e) => {
                warn!(to = target, "private delivery failed: {e}");
                DeliveryResult {
                    scope: ChatScope::Private,
                    delivered: 0,
                    failed: vec![target.to_string()],
                }
            }
        };

        let receipt = ServerEvent::ChatReceipt {
            scope: ChatScope::Private,
            delivered: result.delivered,
            failed: result.failed.clone(),
        };
        let _ = sink.deliver(from, receipt).await;
        result
    }

    /// Best-effort broadcast. The sender is excluded (its client
    /// already rendered the message locally) and only hears back when
    /// some recipient failed.
    async fn fan_out(
        &self,
        registry: &Registry,
        sink: &dyn EventSink,
        from: SessionId,
        sender_name: &str,
        scope: ChatScope,
        recipients: Vec<SessionId>,
        text: String,
    ) -> DeliveryResult {
        let mut result = DeliveryResult::empty(scope);
        for recipient in recipients {
            let event = ServerEvent::ChatMessage {
                from: sender_name.to_string(),
                scope,
                body: text.clone(),
            };
            match sink.deliver(recipient, event).await {
                Ok(()) => result.delivered += 1,
                Err(e) => {
                    let name = registry
                        .lookup_by_id(recipient)
                        .map(|s| s.username.clone())
                        .unwrap_or_else(|| recipient.to_string());
                    warn!(to = %recipient, "broadcast delivery failed: {e}");
                    result.failed.push(name);
                }
            }
        }
        debug!(
            ?scope,
            delivered = result.delivered,
            failed = result.failed.len(),
            "chat fan-out"
        );

        if !result.failed.is_empty() {
            let receipt = ServerEvent::ChatReceipt {
                scope,
                delivered: result.delivered,
                failed: result.failed.clone(),
            };
            let _ = sink.deliver(from, receipt).await;
        }
        result
    }
}

impl Default for ChatRouter {
    fn default() -> Self {
        Self::new()
    }
}
