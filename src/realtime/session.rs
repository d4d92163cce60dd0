use actix_ws::Message;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::realtime::hub::RealtimeHub;
use crate::realtime::protocol::ContractEvent;

/// Drives one realtime WebSocket: forwards hub events to the client, answers
/// pings, and unsubscribes on disconnect. Clients only listen; their text
/// frames are ignored.
pub async fn run_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<ContractEvent>,
    subscription_id: Uuid,
    hub: Arc<RealtimeHub>,
) {
    loop {
        tokio::select! {
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
            Some(event) = rx.recv() => {
                tracing::trace!(contract_id = %event.contract_id(), "Forwarding realtime event");
                let json = match serde_json::to_string(&event) {
                    Ok(j) => j,
                    Err(e) => {
                        tracing::warn!("Failed to serialize realtime event: {e}");
                        continue;
                    }
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            else => break,
        }
    }

    hub.unsubscribe(subscription_id).await;
    let _ = session.close(None).await;
}
