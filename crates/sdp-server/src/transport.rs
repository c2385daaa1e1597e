//! MQTT transport bridge
//!
//! Connects to the broker, keeps the subscription alive across reconnects,
//! and forwards every publish to the [`MessageIngestor`]. The bridge knows
//! nothing about the pipeline beyond the ingestor callback; topic strings and
//! payload bytes pass through untouched.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::TransportConfig;
use crate::ingest::MessageIngestor;

/// Wait before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// MQTT subscription feeding the ingestor.
pub struct MqttSource {
    client: AsyncClient,
    eventloop: EventLoop,
    topic_filter: String,
}

impl MqttSource {
    /// Build the client and event loop. The connection itself is established
    /// lazily on the first poll.
    pub fn connect(config: &TransportConfig) -> Self {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        let (client, eventloop) = AsyncClient::new(options, 64);

        Self {
            client,
            eventloop,
            topic_filter: config.topic_filter.clone(),
        }
    }

    /// Drive the event loop in a background task, dispatching each publish
    /// to `ingestor`.
    ///
    /// The subscription is (re)issued on every ConnAck so it survives broker
    /// reconnects. Connection errors are logged and retried after
    /// [`RECONNECT_DELAY`]; the task only ends when aborted by the caller.
    pub fn spawn(self, ingestor: MessageIngestor) -> JoinHandle<()> {
        let MqttSource {
            client,
            mut eventloop,
            topic_filter,
        } = self;

        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!(topic = %topic_filter, "connected to broker, subscribing");
                        if let Err(error) =
                            client.subscribe(&topic_filter, QoS::AtMostOnce).await
                        {
                            error!(%error, topic = %topic_filter, "subscribe failed");
                        }
                    },
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        debug!(topic = %publish.topic, bytes = publish.payload.len(), "message received");
                        ingestor.handle_message(&publish.topic, &publish.payload);
                    },
                    Ok(_) => {},
                    Err(error) => {
                        warn!(%error, "broker connection error, retrying");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    },
                }
            }
        })
    }
}
