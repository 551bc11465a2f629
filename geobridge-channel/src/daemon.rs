use geobridge_core::{CallRouter, LocationBridge, LocationSample, SubscriptionConfig, UpdateSink};
use geobridge_sim::{SimConfig, SimulatedLocation};
use geobridge_wire::*;
use log::{error, info, warn};
use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    sync::mpsc,
};

use interprocess::local_socket::{ListenerOptions, tokio::prelude::*};

/// Pushes updates onto the connection's outgoing queue without blocking the
/// bridge's forwarding task
#[derive(Clone)]
struct ChannelSink(mpsc::Sender<WireEvent>);

impl UpdateSink for ChannelSink {
    fn send_update(&self, fix: Option<LocationSample>) {
        let tx = self.0.clone();
        tokio::spawn(async move {
            if tx.send(WireEvent::Update(fix)).await.is_err() {
                warn!("Dropped a location update, connection queue closed");
            }
        });
    }
}

async fn write_event(stream: &mut (impl AsyncWrite + Unpin), event: &WireEvent) -> Result {
    let mut encoded = serde_json::to_vec(event).context("Failed to encode event")?;
    encoded.push(b'\n');
    stream
        .write_all(&encoded)
        .await
        .context("Failed to send event")
}

const CLI_MSG: &str = "Usage: geobridge-daemon SOCKET_NAME";

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result {
    colog::init();

    let args = std::env::args().collect::<Vec<_>>();
    let raw_socket_name = args.get(1).cloned().expect(CLI_MSG);
    let socket_name = get_socket_name(raw_socket_name)?;
    let opts = ListenerOptions::new().name(socket_name);
    let listener = opts.create_tokio().context("Failed to bind to socket")?;

    let (event_tx, mut event_rx) = mpsc::channel::<WireEvent>(40);

    let service = SimulatedLocation::new(SimConfig::default());
    let bridge = LocationBridge::new(service, SubscriptionConfig::default());
    let router = CallRouter::new(bridge, ChannelSink(event_tx.clone()));

    info!("Location daemon ready");

    'server: loop {
        let res = tokio::select! {
            res = listener.accept() => {
                res
            },
            Ok(_) = tokio::signal::ctrl_c() => {
                break 'server;
            }
        };

        match res {
            Ok(stream) => {
                let mut recv = BufReader::new(&stream);
                let mut send = &stream;

                let mut buffer = String::with_capacity(256);

                loop {
                    tokio::select! {
                        Ok(_) = tokio::signal::ctrl_c() => {
                            break 'server;
                        }
                        res = recv.read_line(&mut buffer) => {
                            match res {
                                Ok(0) => {
                                    break;
                                }
                                Ok(_amnt) => {
                                    let event = match serde_json::from_str::<WireRequest>(buffer.trim_end()) {
                                        Ok(request) => {
                                            router.dispatch(&request.method).await.into()
                                        }
                                        Err(why) => {
                                            warn!("Bad request line: {why}");
                                            WireEvent::Error(format!("Bad request: {why}"))
                                        }
                                    };
                                    buffer.clear();
                                    if let Err(why) = write_event(&mut send, &event).await {
                                        error!("Write error: {why:?}");
                                        break;
                                    }
                                }
                                Err(why) => {
                                    error!("Read error: {why:?}");
                                }
                            }
                        }
                        Some(event) = event_rx.recv() => {
                            if let Err(why) = write_event(&mut send, &event).await {
                                error!("Write error: {why:?}");
                                break;
                            }
                        }
                    }
                }

                // A registration left armed would keep feeding a dead connection
                router.bridge().stop_updates().await;
            }
            Err(why) => error!("Error from connection: {why:?}"),
        }
    }

    Ok(())
}
