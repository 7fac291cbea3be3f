//! Live market data producer
//!
//! A single background task that owns the websocket subscription and pushes
//! every decoded message onto the shared queue. Enqueue is its only write
//! surface; it never touches snapshot or ledger state.

use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{error, info, warn};

use crate::market::simulated;
use crate::market::types::{Bar, MarketMessage, Quote, Trade};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

pub struct StreamConfig {
    pub stream_url: String,
    pub api_key: String,
    pub secret_key: String,
    pub symbols: Vec<String>,
}

/// Spawn the producer task.
///
/// The task runs until `shutdown` changes (or its sender drops), then
/// releases its subscription and exits. Each iteration selects between the
/// next socket message and cancellation, so a shutdown is observed
/// immediately rather than on a polling interval.
///
/// If the connection or subscription fails at startup, the producer emits
/// one synthetic bar per symbol so downstream logic is never starved, then
/// exits.
pub fn spawn_producer(
    config: StreamConfig,
    queue: mpsc::UnboundedSender<MarketMessage>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Connecting to market data stream: {}", config.stream_url);

        let ws_stream = match connect_async(config.stream_url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                warn!("Stream connect failed ({}); falling back to synthetic bars", e);
                emit_synthetic_bars(&config.symbols, &queue);
                return;
            }
        };

        let (mut write, mut read) = ws_stream.split();

        if let Err(e) = authenticate(&mut write, &config.api_key, &config.secret_key).await {
            warn!("Stream auth failed ({}); falling back to synthetic bars", e);
            emit_synthetic_bars(&config.symbols, &queue);
            return;
        }

        if let Err(e) = subscribe(&mut write, &config.symbols).await {
            warn!("Stream subscribe failed ({}); falling back to synthetic bars", e);
            emit_synthetic_bars(&config.symbols, &queue);
            return;
        }
        info!("Subscribed to bars/quotes/trades for: {:?}", config.symbols);

        loop {
            tokio::select! {
                // Cancellation: any change (or sender drop) means stop.
                _ = shutdown.changed() => {
                    info!("Shutdown observed, releasing stream subscriptions");
                    release(&mut write, &config.symbols).await;
                    break;
                }
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        for message in decode_messages(&text) {
                            if queue.send(message).is_err() {
                                // Consumer gone; nothing left to feed.
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(ping))) => {
                        write.send(Message::Pong(ping)).await.ok();
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Market stream closed by server");
                        break;
                    }
                    Some(Err(e)) => {
                        error!("Market stream error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    })
}

fn emit_synthetic_bars(symbols: &[String], queue: &mpsc::UnboundedSender<MarketMessage>) {
    for symbol in symbols {
        let _ = queue.send(MarketMessage::Bar(simulated::current_bar(symbol)));
    }
}

async fn authenticate(
    write: &mut WsWriter,
    key: &str,
    secret: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let auth_msg = json!({
        "action": "auth",
        "key": key,
        "secret": secret
    });
    write.send(Message::Text(auth_msg.to_string())).await?;
    Ok(())
}

async fn subscribe(
    write: &mut WsWriter,
    symbols: &[String],
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let sub_msg = json!({
        "action": "subscribe",
        "bars": symbols,
        "quotes": symbols,
        "trades": symbols
    });
    write.send(Message::Text(sub_msg.to_string())).await?;
    Ok(())
}

/// Best-effort unsubscribe and close on the way out.
async fn release(write: &mut WsWriter, symbols: &[String]) {
    let unsub = json!({
        "action": "unsubscribe",
        "bars": symbols,
        "quotes": symbols,
        "trades": symbols
    });
    write.send(Message::Text(unsub.to_string())).await.ok();
    write.close().await.ok();
}

/// Decode one websocket frame into typed messages. Frames carry an array of
/// records tagged by "T": "b" bar, "q" quote, "t" trade; control records
/// are logged and dropped.
pub fn decode_messages(text: &str) -> Vec<MarketMessage> {
    let mut messages = Vec::new();

    let val: Value = match serde_json::from_str(text) {
        Ok(val) => val,
        Err(_) => {
            warn!("Failed to parse stream message: {}", text);
            return messages;
        }
    };

    let Some(arr) = val.as_array() else {
        return messages;
    };

    for item in arr {
        let Some(tag) = item.get("T").and_then(|v| v.as_str()) else {
            continue;
        };
        match tag {
            "b" => {
                if let Some(symbol) = item.get("S").and_then(|v| v.as_str()) {
                    messages.push(MarketMessage::Bar(Bar {
                        symbol: symbol.to_string(),
                        open: item.get("o").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        high: item.get("h").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        low: item.get("l").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        close: item.get("c").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        volume: item.get("v").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        timestamp: item.get("t").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                    }));
                }
            }
            "q" => {
                if let Some(symbol) = item.get("S").and_then(|v| v.as_str()) {
                    messages.push(MarketMessage::Quote(Quote {
                        symbol: symbol.to_string(),
                        bid_price: item.get("bp").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        ask_price: item.get("ap").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        bid_size: item.get("bs").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        ask_size: item.get("as").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        timestamp: item.get("t").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                    }));
                }
            }
            "t" => {
                if let Some(symbol) = item.get("S").and_then(|v| v.as_str()) {
                    messages.push(MarketMessage::Trade(Trade {
                        symbol: symbol.to_string(),
                        price: item.get("p").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        size: item.get("s").and_then(|v| v.as_f64()).unwrap_or(0.0),
                        timestamp: item.get("t").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                    }));
                }
            }
            "success" => info!("Stream: {:?}", item.get("msg")),
            "subscription" => info!("Stream subscription confirmed: {:?}", item),
            "error" => error!("Stream error message: {:?}", item),
            _ => {}
        }
    }

    messages
}
