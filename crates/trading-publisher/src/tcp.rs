//! TCP message bus writing newline-delimited JSON records.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{info, warn};
use trading_core::error::PublishError;
use trading_core::traits::{BusRecord, MessageBus};

/// Message bus over a single TCP connection.
///
/// Every record is written as one JSON line: `{"topic", "key", "payload"}`.
/// A failed write drops the connection; the next send dials again.
#[derive(Debug)]
pub struct TcpMessageBus {
    stream: Option<BufWriter<TcpStream>>,
    endpoint: String,
    timeout: Duration,
    closed: bool,
    name: String,
}

impl TcpMessageBus {
    /// Connect to `host:port`.
    ///
    /// `timeout` bounds connecting only; writes have no timeout.
    pub async fn connect(endpoint: &str, timeout: Duration) -> Result<Self, PublishError> {
        let stream = dial(endpoint, timeout).await?;
        info!(endpoint, "Connected to message bus");
        Ok(Self {
            stream: Some(stream),
            endpoint: endpoint.to_string(),
            timeout,
            closed: false,
            name: format!("tcp-{}", endpoint),
        })
    }

    async fn stream(&mut self) -> Result<&mut BufWriter<TcpStream>, PublishError> {
        if self.closed {
            return Err(PublishError::NotConnected(self.name.clone()));
        }
        if self.stream.is_none() {
            let stream = dial(&self.endpoint, self.timeout).await?;
            info!(endpoint = %self.endpoint, "Reconnected to message bus");
            self.stream = Some(stream);
        }
        self.stream
            .as_mut()
            .ok_or_else(|| PublishError::NotConnected(self.name.clone()))
    }

    fn drop_connection(&mut self, error: &std::io::Error) {
        warn!(endpoint = %self.endpoint, error = %error, "Message bus connection lost");
        self.stream = None;
    }
}

async fn dial(endpoint: &str, timeout: Duration) -> Result<BufWriter<TcpStream>, PublishError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(endpoint))
        .await
        .map_err(|_| PublishError::Connection(format!("timed out connecting to {}", endpoint)))?
        .map_err(|e| PublishError::Connection(format!("{}: {}", endpoint, e)))?;
    stream.set_nodelay(true)?;
    Ok(BufWriter::new(stream))
}

#[async_trait]
impl MessageBus for TcpMessageBus {
    async fn send(&mut self, record: BusRecord) -> Result<(), PublishError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        let result = self.stream().await?.write_all(&line).await;
        if let Err(e) = &result {
            self.drop_connection(e);
        }
        Ok(result?)
    }

    async fn flush(&mut self) -> Result<(), PublishError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(PublishError::NotConnected(self.name.clone()));
        };
        let result = stream.flush().await;
        if let Err(e) = &result {
            self.drop_connection(e);
        }
        Ok(result?)
    }

    async fn close(&mut self) -> Result<(), PublishError> {
        self.closed = true;
        if let Some(mut stream) = self.stream.take() {
            stream.flush().await?;
            stream.shutdown().await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_records_arrive_as_json_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let reader = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(socket).lines();
            let mut received = Vec::new();
            while let Some(line) = lines.next_line().await.unwrap() {
                received.push(serde_json::from_str::<Value>(&line).unwrap());
            }
            received
        });

        let mut bus = TcpMessageBus::connect(&addr, Duration::from_secs(1))
            .await
            .unwrap();
        for symbol in ["AAPL", "MSFT"] {
            let record = BusRecord {
                topic: "strategy-signals".into(),
                key: Some(symbol.into()),
                payload: json!({ "symbol": symbol, "signal": "BUY" }),
            };
            bus.send(record).await.unwrap();
        }
        bus.flush().await.unwrap();
        bus.close().await.unwrap();

        let received = reader.await.unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0]["topic"], "strategy-signals");
        assert_eq!(received[0]["key"], "AAPL");
        assert_eq!(received[1]["payload"]["symbol"], "MSFT");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to obtain a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let result = TcpMessageBus::connect(&addr, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(PublishError::Connection(_))));
    }

    #[tokio::test]
    async fn test_send_redials_after_lost_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let reader = tokio::spawn(async move {
            // First connection is abandoned, the second carries the record
            let (first, _) = listener.accept().await.unwrap();
            drop(first);
            let (second, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(second).lines();
            lines.next_line().await.unwrap()
        });

        let mut bus = TcpMessageBus::connect(&addr, Duration::from_secs(1))
            .await
            .unwrap();
        bus.stream = None;

        let record = BusRecord {
            topic: "strategy-signals".into(),
            key: Some("AAPL".into()),
            payload: json!({ "symbol": "AAPL" }),
        };
        bus.send(record).await.unwrap();
        bus.flush().await.unwrap();

        let line = reader.await.unwrap().expect("record line");
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["key"], "AAPL");
        bus.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_send_after_close_is_not_connected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let accept = tokio::spawn(async move { listener.accept().await.map(|(socket, _)| socket) });

        let mut bus = TcpMessageBus::connect(&addr, Duration::from_secs(1))
            .await
            .unwrap();
        let _peer = accept.await.unwrap().unwrap();
        bus.close().await.unwrap();

        let record = BusRecord {
            topic: "strategy-signals".into(),
            key: None,
            payload: json!({}),
        };
        assert!(matches!(
            bus.send(record).await,
            Err(PublishError::NotConnected(_))
        ));
        // Closing twice is a no-op
        assert!(bus.close().await.is_ok());
    }
}
