//! Redis-backed quote cache.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::info;
use trading_core::error::DataError;
use trading_core::traits::QuoteCache;
use trading_core::types::Quote;

/// Prefix of the per-symbol cache keys.
pub const KEY_PREFIX: &str = "marketdata:";

/// Quote cache reading JSON records from `marketdata:{symbol}`.
///
/// The connection is re-established after a drop: the read that observes
/// the failure errors, later reads go to the new connection.
pub struct RedisQuoteCache {
    conn: ConnectionManager,
    name: String,
}

impl RedisQuoteCache {
    /// Connect and ping the server.
    ///
    /// `timeout` bounds the whole handshake; reads made later have no timeout.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, DataError> {
        let client =
            redis::Client::open(url).map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let handshake = async {
            let mut conn = ConnectionManager::new(client).await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };

        let conn = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| DataError::ConnectionError(format!("timed out connecting to {}", url)))?
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        info!(url, "Connected to Redis");
        Ok(Self {
            conn,
            name: format!("redis-{}", url),
        })
    }

    /// Cache key for a symbol.
    pub fn key(symbol: &str) -> String {
        format!("{}{}", KEY_PREFIX, symbol)
    }
}

#[async_trait]
impl QuoteCache for RedisQuoteCache {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError> {
        let key = Self::key(symbol);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| DataError::CacheError(e.to_string()))?;

        match raw {
            Some(raw) => Quote::from_json(symbol, &raw)
                .map(Some)
                .map_err(|e| DataError::ParseError(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::tcp::OwnedReadHalf;
    use tokio::net::{TcpListener, TcpStream};

    const CACHED: &str = r#"{"bid": 150.0, "ask": 150.1, "last": 150.05, "volume": 5000}"#;

    async fn read_command(reader: &mut BufReader<OwnedReadHalf>) -> Option<Vec<String>> {
        let mut line = String::new();
        if reader.read_line(&mut line).await.ok()? == 0 {
            return None;
        }
        let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            // Bulk length line, then the argument itself
            line.clear();
            reader.read_line(&mut line).await.ok()?;
            line.clear();
            reader.read_line(&mut line).await.ok()?;
            args.push(line.trim_end().to_string());
        }
        Some(args)
    }

    /// Minimal RESP server: PING, GET (always the cached quote), +OK for
    /// anything else. Hangs up after `max_gets` GETs when set.
    async fn serve(socket: TcpStream, max_gets: Option<usize>) {
        let (read, mut write) = socket.into_split();
        let mut reader = BufReader::new(read);
        let mut gets = 0;

        while let Some(command) = read_command(&mut reader).await {
            let name = command.first().map(|c| c.to_ascii_uppercase());
            let reply = match name.as_deref() {
                Some("PING") => "+PONG\r\n".to_string(),
                Some("GET") => {
                    gets += 1;
                    format!("${}\r\n{}\r\n", CACHED.len(), CACHED)
                }
                _ => "+OK\r\n".to_string(),
            };
            if write.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
            if max_gets == Some(gets) {
                return;
            }
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(RedisQuoteCache::key("AAPL"), "marketdata:AAPL");
    }

    #[tokio::test]
    async fn test_invalid_url_is_connection_error() {
        let result = RedisQuoteCache::connect("not a url", Duration::from_millis(200)).await;
        assert!(matches!(result, Err(DataError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let result =
            RedisQuoteCache::connect("redis://127.0.0.1:1/", Duration::from_millis(500)).await;
        assert!(matches!(result, Err(DataError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_reads_recover_after_connection_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("redis://{}/", listener.local_addr().unwrap());

        // First connection hangs up after one GET, later ones stay up
        tokio::spawn(async move {
            let mut first = true;
            while let Ok((socket, _)) = listener.accept().await {
                let max_gets = if first { Some(1) } else { None };
                first = false;
                tokio::spawn(serve(socket, max_gets));
            }
        });

        let cache = RedisQuoteCache::connect(&url, Duration::from_secs(2)).await.unwrap();
        let quote = cache.get_quote("AAPL").await.unwrap().unwrap();
        assert_eq!(quote.symbol, "AAPL");

        let mut recovered = None;
        for _ in 0..50 {
            if let Ok(Some(quote)) = cache.get_quote("MSFT").await {
                recovered = Some(quote);
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let quote = recovered.expect("cache reads never recovered");
        assert_eq!(quote.symbol, "MSFT");
        assert!((quote.last - 150.05).abs() < 1e-10);
    }
}
