//! 网关探测与连接

use crate::{
    client::ClientError,
    config::{GatewayHost, HqConfig},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time;

/// 探测结果
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub host: GatewayHost,
    pub latency: Duration,
}

/// 并发探测多个网关的连接延迟，按延迟升序返回可达的网关
///
/// 每个网关在 `timeout` 内未建立 TCP 连接视为不可达。
pub async fn probe(hosts: &[GatewayHost], timeout: Duration) -> Vec<ProbeResult> {
    let mut handles = Vec::with_capacity(hosts.len());

    for host in hosts {
        let host = host.clone();
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            match time::timeout(timeout, TcpStream::connect(host.addr())).await {
                Ok(Ok(_)) => Some(ProbeResult {
                    host,
                    latency: start.elapsed(),
                }),
                _ => None,
            }
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        if let Ok(Some(result)) = handle.await {
            results.push(result);
        }
    }

    results.sort_by(|a, b| a.latency.cmp(&b.latency));
    results
}

/// 探测并返回延迟最低的网关；全部不可达时报错
pub async fn fastest_host(config: &HqConfig) -> Result<GatewayHost, ClientError> {
    let results = probe(&config.hosts, config.connect_timeout).await;
    results
        .into_iter()
        .next()
        .map(|r| r.host)
        .ok_or(ClientError::NoGatewayAvailable)
}

/// 随机选择一个网关
pub fn random_host(config: &HqConfig) -> Result<GatewayHost, ClientError> {
    let mut rng = StdRng::from_entropy();
    config
        .hosts
        .choose(&mut rng)
        .cloned()
        .ok_or(ClientError::NoGatewayAvailable)
}

/// 带超时地建立 TCP 连接
pub async fn dial_host(host: &GatewayHost, timeout: Duration) -> Result<TcpStream, ClientError> {
    match time::timeout(timeout, TcpStream::connect(host.addr())).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(ClientError::Io(e)),
        Err(_) => Err(ClientError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn probe_finds_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let hosts = vec![
            GatewayHost::new("127.0.0.1", port),
            // 保留地址，连接必然失败
            GatewayHost::new("192.0.2.1", 7709),
        ];

        let results = probe(&hosts, Duration::from_millis(500)).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].host.port, port);
    }

    #[tokio::test]
    async fn fastest_host_fails_when_unreachable() {
        let config = HqConfig {
            hosts: vec![GatewayHost::new("192.0.2.1", 7709)],
            connect_timeout: Duration::from_millis(200),
            ..Default::default()
        };
        assert!(matches!(
            fastest_host(&config).await,
            Err(ClientError::NoGatewayAvailable)
        ));
    }

    #[tokio::test]
    async fn dial_host_connects() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let host = GatewayHost::new("127.0.0.1", port);
        assert!(dial_host(&host, Duration::from_millis(500)).await.is_ok());
    }

    #[test]
    fn random_host_requires_nonempty_list() {
        let config = HqConfig {
            hosts: Vec::new(),
            ..Default::default()
        };
        assert!(matches!(
            random_host(&config),
            Err(ClientError::NoGatewayAvailable)
        ));
    }
}
