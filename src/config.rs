//! 客户端配置
//!
//! 配置通过构造传入客户端，不使用全局状态。

use crate::protocol::constants::DEFAULT_PORT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 行情网关地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayHost {
    pub host: String,
    pub port: u16,
}

impl GatewayHost {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` 形式的连接地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HqConfig {
    /// 网关地址列表
    pub hosts: Vec<GatewayHost>,
    /// TCP 连接超时
    #[serde(with = "duration_millis")]
    pub connect_timeout: Duration,
    /// 单次请求超时
    #[serde(with = "duration_millis")]
    pub request_timeout: Duration,
    /// 心跳间隔
    #[serde(with = "duration_millis")]
    pub heartbeat_interval: Duration,
    /// 并发在途请求上限
    pub max_inflight: usize,
}

impl Default for HqConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(15),
            max_inflight: 1,
        }
    }
}

/// 默认网关地址列表
pub fn default_hosts() -> Vec<GatewayHost> {
    [
        "124.71.187.122",
        "122.51.120.217",
        "111.229.247.189",
        "124.70.176.52",
        "123.60.186.45",
        "122.51.232.182",
        "118.25.98.114",
        "124.70.199.56",
        "121.36.225.169",
        "123.60.70.228",
        "123.60.73.44",
        "124.70.133.119",
    ]
    .iter()
    .map(|h| GatewayHost::new(*h, DEFAULT_PORT))
    .collect()
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
