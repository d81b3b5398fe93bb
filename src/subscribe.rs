//! 行情订阅
//!
//! 订阅目标是封闭枚举，回调收到的事件与之一一对应。每个订阅由独立的
//! 工作任务轮询网关（持有自己的连接），事件经通道交给转发任务调用
//! 回调，网关抖动以错误事件上报而不中止订阅。

use crate::{
    client::{ClientError, HqClient},
    config::HqConfig,
    protocol::{
        constants::Market,
        types::{MinuteTime, Quote, Transaction},
    },
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 订阅目标
#[derive(Debug, Clone)]
pub enum Subscription {
    /// 五档行情，最多同时订阅若干只证券
    SecurityQuotes(Vec<String>),
    /// 当日分时数据
    MinuteTimeData(String),
    /// 当日分时成交
    TransactionData {
        symbol: String,
        start: u16,
        count: u16,
    },
    /// 证券数量
    SecurityCount(Market),
}

/// 订阅事件
#[derive(Debug)]
pub enum SubscriptionEvent {
    SecurityQuotes(Vec<Quote>),
    MinuteTimeData(Vec<MinuteTime>),
    TransactionData(Vec<Transaction>),
    SecurityCount(u16),
    /// 单次轮询失败（订阅继续）
    Error(ClientError),
}

/// 订阅句柄，停止后工作任务与转发任务都会退出
pub struct SubscriptionHandle {
    worker: JoinHandle<()>,
    forwarder: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn stop(&self) {
        self.worker.abort();
        self.forwarder.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }
}

/// 启动订阅
///
/// 工作任务使用独立的连接轮询，`interval` 为轮询间隔。连接建立失败
/// 会上报一次错误事件后结束订阅。
pub fn subscribe(
    config: HqConfig,
    subscription: Subscription,
    interval: Duration,
    mut callback: impl FnMut(SubscriptionEvent) + Send + 'static,
) -> SubscriptionHandle {
    let (tx, mut rx) = mpsc::channel::<SubscriptionEvent>(64);

    let worker = tokio::spawn(async move {
        let client = match HqClient::connect(config).await {
            Ok(client) => client,
            Err(e) => {
                let _ = tx.send(SubscriptionEvent::Error(e)).await;
                return;
            }
        };

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let event = poll_once(&client, &subscription).await;
            if tx.send(event).await.is_err() {
                // 接收端已停止
                break;
            }
        }
    });

    let forwarder = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            callback(event);
        }
    });

    SubscriptionHandle { worker, forwarder }
}

async fn poll_once(client: &HqClient, subscription: &Subscription) -> SubscriptionEvent {
    match subscription {
        Subscription::SecurityQuotes(symbols) => {
            let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
            match client.get_security_quotes(&refs).await {
                Ok(quotes) => SubscriptionEvent::SecurityQuotes(quotes),
                Err(e) => SubscriptionEvent::Error(e),
            }
        }
        Subscription::MinuteTimeData(symbol) => match client.get_minute_time_data(symbol).await {
            Ok(data) => SubscriptionEvent::MinuteTimeData(data),
            Err(e) => SubscriptionEvent::Error(e),
        },
        Subscription::TransactionData {
            symbol,
            start,
            count,
        } => match client.get_transaction_data(symbol, *start, *count).await {
            Ok(data) => SubscriptionEvent::TransactionData(data),
            Err(e) => SubscriptionEvent::Error(e),
        },
        Subscription::SecurityCount(market) => match client.get_security_count(*market).await {
            Ok(count) => SubscriptionEvent::SecurityCount(count),
            Err(e) => SubscriptionEvent::Error(e),
        },
    }
}
