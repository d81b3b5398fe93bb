//! 行情订阅示例

use std::time::Duration;
use tdx_hq::*;

#[tokio::main]
async fn main() {
    env_logger::init();

    let handle = subscribe(
        HqConfig::default(),
        Subscription::SecurityQuotes(vec!["000001.SZ".to_string(), "600519.SH".to_string()]),
        Duration::from_secs(3),
        |event| match event {
            SubscriptionEvent::SecurityQuotes(quotes) => {
                for quote in &quotes {
                    println!("{:?}", quote);
                }
            }
            SubscriptionEvent::Error(e) => eprintln!("轮询失败: {}", e),
            other => println!("{:?}", other),
        },
    );

    // 订阅30秒后停止
    tokio::time::sleep(Duration::from_secs(30)).await;
    handle.stop();
    println!("订阅已停止");
}
