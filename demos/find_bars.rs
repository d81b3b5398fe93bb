//! 按日期区间查询K线示例

use tdx_hq::*;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    env_logger::init();

    let client = HqClient::connect(HqConfig::default()).await?;
    println!("已连接 {}\n", client.gateway());

    // 区间内的全部日K线
    let bars = client
        .find_bars(
            "600519.SH",
            Period::Day,
            Some("2023-01-01"),
            Some("2023-03-31"),
            0,
        )
        .await?;
    println!("2023年一季度日K线 {} 根", bars.len());
    for bar in bars.iter().take(5) {
        println!("  {:?}", bar);
    }

    // 起始日期之后最早的10根
    let bars = client
        .find_bars("600519.SH", Period::Day, Some("2023-06-01"), None, 10)
        .await?;
    println!("\n2023-06-01 起最早的 {} 根:", bars.len());
    for bar in &bars {
        println!("  {:?}", bar);
    }

    // 最新的20根周K线
    let bars = client
        .find_bars("399001.SZ", Period::Week, None, None, 20)
        .await?;
    println!("\n深证成指最新 {} 根周K线:", bars.len());
    for bar in bars.iter().rev().take(5) {
        println!("  {:?}", bar);
    }

    client.close().await;
    Ok(())
}
