//! 基本使用示例

use tdx_hq::*;

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    env_logger::init();
    println!("=== tdx-hq 客户端示例 ===\n");

    // 探测最快的网关并连接
    println!("1. 探测网关并连接...");
    let client = HqClient::connect(HqConfig::default()).await?;
    println!("   已连接 {}\n", client.gateway());

    // 查询证券数量
    println!("2. 查询证券数量...");
    let count_sh = client.get_security_count(Market::SH).await?;
    let count_sz = client.get_security_count(Market::SZ).await?;
    println!("   上海: {} 只, 深圳: {} 只\n", count_sh, count_sz);

    // 查询证券列表
    println!("3. 查询证券列表...");
    let list = client.get_security_list(Market::SH, 0).await?;
    println!("   获取到 {} 条", list.len());
    for (i, security) in list.iter().take(10).enumerate() {
        println!("     {}. {:?}", i + 1, security);
    }
    println!();

    // 查询五档行情
    println!("4. 查询五档行情...");
    let quotes = client
        .get_security_quotes(&["000001.SZ", "600519.SH"])
        .await?;
    for quote in &quotes {
        println!("   {:?}", quote);
    }
    println!();

    // 查询日K线
    println!("5. 查询日K线...");
    let bars = client.get_bars("000001.SZ", Period::Day, 0, 5).await?;
    for bar in &bars {
        println!("   {:?}", bar);
    }
    println!();

    // 查询分时成交
    println!("6. 查询分时成交...");
    let trades = client.get_transaction_data("000001.SZ", 0, 10).await?;
    for trade in trades.iter().take(10) {
        println!("   {:?}", trade);
    }

    client.close().await;
    Ok(())
}
