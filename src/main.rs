use tdx_hq::protocol::{
    constants::{Market, Period},
    messages::{BarsMsg, SecurityCount, Setup},
};

fn main() {
    env_logger::init();

    println!("tdx-hq - 通达信行情协议 Rust 实现");

    // 示例：握手请求帧
    let frame = Setup::cmd1(1);
    println!("握手命令1请求帧: {:02X?}", frame.encode());

    // 示例：证券数量请求帧
    let frame = SecurityCount::request(2, Market::SH);
    println!("证券数量请求帧: {:02X?}", frame.encode());

    // 示例：日K线请求帧
    if let Ok(frame) = BarsMsg::request(3, Period::Day, Market::SH, "600519", 0, 10) {
        println!("日K线请求帧: {:02X?}", frame.encode());
    }
}
