pub mod client;
pub mod config;
pub mod dial;
pub mod protocol;
pub mod queue;
pub mod reader;
pub mod session;
pub mod subscribe;
pub mod symbol;
pub mod window;

pub use client::{ClientError, HqClient};
pub use config::{GatewayHost, HqConfig};
pub use dial::{dial_host, fastest_host, probe, random_host, ProbeResult};
pub use protocol::constants::{Market, Period};
pub use protocol::types::{
    Bar, CompanyCategory, ExRight, FinanceInfo, MinuteTime, Price, Quote, Security, Transaction,
};
pub use reader::{DailyBarReader, MinuteBarReader, ReaderError, SecurityType};
pub use session::{ConnectionSession, SessionState};
pub use subscribe::{subscribe, Subscription, SubscriptionEvent, SubscriptionHandle};
pub use symbol::{Symbol, SymbolError};

// 重新导出 log 宏供用户使用
pub use log;
