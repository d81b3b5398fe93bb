//! 行情客户端
//!
//! 客户端持有一条网关会话与请求队列，业务方法把请求帧提交到队列并
//! 等待应答。后台心跳任务定期查询证券数量保活，与业务请求走同一条
//! 队列，不会乱序。

use crate::{
    config::HqConfig,
    dial,
    protocol::{
        constants::{Market, Period},
        frame::FrameError,
        messages::{
            BarsMsg, CompanyCategoryMsg, CompanyContentMsg, ExRightMsg, FinanceInfoMsg,
            HistoryMinuteTimeMsg, HistoryTransactionMsg, MessageError, MinuteTimeMsg,
            SecurityCount, SecurityList, SecurityQuotes, TransactionMsg, MAX_QUOTE_COUNT,
        },
        types::{
            Bar, CompanyCategory, ExRight, FinanceInfo, MinuteTime, Quote, Security, Transaction,
        },
    },
    queue::RequestQueue,
    session::ConnectionSession,
    symbol::{Symbol, SymbolError},
    window::{BarWindow, PageStep, WindowAccum, PAGE_SIZE},
};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("请求超时")]
    Timeout,
    #[error("连接已断开")]
    ConnectionLost,
    #[error("握手失败: {0}")]
    HandshakeFailed(#[source] Box<ClientError>),
    #[error("无效的日期时间: {0}")]
    BadDatetime(String),
    #[error("没有可用的网关")]
    NoGatewayAvailable,
    #[error("消息ID不匹配: 期望{expected}, 实际{actual}")]
    MessageIdMismatch { expected: u32, actual: u32 },
    #[error("未知的消息类型: 0x{0:04X}")]
    UnknownMessageType(u16),
    #[error("队列已关闭")]
    QueueClosed,
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// 行情客户端
pub struct HqClient {
    session: Arc<ConnectionSession>,
    queue: RequestQueue,
    heartbeat: JoinHandle<()>,
}

impl HqClient {
    /// 探测延迟最低的网关并连接
    pub async fn connect(config: HqConfig) -> Result<Self, ClientError> {
        let host = dial::fastest_host(&config).await?;
        Self::connect_host(host, config).await
    }

    /// 连接指定网关
    pub async fn connect_host(
        host: crate::config::GatewayHost,
        config: HqConfig,
    ) -> Result<Self, ClientError> {
        let session = Arc::new(ConnectionSession::new(host, &config));
        let queue = RequestQueue::start(session.clone(), config.max_inflight);

        // 首个请求触发握手，验证网关可用
        let frame = SecurityCount::request(session.next_msg_id(), Market::SH);
        queue.submit(frame).await?;

        let heartbeat = Self::spawn_heartbeat(
            session.clone(),
            queue.clone(),
            config.heartbeat_interval,
        );

        Ok(Self {
            session,
            queue,
            heartbeat,
        })
    }

    /// 心跳任务：沪深两市严格交替查询证券数量
    fn spawn_heartbeat(
        session: Arc<ConnectionSession>,
        queue: RequestQueue,
        interval: std::time::Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut use_sh = true;
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await; // 首次立即完成，跳过

            loop {
                ticker.tick().await;
                let market = if use_sh { Market::SH } else { Market::SZ };
                use_sh = !use_sh;

                let frame = SecurityCount::request(session.next_msg_id(), market);
                if let Err(e) = queue.submit(frame).await {
                    log::warn!("心跳失败: {}", e);
                }
            }
        })
    }

    /// 连接的网关地址
    pub fn gateway(&self) -> String {
        self.session.host().addr()
    }

    /// 查询市场的证券数量
    pub async fn get_security_count(&self, market: Market) -> Result<u16, ClientError> {
        let frame = SecurityCount::request(self.session.next_msg_id(), market);
        let response = self.queue.submit(frame).await?;
        Ok(SecurityCount::decode_response(response.data())?)
    }

    /// 查询证券列表（从 start 偏移开始的一页，最多约1000条）
    pub async fn get_security_list(
        &self,
        market: Market,
        start: u16,
    ) -> Result<Vec<Security>, ClientError> {
        let frame = SecurityList::request(self.session.next_msg_id(), market, start);
        let response = self.queue.submit(frame).await?;
        Ok(SecurityList::decode_response(response.data())?)
    }

    /// 查询市场的全部A股列表
    pub async fn find_stock_list(&self, market: Market) -> Result<Vec<Security>, ClientError> {
        let total = self.get_security_count(market).await? as usize;
        let mut list = Vec::new();
        let mut start = 0usize;

        while start < total {
            let page = self.get_security_list(market, start as u16).await?;
            if page.is_empty() {
                break;
            }
            start += page.len();
            list.extend(
                page.into_iter()
                    .filter(|s| is_a_stock(market, &s.code)),
            );
        }

        Ok(list)
    }

    /// 查询五档行情（自动按协议上限分批）
    pub async fn get_security_quotes(&self, symbols: &[&str]) -> Result<Vec<Quote>, ClientError> {
        let mut codes = Vec::with_capacity(symbols.len());
        for s in symbols {
            let symbol = Symbol::parse(s)?;
            codes.push((symbol.market, symbol.code));
        }

        let mut quotes = Vec::with_capacity(codes.len());
        for chunk in codes.chunks(MAX_QUOTE_COUNT) {
            let frame = SecurityQuotes::request(self.session.next_msg_id(), chunk)?;
            let response = self.queue.submit(frame).await?;
            quotes.extend(SecurityQuotes::decode_response(response.data())?);
        }

        Ok(quotes)
    }

    /// 查询一页K线（倒序偏移 start，最多800条），返回页内升序
    pub async fn get_bars(
        &self,
        symbol: &str,
        period: Period,
        start: u16,
        count: u16,
    ) -> Result<Vec<Bar>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = BarsMsg::request(
            self.session.next_msg_id(),
            period,
            symbol.market,
            &symbol.code,
            start,
            count,
        )?;
        let response = self.queue.submit(frame).await?;
        Ok(BarsMsg::decode_response(
            response.data(),
            period,
            symbol.is_index(),
        )?)
    }

    /// 按日期区间与数量查询K线
    ///
    /// 边界为闭区间；给了起始日期取最早的 count 条，否则取最新的
    /// count 条；count 为 0 表示不限数量。内部按页倒序拉取，到达
    /// 边界即停止。
    pub async fn find_bars(
        &self,
        symbol: &str,
        period: Period,
        start: Option<&str>,
        end: Option<&str>,
        count: usize,
    ) -> Result<Vec<Bar>, ClientError> {
        for bound in [start, end].into_iter().flatten() {
            if crate::window::calc_start_timestamp(bound).is_none() {
                return Err(ClientError::BadDatetime(bound.to_string()));
            }
        }

        let window = BarWindow::new(start, end, count);
        let mut accum = WindowAccum::new(window);

        let mut offset: u32 = 0;
        loop {
            let page = self
                .get_bars(symbol, period, offset as u16, PAGE_SIZE)
                .await?;
            let page_len = page.len();

            if accum.push_page(&page) == PageStep::Stop {
                break;
            }
            // 页不满说明已到最早的数据
            if page_len < PAGE_SIZE as usize {
                break;
            }

            offset += PAGE_SIZE as u32;
            if offset > u16::MAX as u32 {
                break;
            }
        }

        Ok(accum.finish())
    }

    /// 查询当日分时数据
    pub async fn get_minute_time_data(&self, symbol: &str) -> Result<Vec<MinuteTime>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = MinuteTimeMsg::request(self.session.next_msg_id(), symbol.market, &symbol.code)?;
        let response = self.queue.submit(frame).await?;
        Ok(MinuteTimeMsg::decode_response(response.data())?)
    }

    /// 查询历史某日的分时数据（date 格式 YYYYMMDD）
    pub async fn get_history_minute_time_data(
        &self,
        date: &str,
        symbol: &str,
    ) -> Result<Vec<MinuteTime>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = HistoryMinuteTimeMsg::request(
            self.session.next_msg_id(),
            date,
            symbol.market,
            &symbol.code,
        )?;
        let response = self.queue.submit(frame).await?;
        Ok(HistoryMinuteTimeMsg::decode_response(response.data())?)
    }

    /// 查询当日分时成交（倒序偏移 start，单次最多1800条）
    pub async fn get_transaction_data(
        &self,
        symbol: &str,
        start: u16,
        count: u16,
    ) -> Result<Vec<Transaction>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = TransactionMsg::request(
            self.session.next_msg_id(),
            symbol.market,
            &symbol.code,
            start,
            count,
        )?;
        let response = self.queue.submit(frame).await?;
        let today = chrono::Local::now().format("%Y%m%d").to_string();
        Ok(TransactionMsg::decode_response(response.data(), &today)?)
    }

    /// 查询历史某日的分时成交（date 格式 YYYYMMDD，单次最多2000条）
    pub async fn get_history_transaction_data(
        &self,
        date: &str,
        symbol: &str,
        start: u16,
        count: u16,
    ) -> Result<Vec<Transaction>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = HistoryTransactionMsg::request(
            self.session.next_msg_id(),
            date,
            symbol.market,
            &symbol.code,
            start,
            count,
        )?;
        let response = self.queue.submit(frame).await?;
        Ok(HistoryTransactionMsg::decode_response(response.data(), date)?)
    }

    /// 查询除权除息信息
    pub async fn get_ex_right_info(&self, symbol: &str) -> Result<Vec<ExRight>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = ExRightMsg::request(self.session.next_msg_id(), symbol.market, &symbol.code)?;
        let response = self.queue.submit(frame).await?;
        Ok(ExRightMsg::decode_response(response.data())?)
    }

    /// 查询财务信息
    pub async fn get_finance_info(&self, symbol: &str) -> Result<FinanceInfo, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame =
            FinanceInfoMsg::request(self.session.next_msg_id(), symbol.market, &symbol.code)?;
        let response = self.queue.submit(frame).await?;
        Ok(FinanceInfoMsg::decode_response(response.data())?)
    }

    /// 查询公司信息目录
    pub async fn get_company_info_category(
        &self,
        symbol: &str,
    ) -> Result<Vec<CompanyCategory>, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame =
            CompanyCategoryMsg::request(self.session.next_msg_id(), symbol.market, &symbol.code)?;
        let response = self.queue.submit(frame).await?;
        Ok(CompanyCategoryMsg::decode_response(response.data())?)
    }

    /// 按目录条目读取公司信息内容
    pub async fn get_company_info_content(
        &self,
        symbol: &str,
        category: &CompanyCategory,
    ) -> Result<String, ClientError> {
        let symbol = Symbol::parse(symbol)?;
        let frame = CompanyContentMsg::request(
            self.session.next_msg_id(),
            symbol.market,
            &symbol.code,
            &category.filename,
            category.start,
            category.length,
        )?;
        let response = self.queue.submit(frame).await?;
        Ok(CompanyContentMsg::decode_response(response.data())?)
    }

    /// 关闭客户端，停止心跳并断开连接
    pub async fn close(&self) {
        self.heartbeat.abort();
        self.session.close().await;
    }
}

impl Drop for HqClient {
    fn drop(&mut self) {
        self.heartbeat.abort();
    }
}

/// A股代码前缀判断
fn is_a_stock(market: Market, code: &str) -> bool {
    match market {
        Market::SH => code.starts_with("60") || code.starts_with("68"),
        Market::SZ => code.starts_with("00") || code.starts_with("30"),
        Market::BJ => code.starts_with("83") || code.starts_with("87") || code.starts_with("43"),
    }
}
