//! 网关连接会话
//!
//! 会话封装一条 TCP 连接及其握手状态。连接建立后必须依次完成三个
//! 握手命令才能发业务请求；I/O 出错后会话进入失败态，下一次请求
//! 触发重连与重新握手。

use crate::{
    client::ClientError,
    config::{GatewayHost, HqConfig},
    dial,
    protocol::{
        codec::{bytes_to_u16_le, bytes_to_u32_le},
        constants::{MessageType, PREFIX_RESP},
        frame::{RequestFrame, ResponseFrame},
        messages::Setup,
    },
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 尚未建立连接
    Uninitialized,
    /// 连接已建立，握手进行中
    Handshaking,
    /// 握手完成，可以发业务请求
    Ready,
    /// I/O 出错，待重连
    Failed,
}

struct Inner {
    stream: Option<TcpStream>,
    state: SessionState,
}

/// 网关连接会话
pub struct ConnectionSession {
    host: GatewayHost,
    connect_timeout: Duration,
    request_timeout: Duration,
    msg_id: AtomicU32,
    inner: Mutex<Inner>,
}

impl ConnectionSession {
    pub fn new(host: GatewayHost, config: &HqConfig) -> Self {
        Self {
            host,
            connect_timeout: config.connect_timeout,
            request_timeout: config.request_timeout,
            msg_id: AtomicU32::new(1),
            inner: Mutex::new(Inner {
                stream: None,
                state: SessionState::Uninitialized,
            }),
        }
    }

    /// 连接的网关地址
    pub fn host(&self) -> &GatewayHost {
        &self.host
    }

    /// 分配下一个消息ID
    pub fn next_msg_id(&self) -> u32 {
        self.msg_id.fetch_add(1, Ordering::Relaxed)
    }

    /// 当前会话状态
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// 发送请求并等待对应的响应
    ///
    /// 会话未就绪时先重连并握手，因此失败后的请求会自然触发恢复。
    /// 整个往返受请求超时约束。
    pub async fn call(&self, frame: RequestFrame) -> Result<ResponseFrame, ClientError> {
        time::timeout(self.request_timeout, self.call_inner(frame))
            .await
            .map_err(|_| ClientError::Timeout)?
    }

    async fn call_inner(&self, frame: RequestFrame) -> Result<ResponseFrame, ClientError> {
        let mut inner = self.inner.lock().await;

        if inner.state != SessionState::Ready {
            self.reconnect(&mut inner).await?;
        }

        match Self::exchange(&mut inner, frame).await {
            Ok(response) => Ok(response),
            Err(e) => {
                // 连接不再可用，标记失败等待下次重连
                inner.stream = None;
                inner.state = SessionState::Failed;
                Err(e)
            }
        }
    }

    /// 重新建立连接并完成三步握手
    async fn reconnect(&self, inner: &mut Inner) -> Result<(), ClientError> {
        log::info!("连接网关 {}", self.host.addr());
        inner.state = SessionState::Handshaking;
        inner.stream = None;

        let stream = match dial::dial_host(&self.host, self.connect_timeout).await {
            Ok(stream) => stream,
            Err(e) => {
                inner.state = SessionState::Failed;
                return Err(e);
            }
        };
        inner.stream = Some(stream);

        let handshake = [
            Setup::cmd1(self.next_msg_id()),
            Setup::cmd2(self.next_msg_id()),
            Setup::cmd3(self.next_msg_id()),
        ];
        for frame in handshake {
            if let Err(e) = Self::exchange(inner, frame).await {
                inner.stream = None;
                inner.state = SessionState::Failed;
                return Err(ClientError::HandshakeFailed(Box::new(e)));
            }
        }

        inner.state = SessionState::Ready;
        log::debug!("网关 {} 握手完成", self.host.addr());
        Ok(())
    }

    /// 单次请求-响应往返，校验消息ID
    async fn exchange(inner: &mut Inner, frame: RequestFrame) -> Result<ResponseFrame, ClientError> {
        let stream = inner.stream.as_mut().ok_or(ClientError::ConnectionLost)?;

        let bytes = frame.encode();
        log::trace!("发送 {:?} {} 字节", frame.msg_type, bytes.len());
        stream
            .write_all(&bytes)
            .await
            .map_err(|_| ClientError::ConnectionLost)?;

        let response = Self::read_response(stream).await?;

        if response.msg_id != frame.msg_id {
            return Err(ClientError::MessageIdMismatch {
                expected: frame.msg_id,
                actual: response.msg_id,
            });
        }
        if !response.is_success() {
            log::warn!("{:?} 响应控制码异常: 0x{:02X}", frame.msg_type, response.control);
        }

        Ok(response)
    }

    /// 读取一个完整响应帧（16字节头 + 数据域）并解压
    async fn read_response(stream: &mut TcpStream) -> Result<ResponseFrame, ClientError> {
        let mut header = [0u8; 16];
        stream
            .read_exact(&mut header)
            .await
            .map_err(|_| ClientError::ConnectionLost)?;

        let prefix = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        if prefix != PREFIX_RESP {
            return Err(ClientError::ConnectionLost);
        }

        let control = header[4];
        let msg_id = bytes_to_u32_le(&header[5..9]);
        let msg_type_val = bytes_to_u16_le(&header[10..12]);
        let zip_length = bytes_to_u16_le(&header[12..14]);
        let length = bytes_to_u16_le(&header[14..16]);

        let msg_type = MessageType::from_u16(msg_type_val)
            .ok_or(ClientError::UnknownMessageType(msg_type_val))?;

        let mut data = vec![0u8; zip_length as usize];
        stream
            .read_exact(&mut data)
            .await
            .map_err(|_| ClientError::ConnectionLost)?;

        let mut response = ResponseFrame::new(control, msg_id, msg_type, zip_length, length, data);
        response.decompress()?;
        Ok(response)
    }

    /// 关闭连接
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.stream = None;
        inner.state = SessionState::Uninitialized;
    }
}
