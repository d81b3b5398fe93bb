//! 请求排队与派发
//!
//! 所有业务请求先进入队列，由派发任务按提交顺序取出，在并发上限的
//! 约束下交给传输层执行。调用方通过 [`RequestQueue::submit`] 显式提交
//! 并等待结果，每个请求恰好收到一次应答或错误。

use crate::{
    client::ClientError,
    protocol::frame::{RequestFrame, ResponseFrame},
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Semaphore};

/// 传输层抽象（生产实现为 [`ConnectionSession`](crate::session::ConnectionSession)）
pub trait Transport: Send + Sync + 'static {
    fn call(
        &self,
        frame: RequestFrame,
    ) -> impl Future<Output = Result<ResponseFrame, ClientError>> + Send;
}

impl Transport for crate::session::ConnectionSession {
    fn call(
        &self,
        frame: RequestFrame,
    ) -> impl Future<Output = Result<ResponseFrame, ClientError>> + Send {
        crate::session::ConnectionSession::call(self, frame)
    }
}

struct Job {
    frame: RequestFrame,
    reply: oneshot::Sender<Result<ResponseFrame, ClientError>>,
}

/// 请求队列句柄（可克隆，发往同一派发任务）
#[derive(Clone)]
pub struct RequestQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl RequestQueue {
    /// 启动派发任务
    ///
    /// 许可按提交顺序获取，因此即便并发上限大于1，请求的发起顺序
    /// 也与提交顺序一致。
    pub fn start<T: Transport>(transport: Arc<T>, max_inflight: usize) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let semaphore = Arc::new(Semaphore::new(max_inflight.max(1)));

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let permit = match semaphore.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                let transport = transport.clone();
                tokio::spawn(async move {
                    let result = transport.call(job.frame).await;
                    // 调用方可能已放弃等待
                    let _ = job.reply.send(result);
                    drop(permit);
                });
            }
        });

        Self { tx }
    }

    /// 提交请求并等待应答
    pub async fn submit(&self, frame: RequestFrame) -> Result<ResponseFrame, ClientError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Job {
                frame,
                reply: reply_tx,
            })
            .map_err(|_| ClientError::QueueClosed)?;

        reply_rx.await.map_err(|_| ClientError::QueueClosed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::MessageType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Mutex;

    /// 记录调用顺序与并发度的模拟传输层
    struct MockTransport {
        delay: Duration,
        inflight: AtomicUsize,
        max_inflight: AtomicUsize,
        order: Mutex<Vec<u32>>,
    }

    impl MockTransport {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                inflight: AtomicUsize::new(0),
                max_inflight: AtomicUsize::new(0),
                order: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for MockTransport {
        fn call(
            &self,
            frame: RequestFrame,
        ) -> impl Future<Output = Result<ResponseFrame, ClientError>> + Send {
            async move {
                self.order.lock().await.push(frame.msg_id);
                let now = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_inflight.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(self.delay).await;
                self.inflight.fetch_sub(1, Ordering::SeqCst);

                Ok(ResponseFrame::new(
                    0x1C,
                    frame.msg_id,
                    frame.msg_type,
                    0,
                    0,
                    Vec::new(),
                ))
            }
        }
    }

    fn frame(msg_id: u32) -> RequestFrame {
        RequestFrame::new(msg_id, MessageType::SecurityCount, vec![0x01])
    }

    #[tokio::test]
    async fn serial_queue_preserves_order() {
        let transport = Arc::new(MockTransport::new(Duration::from_millis(10)));
        let queue = RequestQueue::start(transport.clone(), 1);

        let mut handles = Vec::new();
        for i in 1..=5u32 {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move { queue.submit(frame(i)).await }));
            // 确保按序进入队列
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(*transport.order.lock().await, vec![1, 2, 3, 4, 5]);
        assert_eq!(transport.max_inflight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inflight_never_exceeds_limit() {
        let transport = Arc::new(MockTransport::new(Duration::from_millis(20)));
        let queue = RequestQueue::start(transport.clone(), 2);

        let mut handles = Vec::new();
        for i in 1..=8u32 {
            let queue = queue.clone();
            handles.push(tokio::spawn(async move { queue.submit(frame(i)).await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert!(transport.max_inflight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn submit_returns_matching_response() {
        let transport = Arc::new(MockTransport::new(Duration::from_millis(1)));
        let queue = RequestQueue::start(transport, 1);

        let response = queue.submit(frame(42)).await.unwrap();
        assert_eq!(response.msg_id, 42);
    }
}
