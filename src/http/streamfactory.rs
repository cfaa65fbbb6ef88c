use crate::base::neterror::NetError;
use crate::socket::connectjob::ConnectJob;
use crate::socket::tls::TlsConfig;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use url::Url;

/// Wraps an HTTP/1.1 connection ready to carry one request.
/// Equivalent to net::HttpStream.
pub struct HttpStream {
    sender: http1::SendRequest<Full<Bytes>>,
}

impl HttpStream {
    pub async fn send_request(
        &mut self,
        req: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, NetError> {
        self.sender.ready().await.map_err(|e| {
            tracing::debug!(error = %e, "connection not ready");
            NetError::ConnectionClosed
        })?;
        self.sender.send_request(req).await.map_err(|e| {
            tracing::debug!(error = %e, "request failed");
            if e.is_parse() {
                NetError::InvalidHttpResponse
            } else if e.is_incomplete_message() {
                NetError::EmptyResponse
            } else {
                NetError::ConnectionClosed
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpStreamFactory {
    tls_config: TlsConfig,
}

impl HttpStreamFactory {
    pub fn new(tls_config: TlsConfig) -> Self {
        Self { tls_config }
    }

    pub async fn create_stream(&self, url: &Url) -> Result<HttpStream, NetError> {
        // 1. Get raw socket
        let socket = ConnectJob::new(&self.tls_config).connect(url).await?;

        // 2. HTTP/1.1 handshake
        let io = TokioIo::new(socket);
        let (sender, conn) = http1::handshake(io)
            .await
            .map_err(|_| NetError::ConnectionFailed)?;

        // 3. Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection driver exited");
            }
        });

        Ok(HttpStream { sender })
    }
}
