use crate::base::neterror::NetError;
use crate::socket::client::SocketType;
use crate::socket::tls::TlsConfig;
use boring::ssl::{ConnectConfiguration, SslConnector, SslMethod};
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob<'a> {
    tls_config: &'a TlsConfig,
}

impl<'a> ConnectJob<'a> {
    pub fn new(tls_config: &'a TlsConfig) -> Self {
        Self { tls_config }
    }

    pub async fn connect(&self, url: &Url) -> Result<SocketType, NetError> {
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;
        let https = match url.scheme() {
            "https" => true,
            "http" => false,
            _ => return Err(NetError::UnknownUrlScheme),
        };

        // 1. DNS Resolution
        // IPv6 literals come back bracketed from host_str().
        let lookup_host = host.trim_start_matches('[').trim_end_matches(']');
        let addrs: Vec<_> = tokio::net::lookup_host((lookup_host, port))
            .await
            .map_err(|_| NetError::NameNotResolved)?
            .collect();
        tracing::debug!(host = %host, count = addrs.len(), "resolved host");

        // 2. TCP Connect, first address that answers wins
        let mut last_err = NetError::NameNotResolved;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "tcp connect failed");
                    last_err = NetError::from(e);
                }
            }
        }
        let stream = stream.ok_or(last_err)?;
        // Requests are small and latency-bound.
        let _ = stream.set_nodelay(true);

        if !https {
            return Ok(SocketType::Tcp(stream));
        }

        // 3. SSL Handshake
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
        self.tls_config.apply_to_builder(&mut builder)?;

        let config = Self::configure(&builder.build(), lookup_host)?;
        let tls_stream = tokio_boring::connect(config, lookup_host, stream)
            .await
            .map_err(|e| {
                tracing::debug!(host = %host, error = ?e, "SSL handshake failed");
                NetError::SslProtocolError
            })?;

        Ok(SocketType::Ssl(tls_stream))
    }

    /// Per-connection TLS settings for `host`.
    ///
    /// IP literals get no SNI, but the certificate is still checked against
    /// the address.
    fn configure(connector: &SslConnector, host: &str) -> Result<ConnectConfiguration, NetError> {
        let mut config = connector.configure().map_err(|_| NetError::SslProtocolError)?;
        if !TlsConfig::should_set_sni(host) {
            config.set_use_server_name_indication(false);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boring::asn1::Asn1Time;
    use boring::bn::BigNum;
    use boring::ec::{EcGroup, EcKey};
    use boring::hash::MessageDigest;
    use boring::nid::Nid;
    use boring::pkey::{PKey, Private};
    use boring::ssl::SslAcceptor;
    use boring::x509::extension::{BasicConstraints, SubjectAlternativeName};
    use boring::x509::{X509NameBuilder, X509};
    use tokio::net::TcpListener;

    enum San {
        Ip(&'static str),
        Dns(&'static str),
    }

    fn self_signed(san: San) -> (X509, PKey<Private>) {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        let key = PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", "scratchnet test").unwrap();
        let name = name.build();

        let mut cert = X509::builder().unwrap();
        cert.set_version(2).unwrap();
        let serial = BigNum::from_u32(1).unwrap().to_asn1_integer().unwrap();
        cert.set_serial_number(&serial).unwrap();
        cert.set_subject_name(&name).unwrap();
        cert.set_issuer_name(&name).unwrap();
        cert.set_pubkey(&key).unwrap();
        cert.set_not_before(&Asn1Time::days_from_now(0).unwrap()).unwrap();
        cert.set_not_after(&Asn1Time::days_from_now(1).unwrap()).unwrap();
        cert.append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();

        let mut alt = SubjectAlternativeName::new();
        match san {
            San::Ip(ip) => alt.ip(ip),
            San::Dns(dns) => alt.dns(dns),
        };
        let alt = alt.build(&cert.x509v3_context(None, None)).unwrap();
        cert.append_extension(alt).unwrap();

        cert.sign(&key, MessageDigest::sha256()).unwrap();
        (cert.build(), key)
    }

    /// Handshake with a local server whose certificate is trusted but names `san`.
    async fn handshake_ip_host(san: San) -> bool {
        let (cert, key) = self_signed(san);

        let mut acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls()).unwrap();
        acceptor.set_private_key(&key).unwrap();
        acceptor.set_certificate(&cert).unwrap();
        let acceptor = acceptor.build();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                let _ = tokio_boring::accept(&acceptor, socket).await;
            }
        });

        let mut builder = SslConnector::builder(SslMethod::tls()).unwrap();
        TlsConfig::default().apply_to_builder(&mut builder).unwrap();
        builder.cert_store_mut().add_cert(cert).unwrap();
        let config = ConnectJob::configure(&builder.build(), "127.0.0.1").unwrap();

        let stream = TcpStream::connect(addr).await.unwrap();
        tokio_boring::connect(config, "127.0.0.1", stream).await.is_ok()
    }

    #[tokio::test]
    async fn test_ip_host_accepts_matching_certificate() {
        assert!(handshake_ip_host(San::Ip("127.0.0.1")).await);
    }

    #[tokio::test]
    async fn test_ip_host_rejects_certificate_for_other_name() {
        assert!(!handshake_ip_host(San::Dns("scratch.mit.edu")).await);
    }
}
