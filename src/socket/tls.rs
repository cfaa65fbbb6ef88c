use crate::base::neterror::NetError;
use boring::ssl::{SslConnectorBuilder, SslVerifyMode, SslVersion};

/// TLS Client Hello configuration.
///
/// Defaults follow Chrome's cipher, curve and signature-algorithm ordering so
/// the handshake looks like the browser the `User-Agent` claims to be. ALPN
/// only offers HTTP/1.1 because the stream layer speaks nothing else.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub min_version: Option<SslVersion>,
    pub max_version: Option<SslVersion>,
    pub cipher_list: String,
    pub alpn_protos: Vec<String>,
    pub curves: Vec<String>,
    pub sigalgs: String,
    pub verify_peer: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self::default_chrome()
    }
}

impl TlsConfig {
    /// Create a TLS configuration matching Chrome's defaults.
    pub fn default_chrome() -> Self {
        Self {
            min_version: Some(SslVersion::TLS1_2),
            max_version: Some(SslVersion::TLS1_3),
            cipher_list:
                "TLS_AES_128_GCM_SHA256:TLS_AES_256_GCM_SHA384:TLS_CHACHA20_POLY1305_SHA256:\
                ECDHE-ECDSA-AES128-GCM-SHA256:ECDHE-RSA-AES128-GCM-SHA256:\
                ECDHE-ECDSA-AES256-GCM-SHA384:ECDHE-RSA-AES256-GCM-SHA384:\
                ECDHE-ECDSA-CHACHA20-POLY1305:ECDHE-RSA-CHACHA20-POLY1305:\
                ECDHE-RSA-AES128-SHA:ECDHE-RSA-AES256-SHA:\
                AES128-GCM-SHA256:AES256-GCM-SHA384:AES128-SHA:AES256-SHA"
                    .to_string(),
            alpn_protos: vec!["http/1.1".to_string()],
            curves: vec!["X25519".to_string(), "P-256".to_string(), "P-384".to_string()],
            sigalgs: "ECDSA+SHA256:RSA-PSS+SHA256:RSA+SHA256:\
                ECDSA+SHA384:RSA-PSS+SHA384:RSA+SHA384:\
                RSA-PSS+SHA512:RSA+SHA512"
                .to_string(),
            verify_peer: true,
        }
    }

    /// ALPN protocol list in wire format (length-prefixed).
    pub fn alpn_wire(&self) -> Result<Vec<u8>, NetError> {
        let mut wire = Vec::new();
        for proto in &self.alpn_protos {
            let len = u8::try_from(proto.len()).map_err(|_| NetError::SslProtocolError)?;
            wire.push(len);
            wire.extend_from_slice(proto.as_bytes());
        }
        Ok(wire)
    }

    /// Apply this configuration to an SSL connector builder.
    pub fn apply_to_builder(&self, builder: &mut SslConnectorBuilder) -> Result<(), NetError> {
        if let Some(min) = self.min_version {
            builder.set_min_proto_version(Some(min)).map_err(|_| NetError::SslProtocolError)?;
        }
        if let Some(max) = self.max_version {
            builder.set_max_proto_version(Some(max)).map_err(|_| NetError::SslProtocolError)?;
        }

        builder.set_cipher_list(&self.cipher_list).map_err(|_| NetError::SslProtocolError)?;

        if !self.alpn_protos.is_empty() {
            builder
                .set_alpn_protos(&self.alpn_wire()?)
                .map_err(|_| NetError::SslProtocolError)?;
        }

        if !self.sigalgs.is_empty() {
            builder.set_sigalgs_list(&self.sigalgs).map_err(|_| NetError::SslProtocolError)?;
        }

        if !self.curves.is_empty() {
            builder
                .set_curves_list(&self.curves.join(":"))
                .map_err(|_| NetError::SslProtocolError)?;
        }

        builder.set_verify(if self.verify_peer {
            SslVerifyMode::PEER
        } else {
            SslVerifyMode::NONE
        });

        Ok(())
    }

    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(host: &str) -> bool {
        host.parse::<std::net::IpAddr>().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpn_wire_format() {
        let config = TlsConfig::default_chrome();
        assert_eq!(config.alpn_wire().unwrap(), b"\x08http/1.1".to_vec());
    }

    #[test]
    fn test_alpn_rejects_oversized_protocol() {
        let config = TlsConfig {
            alpn_protos: vec!["x".repeat(256)],
            ..TlsConfig::default_chrome()
        };
        assert_eq!(config.alpn_wire().unwrap_err(), NetError::SslProtocolError);
    }

    #[test]
    fn test_sni_skipped_for_ip() {
        assert!(TlsConfig::should_set_sni("scratch.mit.edu"));
        assert!(!TlsConfig::should_set_sni("127.0.0.1"));
        assert!(!TlsConfig::should_set_sni("::1"));
    }
}
