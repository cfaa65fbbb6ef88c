use crate::base::neterror::NetError;

#[test]
fn test_net_error_roundtrip() {
    // Standard Chromium error
    let original = NetError::ConnectionRefused;
    let code = original.as_i32();
    assert_eq!(code, -102);
    let converted = NetError::from(code);
    assert!(matches!(converted, NetError::ConnectionRefused));

    // Custom error
    let custom = NetError::JsonParseError;
    let custom_code = custom.as_i32();
    assert_eq!(custom_code, -10003);
    assert_eq!(NetError::from(custom_code), NetError::JsonParseError);
}

#[test]
fn test_unknown_error() {
    let err = NetError::from(-9999);
    assert!(matches!(err, NetError::Unknown(-9999)));
    assert_eq!(err.as_i32(), -9999);
}

#[test]
fn test_connection_error_range() {
    assert!(NetError::ConnectionTimedOut.is_connection_error());
    assert!(NetError::NameNotResolved.is_connection_error());
    assert!(!NetError::TooManyRedirects.is_connection_error());
    assert!(!NetError::JsonParseError.is_connection_error());
}

#[test]
fn test_io_error_mapping() {
    use std::io::{Error, ErrorKind};

    assert_eq!(
        NetError::from(Error::from(ErrorKind::ConnectionRefused)),
        NetError::ConnectionRefused
    );
    assert_eq!(
        NetError::from(Error::from(ErrorKind::TimedOut)),
        NetError::ConnectionTimedOut
    );
    assert_eq!(
        NetError::from(Error::from(ErrorKind::PermissionDenied)),
        NetError::ConnectionFailed
    );
}
