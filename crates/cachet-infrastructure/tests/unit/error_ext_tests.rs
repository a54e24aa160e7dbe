//! Error context tests

use cachet_domain::error::Error;
use cachet_infrastructure::error_ext::{ErrorContext, to_domain_error};
use std::io;

fn io_failure() -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
}

#[test]
fn test_context_maps_to_backend() {
    let err = io_failure().context("Reading state").unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert!(err.to_string().contains("Reading state"));
}

#[test]
fn test_config_context() {
    let err = io_failure().config_context("Loading config").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_serialization_context() {
    let err = io_failure()
        .serialization_context("Encoding value")
        .unwrap_err();
    assert!(matches!(err, Error::Serialization { .. }));
}

#[test]
fn test_with_context_is_lazy() {
    let ok: Result<u8, io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context built for a success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_to_domain_error() {
    let err = to_domain_error(io::Error::other("boom"), "Connecting");
    assert!(err.to_string().contains("Connecting"));
}
