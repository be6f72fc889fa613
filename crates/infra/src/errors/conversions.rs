//! Conversions from external infrastructure errors into domain errors.

use std::path::Path;

use helpkit_domain::HelpkitError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HelpkitError);

impl From<InfraError> for HelpkitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HelpkitError> for InfraError {
    fn from(value: HelpkitError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoHelpkitError {
    fn into_helpkit(self) -> HelpkitError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → HelpkitError */
/* -------------------------------------------------------------------------- */

impl IntoHelpkitError for std::io::Error {
    fn into_helpkit(self) -> HelpkitError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => HelpkitError::NotFound(self.to_string()),
            ErrorKind::PermissionDenied => {
                HelpkitError::Security(format!("permission denied: {self}"))
            }
            ErrorKind::InvalidData => HelpkitError::Serialization(self.to_string()),
            _ => HelpkitError::Io(self.to_string()),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_helpkit())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error / toml::de::Error → HelpkitError */
/* -------------------------------------------------------------------------- */

impl IntoHelpkitError for serde_json::Error {
    fn into_helpkit(self) -> HelpkitError {
        if self.is_io() {
            return HelpkitError::Io(self.to_string());
        }
        HelpkitError::Serialization(format!("invalid JSON: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_helpkit())
    }
}

impl IntoHelpkitError for toml::de::Error {
    fn into_helpkit(self) -> HelpkitError {
        HelpkitError::Config(format!("invalid TOML: {}", self.to_string().trim()))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_helpkit())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HelpkitError */
/* -------------------------------------------------------------------------- */

impl IntoHelpkitError for HttpError {
    fn into_helpkit(self) -> HelpkitError {
        if self.is_timeout() {
            return HelpkitError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return HelpkitError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return HelpkitError::Serialization(format!("unexpected HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => HelpkitError::Security(message),
                404 => HelpkitError::NotFound(message),
                429 => HelpkitError::Network(message),
                400..=499 => HelpkitError::InvalidInput(message),
                _ => HelpkitError::Network(message),
            };
        }

        HelpkitError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_helpkit())
    }
}

/// Shorthand used across the crate: `.map_err(to_helpkit)?`
pub(crate) fn to_helpkit<E>(err: E) -> HelpkitError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}

/// Map an I/O failure on `path` into the domain error, keeping the kind
///
/// ```rust,ignore
/// fs::read(&path).map_err(|e| io_error("read", &path, e))?;
/// ```
#[inline]
pub(crate) fn io_error(operation: &str, path: &Path, err: std::io::Error) -> HelpkitError {
    let message = format!("{operation} {} failed: {err}", path.display());
    match InfraError::from(err).0 {
        HelpkitError::NotFound(_) => HelpkitError::NotFound(message),
        HelpkitError::Security(_) => HelpkitError::Security(message),
        HelpkitError::Serialization(_) => HelpkitError::Serialization(message),
        _ => HelpkitError::Io(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::io::{Error as IoError, ErrorKind};

    use reqwest::{Client, StatusCode};
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::new(ErrorKind::NotFound, "contacts.json");
        let mapped: HelpkitError = InfraError::from(err).into();
        match mapped {
            HelpkitError::NotFound(msg) => assert!(msg.contains("contacts.json")),
            other => panic!("expected not found, got {:?}", other),
        }

        let denied: HelpkitError = to_helpkit(IoError::from(ErrorKind::PermissionDenied));
        assert!(matches!(denied, HelpkitError::Security(_)));
    }

    #[test]
    fn io_error_keeps_kind_and_adds_context() {
        let err = io_error("read", Path::new("/tmp/db/a.json"), IoError::from(ErrorKind::NotFound));
        match err {
            HelpkitError::NotFound(msg) => assert!(msg.starts_with("read /tmp/db/a.json failed")),
            other => panic!("expected not found, got {:?}", other),
        }
        let other = io_error("write", Path::new("x"), IoError::from(ErrorKind::WriteZero));
        assert!(matches!(other, HelpkitError::Io(_)));
    }

    #[test]
    fn parse_errors_map_by_format() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(to_helpkit(json_err), HelpkitError::Serialization(_)));

        let toml_err = toml::from_str::<toml::Table>("logging = ").unwrap_err();
        match to_helpkit(toml_err) {
            HelpkitError::Config(msg) => assert!(msg.starts_with("invalid TOML")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn http_status_403_maps_to_security_error() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::FORBIDDEN))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: HelpkitError = InfraError::from(error).into();
            match mapped {
                HelpkitError::Security(msg) => assert!(msg.contains("403")),
                other => panic!("expected security error, got {:?}", other),
            }
        });
    }

    #[test]
    fn http_status_422_maps_to_invalid_input() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(422))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            assert!(matches!(to_helpkit(error), HelpkitError::InvalidInput(msg) if msg.contains("422")));
        });
    }
}
