//! Conversions from external infrastructure errors into domain errors.

use artistcal_domain::CalendarError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalendarError);

impl From<InfraError> for CalendarError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalendarError> for InfraError {
    fn from(value: CalendarError) -> Self {
        InfraError(value)
    }
}

trait IntoCalendarError {
    fn into_calendar(self) -> CalendarError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalendarError */
/* -------------------------------------------------------------------------- */

impl IntoCalendarError for HttpError {
    fn into_calendar(self) -> CalendarError {
        if self.is_timeout() {
            return CalendarError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return CalendarError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return CalendarError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => CalendarError::Auth(message),
                404 => CalendarError::NotFound(message),
                429 => CalendarError::Network(message),
                400..=499 => CalendarError::InvalidInput(message),
                500..=599 => CalendarError::Server(message),
                _ => CalendarError::Network(message),
            };
        }

        if self.is_decode() {
            return CalendarError::Server(format!("malformed response body: {self}"));
        }

        CalendarError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_calendar())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: StatusCode) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(status)).mount(&server).await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let mapped: CalendarError =
            InfraError::from(status_error(StatusCode::UNAUTHORIZED).await).into();
        match mapped {
            CalendarError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_503_maps_to_server_error() {
        let mapped: CalendarError =
            InfraError::from(status_error(StatusCode::SERVICE_UNAVAILABLE).await).into();
        assert!(matches!(mapped, CalendarError::Server(_)));
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let mapped: CalendarError =
            InfraError::from(status_error(StatusCode::NOT_FOUND).await).into();
        assert!(matches!(mapped, CalendarError::NotFound(_)));
    }

    #[test]
    fn newtype_round_trips_domain_error() {
        let original = CalendarError::Busy("batch".into());
        let back: CalendarError = InfraError::from(original.clone()).into();
        assert_eq!(back, original);
    }
}
