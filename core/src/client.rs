//! Typed client for the accounts resource.
//!
//! # Design
//! `AccountClient` owns one `Endpoint` per operation, built once from the base
//! URL and never mutated, so a client can be shared across threads freely.
//! Every operation follows the same path: execute the endpoint, read the body,
//! map the status code, then decode. The response is consumed on every path,
//! which releases its body before the operation returns.

use std::sync::Arc;

use tracing::warn;

use crate::endpoint::{Endpoint, RequestOptions};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpResponse, HttpTransport};
use crate::types::Account;

const PARAM_ID: &str = "id";
const QUERY_VERSION: &str = "version";

/// Create, fetch and delete accounts.
#[derive(Debug, Clone)]
pub struct AccountClient {
    create: Endpoint,
    fetch: Endpoint,
    delete: Endpoint,
}

impl AccountClient {
    pub fn new(base_url: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let collection = format!("{base_url}/accounts");
        let item = format!("{base_url}/accounts/{{{PARAM_ID}}}");

        Self {
            create: Endpoint::new(Arc::clone(&transport), collection, HttpMethod::Post),
            fetch: Endpoint::new(Arc::clone(&transport), item.clone(), HttpMethod::Get),
            delete: Endpoint::new(transport, item, HttpMethod::Delete),
        }
    }

    /// Client over the bundled ureq transport, configured from `config`.
    #[cfg(feature = "ureq")]
    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        let transport = crate::transport::UreqTransport::new(config.timeout);
        Self::new(&config.base_url, Arc::new(transport))
    }

    pub fn create(&self, account: &Account) -> Result<Account> {
        let body = account.encode()?;
        let response = self.create.execute(RequestOptions::new().with_body(body))?;
        let body = read_checked(response)?;
        Account::decode(&body)
    }

    pub fn fetch(&self, id: &str) -> Result<Account> {
        require_id(id)?;
        let response = self
            .fetch
            .execute(RequestOptions::new().with_path_param(PARAM_ID, id))?;
        let body = read_checked(response)?;
        Account::decode(&body)
    }

    /// Delete an account. With `version`, the server rejects the delete with
    /// `Conflict` unless it matches the stored version.
    pub fn delete(&self, id: &str, version: Option<i64>) -> Result<()> {
        require_id(id)?;
        let mut options = RequestOptions::new().with_path_param(PARAM_ID, id);
        if let Some(version) = version {
            options = options.with_query_param(QUERY_VERSION, version.to_string());
        }
        let response = self.delete.execute(options)?;
        read_checked(response)?;
        Ok(())
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(ApiError::InvalidParameters("account id must not be empty".to_string()));
    }
    Ok(())
}

/// Drain the response body and map the status code.
fn read_checked(response: HttpResponse) -> Result<Vec<u8>> {
    let status = response.status;
    let body = response.body.read_to_end().map_err(ApiError::ReadBody)?;
    check_status(status, &body)?;
    Ok(body)
}

/// Map a status code to success or the matching `ApiError` variant.
pub fn check_status(status: u16, body: &[u8]) -> Result<()> {
    if status < 300 {
        return Ok(());
    }
    warn!(status, "account request failed");
    match status {
        400 => Err(ApiError::BadRequest {
            body: String::from_utf8_lossy(body).into_owned(),
        }),
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::Conflict),
        _ => Err(ApiError::UnexpectedStatus { status }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::sync::Mutex;

    use super::*;
    use crate::http::{Body, HttpRequest, TransportError};
    use crate::types::{AccountAttributes, AccountData};

    const FETCHED: &str = r#"{"data":{"attributes":{"bank_id":"bank_id"},"id":"id"}}"#;

    /// Transport double that records requests and replies with a canned response.
    fn replying(status: u16, body: &'static str) -> (Arc<dyn HttpTransport>, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let transport = move |req: HttpRequest| -> std::result::Result<HttpResponse, TransportError> {
            recorder.lock().unwrap().push(req);
            Ok(HttpResponse::new(status, body))
        };
        (Arc::new(transport), seen)
    }

    fn client(status: u16, body: &'static str) -> AccountClient {
        AccountClient::new("http://localhost:8080/v1/organisation", replying(status, body).0)
    }

    fn failing_client() -> AccountClient {
        let transport = |_req: HttpRequest| -> std::result::Result<HttpResponse, TransportError> {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        };
        AccountClient::new("http://localhost:8080", Arc::new(transport))
    }

    fn expected_account() -> Account {
        Account::default().with_data(
            AccountData::default()
                .with_id("id")
                .with_attributes(AccountAttributes::default().with_bank_id("bank_id")),
        )
    }

    #[test]
    fn endpoints_use_expected_urls() {
        let c = AccountClient::new("http://localhost:8080/", replying(200, "").0);
        assert_eq!(c.create.url_template(), "http://localhost:8080/accounts");
        assert_eq!(c.create.method(), HttpMethod::Post);
        assert_eq!(c.fetch.url_template(), "http://localhost:8080/accounts/{id}");
        assert_eq!(c.fetch.method(), HttpMethod::Get);
        assert_eq!(c.delete.url_template(), "http://localhost:8080/accounts/{id}");
        assert_eq!(c.delete.method(), HttpMethod::Delete);
    }

    #[test]
    fn check_status_mapping_is_total() {
        for status in [100, 200, 201, 204, 299] {
            assert!(check_status(status, b"").is_ok(), "{status}");
        }
        assert!(matches!(check_status(400, b"bad"), Err(ApiError::BadRequest { body }) if body == "bad"));
        assert!(matches!(check_status(404, b""), Err(ApiError::NotFound)));
        assert!(matches!(check_status(409, b""), Err(ApiError::Conflict)));
        for status in [300, 301, 401, 403, 422, 500, 503] {
            assert!(
                matches!(check_status(status, b""), Err(ApiError::UnexpectedStatus { status: s }) if s == status),
                "{status}"
            );
        }
    }

    #[test]
    fn create_sends_encoded_account() {
        let (transport, seen) = replying(201, FETCHED);
        let c = AccountClient::new("http://localhost:8080", transport);
        let created = c.create(&expected_account()).unwrap();
        assert_eq!(created, expected_account());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].url, "http://localhost:8080/accounts");
        assert_eq!(seen[0].body.as_deref(), Some(FETCHED.as_bytes()));
    }

    #[test]
    fn create_bad_request_wraps_body() {
        let err = client(400, "invalid iban").create(&Account::default()).unwrap_err();
        match err {
            ApiError::BadRequest { body } => assert_eq!(body, "invalid iban"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn create_invalid_json_is_decode_error() {
        let err = client(200, "}").create(&Account::default()).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn fetch_decodes_account() {
        let (transport, seen) = replying(200, r#"{"data":{"id":"id","attributes":{"bank_id":"bank_id"}}}"#);
        let c = AccountClient::new("http://localhost:8080", transport);
        let account = c.fetch("id").unwrap();
        let data = account.data.unwrap();
        assert_eq!(data.id, "id");
        assert_eq!(data.attributes.unwrap().bank_id, "bank_id");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "http://localhost:8080/accounts/id");
        assert!(seen[0].body.is_none());
    }

    #[test]
    fn fetch_not_found() {
        let err = client(404, "").fetch("any_id").unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn fetch_unexpected_status_keeps_code() {
        let err = client(500, "internal error").fetch("any_id").unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 500 }));
    }

    #[test]
    fn empty_id_is_rejected_before_sending() {
        let (transport, seen) = replying(200, FETCHED);
        let c = AccountClient::new("http://localhost:8080", transport);
        assert!(matches!(c.fetch(""), Err(ApiError::InvalidParameters(_))));
        assert!(matches!(c.delete("", None), Err(ApiError::InvalidParameters(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn delete_with_version_adds_query() {
        let (transport, seen) = replying(204, "");
        let c = AccountClient::new("http://localhost:8080", transport);
        c.delete("id", Some(0)).unwrap();
        c.delete("id", None).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].url, "http://localhost:8080/accounts/id?version=0");
        assert_eq!(seen[1].url, "http://localhost:8080/accounts/id");
    }

    #[test]
    fn delete_then_conflict() {
        assert!(client(204, "").delete("id", Some(0)).is_ok());
        let err = client(409, "").delete("id", Some(0)).unwrap_err();
        assert!(matches!(err, ApiError::Conflict));
    }

    #[test]
    fn transport_failure_never_reads_body() {
        let c = failing_client();
        let results = [
            c.create(&Account::default()).map(|_| ()),
            c.fetch("id").map(|_| ()),
            c.delete("id", Some(1)),
        ];
        for result in results {
            match result {
                Err(ApiError::Transport(cause)) => assert_eq!(cause.to_string(), "connection refused"),
                other => panic!("expected Transport, got {other:?}"),
            }
        }
    }

    #[test]
    fn unreadable_body_is_read_body_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated"))
            }
        }

        let transport = |_req: HttpRequest| -> std::result::Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: 200,
                body: Body::from_reader(Broken),
            })
        };
        let c = AccountClient::new("http://localhost:8080", Arc::new(transport));
        assert!(matches!(c.fetch("id"), Err(ApiError::ReadBody(_))));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AccountClient>();
    }
}
