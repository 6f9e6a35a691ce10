use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Path prefix the accounts routes are mounted under.
pub const API_PREFIX: &str = "/v1/organisation";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// An account as stored and returned by the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: Uuid,
    pub organisation_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: i64,
    pub attributes: Map<String, Value>,
}

/// Create payload before validation. Identifiers arrive as plain strings so
/// malformed values can be reported as 400 with a reason.
#[derive(Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub organisation_id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    pub version: Option<i64>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<i64>,
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub type Db = Arc<RwLock<HashMap<Uuid, AccountRecord>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    let accounts = Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(fetch_account).delete(delete_account))
        .with_state(db);
    Router::new().nest(API_PREFIX, accounts)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn create_account(
    State(db): State<Db>,
    payload: Result<Json<Envelope<NewAccount>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<AccountRecord>>)> {
    let Json(Envelope { data }) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;
    let record = validate(data).map_err(bad_request)?;

    let mut accounts = db.write().await;
    if accounts.contains_key(&record.id) {
        return Err((
            StatusCode::CONFLICT,
            "Account cannot be created as it violates a duplicate constraint".to_string(),
        ));
    }
    accounts.insert(record.id, record.clone());
    info!(id = %record.id, "account created");
    Ok((StatusCode::CREATED, Json(Envelope { data: record })))
}

async fn fetch_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<AccountRecord>>, StatusCode> {
    let accounts = db.read().await;
    accounts
        .get(&id)
        .cloned()
        .map(|data| Json(Envelope { data }))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_account(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteParams>,
) -> ApiResult<StatusCode> {
    let mut accounts = db.write().await;
    let stored = accounts
        .get(&id)
        .ok_or((StatusCode::NOT_FOUND, String::new()))?;
    if let Some(version) = params.version {
        if version != stored.version {
            debug!(%id, expected = stored.version, got = version, "version mismatch");
            return Err((StatusCode::CONFLICT, "invalid version".to_string()));
        }
    }
    accounts.remove(&id);
    info!(%id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn bad_request(message: String) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message)
}

/// Apply the API's validation rules and assign the initial version.
pub fn validate(input: NewAccount) -> Result<AccountRecord, String> {
    let id = Uuid::parse_str(&input.id).map_err(|_| "id in body must be of type uuid".to_string())?;
    let organisation_id = Uuid::parse_str(&input.organisation_id)
        .map_err(|_| "organisation_id in body must be of type uuid".to_string())?;
    if input.kind != "accounts" {
        return Err("type in body should be one of [accounts]".to_string());
    }

    let attrs = &input.attributes;
    if !attrs.get("country").is_some_and(Value::is_string) {
        return Err("country in body is required".to_string());
    }
    let has_name = attrs
        .get("name")
        .and_then(Value::as_array)
        .is_some_and(|names| !names.is_empty());
    if !has_name {
        return Err("name in body is required".to_string());
    }
    if let Some(iban) = attrs.get("iban").and_then(Value::as_str) {
        if !is_valid_iban(iban) {
            return Err(format!("iban in body should match pattern, got {iban:?}"));
        }
    }
    if let Some(bank_id) = attrs.get("bank_id").and_then(Value::as_str) {
        if !is_valid_bank_id(bank_id) {
            return Err(format!("bank_id in body should match pattern, got {bank_id:?}"));
        }
    }

    Ok(AccountRecord {
        id,
        organisation_id,
        kind: input.kind,
        version: input.version.unwrap_or(0),
        attributes: input.attributes,
    })
}

/// Two letters, two digits, then uppercase alphanumerics.
fn is_valid_iban(iban: &str) -> bool {
    let bytes = iban.as_bytes();
    bytes.len() >= 4
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..]
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Up to 16 uppercase alphanumerics.
fn is_valid_bank_id(bank_id: &str) -> bool {
    bank_id.len() <= 16
        && bank_id
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
