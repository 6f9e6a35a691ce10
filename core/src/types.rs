//! Account resource model and its JSON envelope.
//!
//! # Design
//! Every payload travels as `{"data": {...}}`. Unset fields are omitted on the
//! wire rather than sent as `null`: `Option`s are skipped when `None`, and
//! plain strings and lists are skipped when empty and default to empty when
//! missing, so decoding an encoded account yields the same value.
//!
//! Field order matches the API's canonical JSON, so `encode` output is stable.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Top-level envelope for account requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AccountData>,
}

impl Account {
    pub fn with_data(mut self, data: AccountData) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize to the wire envelope.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(ApiError::Encode)
    }

    /// Parse the wire envelope.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(ApiError::Decode)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AccountAttributes>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organisation_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Optimistic-concurrency version, assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

impl AccountData {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_organisation_id(mut self, organisation_id: impl Into<String>) -> Self {
        self.organisation_id = organisation_id.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_attributes(mut self, attributes: AccountAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_classification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_matching_opt_out: Option<bool>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bank_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bank_id_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_currency: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub iban: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joint_account: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secondary_identification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switched: Option<bool>,
}

impl AccountAttributes {
    pub fn with_account_classification(mut self, value: impl Into<String>) -> Self {
        self.account_classification = Some(value.into());
        self
    }

    pub fn with_account_matching_opt_out(mut self, value: bool) -> Self {
        self.account_matching_opt_out = Some(value);
        self
    }

    pub fn with_account_number(mut self, value: impl Into<String>) -> Self {
        self.account_number = value.into();
        self
    }

    pub fn with_alternative_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternative_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bank_id(mut self, value: impl Into<String>) -> Self {
        self.bank_id = value.into();
        self
    }

    pub fn with_bank_id_code(mut self, value: impl Into<String>) -> Self {
        self.bank_id_code = value.into();
        self
    }

    pub fn with_base_currency(mut self, value: impl Into<String>) -> Self {
        self.base_currency = value.into();
        self
    }

    pub fn with_bic(mut self, value: impl Into<String>) -> Self {
        self.bic = value.into();
        self
    }

    pub fn with_country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    pub fn with_iban(mut self, value: impl Into<String>) -> Self {
        self.iban = value.into();
        self
    }

    pub fn with_joint_account(mut self, value: bool) -> Self {
        self.joint_account = Some(value);
        self
    }

    pub fn with_name<I, S>(mut self, name: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name = name.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_secondary_identification(mut self, value: impl Into<String>) -> Self {
        self.secondary_identification = value.into();
        self
    }

    pub fn with_status(mut self, value: impl Into<String>) -> Self {
        self.status = Some(value.into());
        self
    }

    pub fn with_switched(mut self, value: bool) -> Self {
        self.switched = Some(value);
        self
    }
}
