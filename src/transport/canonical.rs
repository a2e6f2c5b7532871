use std::collections::BTreeMap;

use super::encoding::percent_encode;
use super::{query_send_details, send_sms};
use crate::domain::{AccessKeyId, Action, Format, SignatureNonce, SystemParams, Timestamp};

const SIGNATURE_METHOD_FIELD: &str = "SignatureMethod";
const SIGNATURE_VERSION_FIELD: &str = "SignatureVersion";
pub(crate) const ACTION_FIELD: &str = "Action";
pub(crate) const VERSION_FIELD: &str = "Version";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Always,
    /// Dropped when the rendered value is empty.
    OmitEmpty,
}

/// One row of a per-action parameter table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryField {
    name: &'static str,
    value: String,
    inclusion: Inclusion,
}

impl QueryField {
    pub fn always(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            inclusion: Inclusion::Always,
        }
    }

    /// `None` and the empty string both count as unset.
    pub fn omit_empty(name: &'static str, value: Option<String>) -> Self {
        Self {
            name,
            value: value.unwrap_or_default(),
            inclusion: Inclusion::OmitEmpty,
        }
    }

    #[cfg(test)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[cfg(test)]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn is_included(&self) -> bool {
        self.inclusion == Inclusion::Always || !self.value.is_empty()
    }
}

/// System and business parameters merged and sorted by name.
///
/// `Signature` is never part of this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    params: BTreeMap<&'static str, String>,
}

impl CanonicalQuery {
    pub fn build(system: &SystemParams, action: &Action) -> Self {
        let business = match action {
            Action::SendSms(request) => send_sms::query_fields(request),
            Action::QuerySendDetails(request) => query_send_details::query_fields(request),
        };

        let params = system_fields(system)
            .into_iter()
            .chain(business)
            .filter(QueryField::is_included)
            .map(|field| (field.name, field.value))
            .collect();

        Self { params }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.keys().copied()
    }

    /// `name=value` pairs, each side escaped independently, joined by `&` in name order.
    pub fn encode(&self) -> String {
        self.params
            .iter()
            .map(|(name, value)| format!("{}={}", percent_encode(name), percent_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn system_fields(system: &SystemParams) -> Vec<QueryField> {
    vec![
        QueryField::always(AccessKeyId::FIELD, system.access_key_id.as_str()),
        QueryField::always(Timestamp::FIELD, system.timestamp.to_wire()),
        QueryField::omit_empty(
            Format::FIELD,
            system.format.map(|format| format.as_str().to_owned()),
        ),
        QueryField::always(SIGNATURE_METHOD_FIELD, system.signature_method()),
        QueryField::always(SIGNATURE_VERSION_FIELD, system.signature_version()),
        QueryField::always(SignatureNonce::FIELD, system.signature_nonce.to_wire()),
    ]
}
