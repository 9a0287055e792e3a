use axum::body::Bytes;
use axum::extract::{Extension, RawPathParams};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::error;

use crate::SharedState;
use crate::api::require_path_variable;
use crate::error::AppError;
use crate::inventory::events::{
    DNS_ZONE_CREATED_EVENT, DNS_ZONE_REMOVED_EVENT, ELEMENT_DNS_RECORD_SET_MODIFIED_EVENT,
    RecordSetEventEnvelope, ZoneEventEnvelope,
};
use crate::powerdns::types::{PdnsRecord, PdnsRrset, PdnsZoneCreate};

/// Webhook listener for inventory events.
///
/// `POST /api/v1/events/{event_name}` — the event name in the path selects
/// how the body is decoded and which PowerDNS operation runs. Responds 204 on
/// success, 400 on a malformed body, 422 for an event name outside the
/// recognized set, and 500 when the provider call fails.
pub async fn inventory_event(
    Extension(state): Extension<SharedState>,
    params: RawPathParams,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let event_name = require_path_variable(&params, "event_name")?;
    match event_name.as_str() {
        ELEMENT_DNS_RECORD_SET_MODIFIED_EVENT => record_set_modified(&state, &body).await,
        DNS_ZONE_CREATED_EVENT => zone_created(&state, &body).await,
        DNS_ZONE_REMOVED_EVENT => zone_removed(&state, &body).await,
        other => Err(AppError::UnsupportedEvent(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|err| {
        error!("failed to decode event body: {err}");
        AppError::BadRequest(err.to_string())
    })
}

fn provider_error(err: anyhow::Error) -> AppError {
    error!("provider call failed: {err}");
    AppError::Provider(err)
}

async fn zone_created(state: &SharedState, body: &Bytes) -> Result<StatusCode, AppError> {
    let envelope: ZoneEventEnvelope = decode(body)?;
    let zone = PdnsZoneCreate {
        name: envelope.message.zone_name,
        kind: "Native".into(),
        nameservers: state.config.nameservers.clone(),
    };
    state
        .pdns
        .create_zone(&zone)
        .await
        .map_err(provider_error)?;

    Ok(StatusCode::NO_CONTENT)
}

async fn zone_removed(state: &SharedState, body: &Bytes) -> Result<StatusCode, AppError> {
    let envelope: ZoneEventEnvelope = decode(body)?;
    state
        .pdns
        .delete_zone(&envelope.message.zone_name)
        .await
        .map_err(provider_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A modification may withdraw a record set, assert one, or both. The
/// withdrawal runs first; if it fails, the assertion is not attempted.
async fn record_set_modified(state: &SharedState, body: &Bytes) -> Result<StatusCode, AppError> {
    let envelope: RecordSetEventEnvelope = decode(body)?;
    let record_set = envelope.message.record_set;

    if let Some(withdrawn_name) = &record_set.withdrawn_name {
        state
            .pdns
            .remove_record_set(&record_set.zone_name, withdrawn_name, &record_set.rrtype)
            .await
            .map_err(provider_error)?;
    }

    if let Some(name) = &record_set.name {
        let rrset = PdnsRrset {
            name: name.clone(),
            rrtype: record_set.rrtype.clone(),
            ttl: record_set.ttl,
            changetype: None,
            records: record_set
                .records
                .iter()
                .map(|record| PdnsRecord {
                    content: record.value.clone(),
                    disabled: record.disabled,
                    set_ptr: record.set_ptr,
                })
                .collect(),
        };
        state
            .pdns
            .add_record_set(&record_set.zone_name, rrset)
            .await
            .map_err(provider_error)?;
    }

    Ok(StatusCode::NO_CONTENT)
}
