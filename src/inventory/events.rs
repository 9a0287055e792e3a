use serde::Deserialize;

/// The closed set of inventory event kinds this connector understands.
pub const ELEMENT_DNS_RECORD_SET_MODIFIED_EVENT: &str = "ElementDnsRecordSetModifiedEvent";
pub const DNS_ZONE_CREATED_EVENT: &str = "DnsZoneCreatedEvent";
pub const DNS_ZONE_REMOVED_EVENT: &str = "DnsZoneRemovedEvent";

/// Envelope around a zone created/removed event. The inventory wraps every
/// event payload in a `message` object; the outer envelope metadata
/// (event id, topic, timestamps) is not needed here and left undeclared.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ZoneEventEnvelope {
    pub message: ZoneEvent,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ZoneEvent {
    #[serde(rename = "dns_zone_name")]
    pub zone_name: String,
    #[serde(rename = "dns_zone_id")]
    pub zone_id: String,
}

/// Envelope around a record-set modification event.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RecordSetEventEnvelope {
    pub message: RecordSetEvent,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RecordSetEvent {
    #[serde(rename = "dns_recordset")]
    pub record_set: RecordSet,
}

/// A record-set change. `withdrawn_name` and `name` are independent: either,
/// both, or neither may be present, and each present field triggers its own
/// provider call (remove before add).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RecordSet {
    #[serde(rename = "dns_zone_name")]
    pub zone_name: String,
    #[serde(rename = "dns_name")]
    pub name: Option<String>,
    #[serde(rename = "dns_withdrawn_name")]
    pub withdrawn_name: Option<String>,
    #[serde(rename = "dns_type")]
    pub rrtype: String,
    #[serde(rename = "dns_ttl")]
    pub ttl: u32,
    #[serde(rename = "dns_records")]
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Record {
    pub disabled: bool,
    #[serde(rename = "dns_setptr")]
    pub set_ptr: bool,
    #[serde(rename = "dns_value")]
    pub value: String,
}
