use serde::{Deserialize, Serialize};

/// Changetype for rrset patches: add or replace the whole set.
pub const CHANGETYPE_REPLACE: &str = "REPLACE";
/// Changetype for rrset patches: withdraw the whole set.
pub const CHANGETYPE_DELETE: &str = "DELETE";

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    pub ttl: u32,
    pub changetype: Option<String>, // "REPLACE" / "DELETE" when patching
    pub records: Vec<PdnsRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
    #[serde(rename = "set-ptr", default)]
    pub set_ptr: bool,
}

// Used when creating a zone
#[derive(Debug, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String,             // "sub.example.com."
    pub kind: String,             // "Native"
    pub nameservers: Vec<String>, // ["ns1.example.net.", "ns2.example.net."]
}
