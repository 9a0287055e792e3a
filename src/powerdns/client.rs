use crate::powerdns::types::*;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Bounded timeout for every PowerDNS API call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
    server_id: String, // usually "localhost"
}

impl PowerDnsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        server_id: impl Into<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            server_id: server_id.into(),
        })
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/servers/{}/{}",
            self.base_url,
            self.server_id,
            path.trim_start_matches('/')
        )
    }

    pub async fn create_zone(&self, z: &PdnsZoneCreate) -> anyhow::Result<()> {
        let url = self.url("zones");
        let res = self.auth_header(self.http.post(url)).json(z).send().await?;
        if !res.status().is_success() {
            anyhow::bail!("PowerDNS create_zone failed with {}", res.status());
        }
        Ok(())
    }

    pub async fn delete_zone(&self, name: &str) -> anyhow::Result<()> {
        let url = self.url(&format!("zones/{}", name));
        let res = self.auth_header(self.http.delete(url)).send().await?;
        if !res.status().is_success() {
            anyhow::bail!("PowerDNS delete_zone failed with {}", res.status());
        }
        Ok(())
    }

    /// Adds the record set to the zone, replacing any set of the same
    /// name and type.
    pub async fn add_record_set(&self, zone_name: &str, mut rrset: PdnsRrset) -> anyhow::Result<()> {
        rrset.changetype = Some(CHANGETYPE_REPLACE.into());
        self.patch_rrsets(zone_name, &[rrset])
            .await
            .map_err(|e| anyhow::anyhow!("PowerDNS add_record_set failed with {}", e))
    }

    /// Withdraws the record set identified by name and type from the zone.
    pub async fn remove_record_set(
        &self,
        zone_name: &str,
        name: &str,
        rrtype: &str,
    ) -> anyhow::Result<()> {
        let rrset = PdnsRrset {
            name: name.into(),
            rrtype: rrtype.into(),
            ttl: 0,
            changetype: Some(CHANGETYPE_DELETE.into()),
            records: Vec::new(),
        };
        self.patch_rrsets(zone_name, &[rrset])
            .await
            .map_err(|e| anyhow::anyhow!("PowerDNS remove_record_set failed with {}", e))
    }

    async fn patch_rrsets(&self, zone_name: &str, rrsets: &[PdnsRrset]) -> anyhow::Result<()> {
        #[derive(Serialize)]
        struct PatchBody<'a> {
            rrsets: &'a [PdnsRrset],
        }

        let url = self.url(&format!("zones/{}", zone_name));
        let body = PatchBody { rrsets };
        let res = self
            .auth_header(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            anyhow::bail!("{}", res.status());
        }
        Ok(())
    }
}
