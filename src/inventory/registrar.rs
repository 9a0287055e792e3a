use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::inventory::events::{
    DNS_ZONE_CREATED_EVENT, DNS_ZONE_REMOVED_EVENT, ELEMENT_DNS_RECORD_SET_MODIFIED_EVENT,
};

/// How often the subscription is re-asserted with the inventory.
pub const RE_REGISTRATION_INTERVAL: Duration = Duration::from_secs(60);

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook subscription record sent to the inventory.
#[derive(Debug, Serialize)]
pub struct WebHookRegistration {
    pub hook_id: String,
    pub hook_name: String,
    pub description: String,
    pub topic_name: String,
    pub selector: String,
    pub endpoint: String,
    pub batch_sizes: u32,
    pub method: String,
}

/// Periodically re-registers this connector as a webhook consumer.
///
/// Registration is fire-and-log: a failed attempt is abandoned until the next
/// tick. The last observed response status is kept so that only a status
/// change logs the response body.
pub struct InventoryRegistrar {
    http: Client,
    config: Config,
    last_status: Option<StatusCode>,
}

impl InventoryRegistrar {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            http: Client::builder().timeout(HTTP_TIMEOUT).build()?,
            config,
            last_status: None,
        })
    }

    /// Registers once immediately, then on every tick until cancelled.
    /// Cancellation races the tick and wins without waiting it out.
    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(RE_REGISTRATION_INTERVAL);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.register().await,
                _ = shutdown.cancelled() => {
                    info!("webhook registrar stopped");
                    return;
                }
            }
        }
    }

    fn registration(&self) -> WebHookRegistration {
        WebHookRegistration {
            hook_id: self.config.web_hook_id.clone(),
            hook_name: "powerdns".into(),
            description: "Forward DNS changes to PowerDNS connector.".into(),
            topic_name: "element".into(),
            selector: format!(
                "{}|{}|{}",
                ELEMENT_DNS_RECORD_SET_MODIFIED_EVENT,
                DNS_ZONE_CREATED_EVENT,
                DNS_ZONE_REMOVED_EVENT
            ),
            endpoint: format!("{}/api/v1/events/{{{{event_name}}}}", self.config.external_url),
            batch_sizes: 1,
            method: "POST".into(),
        }
    }

    async fn register(&mut self) {
        let url = format!(
            "{}/webhooks/{}",
            self.config.inventory_url, self.config.web_hook_id
        );

        let mut request = self
            .http
            .put(url)
            .header("Accept", "application/json")
            .json(&self.registration());
        if !self.config.inventory_authorization_header.is_empty() {
            request = request.header(
                "Authorization",
                &self.config.inventory_authorization_header,
            );
        }

        // Transport errors leave the stored status untouched, so a flapping
        // network does not double-log on recovery.
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("webhook registration request failed: {err}");
                return;
            }
        };

        let status = response.status();
        if self.last_status != Some(status) {
            let body = response.text().await.unwrap_or_default();
            info!(%status, body, "webhook registration response changed");
        }
        self.last_status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(inventory_url: &str) -> Config {
        Config {
            web_hook_id: "hook-1".into(),
            inventory_url: inventory_url.into(),
            inventory_authorization_header: "Bearer token".into(),
            external_url: "http://connector.local".into(),
            powerdns_url: "http://127.0.0.1:8081/api/v1".into(),
            powerdns_api_key: String::new(),
            powerdns_server_id: "localhost".into(),
            nameservers: vec!["ns1.example.net.".into()],
        }
    }

    #[tokio::test]
    async fn registration_sends_full_subscription_payload() {
        let server = MockServer::start().await;

        let expected = serde_json::json!({
            "hook_id": "hook-1",
            "hook_name": "powerdns",
            "description": "Forward DNS changes to PowerDNS connector.",
            "topic_name": "element",
            "selector": "ElementDnsRecordSetModifiedEvent|DnsZoneCreatedEvent|DnsZoneRemovedEvent",
            "endpoint": "http://connector.local/api/v1/events/{{event_name}}",
            "batch_sizes": 1,
            "method": "POST",
        });

        Mock::given(method("PUT"))
            .and(path("/webhooks/hook-1"))
            .and(header("Authorization", "Bearer token"))
            .and(body_json(&expected))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut registrar =
            InventoryRegistrar::new(test_config(&server.uri())).expect("registrar");
        registrar.register().await;

        assert_eq!(registrar.last_status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn stored_status_tracks_response_changes() {
        let server = MockServer::start().await;

        // first attempt is rejected, later ones accepted
        Mock::given(method("PUT"))
            .and(path("/webhooks/hook-1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/webhooks/hook-1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut registrar =
            InventoryRegistrar::new(test_config(&server.uri())).expect("registrar");

        registrar.register().await;
        assert_eq!(registrar.last_status, Some(StatusCode::SERVICE_UNAVAILABLE));

        registrar.register().await;
        assert_eq!(registrar.last_status, Some(StatusCode::OK));

        registrar.register().await;
        assert_eq!(registrar.last_status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn transport_failure_keeps_stored_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut registrar =
            InventoryRegistrar::new(test_config(&server.uri())).expect("registrar");
        registrar.register().await;
        assert_eq!(registrar.last_status, Some(StatusCode::OK));

        // point at a closed port; the send fails before any response
        registrar.config.inventory_url = "http://127.0.0.1:1".into();
        registrar.register().await;
        assert_eq!(registrar.last_status, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn run_exits_promptly_on_cancellation() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let registrar = InventoryRegistrar::new(test_config(&server.uri())).expect("registrar");
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(registrar.run(shutdown.clone()));

        // give the startup registration a moment, then cancel
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("registrar did not stop after cancellation")
            .expect("registrar task panicked");
    }
}
