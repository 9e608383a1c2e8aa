use std::{env, time::Duration};

use clap::Args;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_HTTP_PORT: u16 = 9926;
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Record 101 of the `Sensors` table.
pub const SENSOR_RESOURCE: &str = "Sensors/101";
/// Lowercase spelling used by the first-generation publisher and subscriber.
pub const LEGACY_SENSOR_RESOURCE: &str = "sensors/101";
/// The whole `Sensors` table, used by the WebSocket format probe.
pub const SENSOR_COLLECTION: &str = "Sensors/";

pub const PUBLISH_INTERVAL: Duration = Duration::from_secs(5);

pub const RETAIN_ENV: &str = "MQTT_RETAIN";

/// Where Harper lives. Flattened into every client's command line.
#[derive(Args, Debug, Clone)]
pub struct HarperArgs {
    /// Host running Harper.
    #[arg(long, env = "HARPER_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port of Harper's REST, WebSocket and SSE interface.
    #[arg(long, env = "HARPER_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub http_port: u16,

    /// Port of Harper's MQTT broker.
    #[arg(long, env = "HARPER_MQTT_PORT", default_value_t = DEFAULT_MQTT_PORT)]
    pub mqtt_port: u16,

    /// Resource path (table/record) to publish to or follow.
    #[arg(long, env = "HARPER_RESOURCE")]
    pub resource: Option<String>,
}

impl Default for HarperArgs {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mqtt_port: DEFAULT_MQTT_PORT,
            resource: None,
        }
    }
}

impl HarperArgs {
    /// The configured resource, or the client's own default.
    pub fn resource_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.resource.as_deref().unwrap_or(fallback)
    }

    pub fn resource(&self) -> &str {
        self.resource_or(SENSOR_RESOURCE)
    }

    pub fn http_url(&self, resource: &str) -> String {
        format!("http://{}:{}/{}", self.host, self.http_port, resource)
    }

    pub fn ws_url(&self, resource: &str) -> String {
        format!("ws://{}:{}/{}", self.host, self.http_port, resource)
    }

    pub fn mqtt_addr(&self) -> (&str, u16) {
        (&self.host, self.mqtt_port)
    }
}

/// Only an explicit `false` (any case) turns retain off.
pub fn parse_retain(value: Option<&str>) -> bool {
    !matches!(value, Some(flag) if flag.eq_ignore_ascii_case("false"))
}

pub fn retain_from_env() -> bool {
    parse_retain(env::var(RETAIN_ENV).ok().as_deref())
}
