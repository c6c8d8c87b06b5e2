//! Pipeline node configuration consumed by the converters.
//!
//! These types mirror the properties a Kapacitor `|alert()` node can carry.
//! They are plain data: the converter reads them and never mutates them.
//!
//! Every type deserializes from a partial document (missing keys take their
//! default), so an alert can be described in JSON:
//!
//! ```rust
//! use tickgen::pipeline::AlertNode;
//!
//! let alert: AlertNode = serde_json::from_str(r##"{
//!     "topic": "cpu",
//!     "crit": "\"usage_idle\" < 10",
//!     "slackHandlers": [{ "channel": "#alerts" }]
//! }"##).unwrap();
//!
//! assert_eq!(alert.topic, "cpu");
//! assert_eq!(alert.handlers().count(), 1);
//! ```

use crate::ast::Lambda;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of an alert node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertNode {
    /// Topic the alert events are published to.
    pub topic: String,
    /// Template for the alert ID.
    pub id: String,
    /// Template for the alert message.
    pub message: String,
    /// Template for the HTML details body.
    pub details: String,

    pub info: Option<Lambda>,
    pub warn: Option<Lambda>,
    pub crit: Option<Lambda>,
    pub info_reset: Option<Lambda>,
    pub warn_reset: Option<Lambda>,
    pub crit_reset: Option<Lambda>,

    /// Number of previous states kept for flapping detection.
    pub history: u64,

    pub level_tag: String,
    pub level_field: String,
    pub message_field: String,
    pub duration_field: String,
    pub id_tag: String,
    pub id_field: String,

    /// Alert on every point, not only on level changes.
    pub all: bool,
    /// Do not send recovery events.
    pub no_recoveries: bool,

    /// Only alert on state changes.
    pub state_changes_only: bool,
    /// Resend an unchanged state after this long. Zero never resends.
    pub state_changes_only_duration: Duration,

    pub use_flapping: bool,
    pub flap_low: f64,
    pub flap_high: f64,

    pub http_post_handlers: Vec<HttpPostHandler>,
    pub tcp_handlers: Vec<TcpHandler>,
    pub email_handlers: Vec<EmailHandler>,
    pub exec_handlers: Vec<ExecHandler>,
    pub log_handlers: Vec<LogHandler>,
    pub victor_ops_handlers: Vec<VictorOpsHandler>,
    pub pager_duty_handlers: Vec<PagerDutyHandler>,
    pub pushover_handlers: Vec<PushoverHandler>,
    pub sensu_handlers: Vec<SensuHandler>,
    pub slack_handlers: Vec<SlackHandler>,
    pub telegram_handlers: Vec<TelegramHandler>,
    pub hip_chat_handlers: Vec<HipChatHandler>,
    pub alerta_handlers: Vec<AlertaHandler>,
    pub ops_genie_handlers: Vec<OpsGenieHandler>,
    pub talk_handlers: Vec<TalkHandler>,
    pub mqtt_handlers: Vec<MqttHandler>,
    pub snmp_trap_handlers: Vec<SnmpTrapHandler>,
}

impl AlertNode {
    /// Every configured handler, grouped by kind in canonical order and in
    /// list order within a kind.
    pub fn handlers(&self) -> impl Iterator<Item = Handler<'_>> {
        let posts = self.http_post_handlers.iter().map(Handler::HttpPost);
        let tcps = self.tcp_handlers.iter().map(Handler::Tcp);
        let emails = self.email_handlers.iter().map(Handler::Email);
        let execs = self.exec_handlers.iter().map(Handler::Exec);
        let logs = self.log_handlers.iter().map(Handler::Log);
        let victor_ops = self.victor_ops_handlers.iter().map(Handler::VictorOps);
        let pager_duty = self.pager_duty_handlers.iter().map(Handler::PagerDuty);
        let pushover = self.pushover_handlers.iter().map(Handler::Pushover);
        let sensu = self.sensu_handlers.iter().map(Handler::Sensu);
        let slack = self.slack_handlers.iter().map(Handler::Slack);
        let telegram = self.telegram_handlers.iter().map(Handler::Telegram);
        let hip_chat = self.hip_chat_handlers.iter().map(Handler::HipChat);
        let alerta = self.alerta_handlers.iter().map(Handler::Alerta);
        let ops_genie = self.ops_genie_handlers.iter().map(Handler::OpsGenie);
        let talk = self.talk_handlers.iter().map(Handler::Talk);
        let mqtt = self.mqtt_handlers.iter().map(Handler::Mqtt);
        let snmp_trap = self.snmp_trap_handlers.iter().map(Handler::SnmpTrap);

        posts
            .chain(tcps)
            .chain(emails)
            .chain(execs)
            .chain(logs)
            .chain(victor_ops)
            .chain(pager_duty)
            .chain(pushover)
            .chain(sensu)
            .chain(slack)
            .chain(telegram)
            .chain(hip_chat)
            .chain(alerta)
            .chain(ops_genie)
            .chain(talk)
            .chain(mqtt)
            .chain(snmp_trap)
    }
}

/// A borrowed handler of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handler<'a> {
    HttpPost(&'a HttpPostHandler),
    Tcp(&'a TcpHandler),
    Email(&'a EmailHandler),
    Exec(&'a ExecHandler),
    Log(&'a LogHandler),
    VictorOps(&'a VictorOpsHandler),
    PagerDuty(&'a PagerDutyHandler),
    Pushover(&'a PushoverHandler),
    Sensu(&'a SensuHandler),
    Slack(&'a SlackHandler),
    Telegram(&'a TelegramHandler),
    HipChat(&'a HipChatHandler),
    Alerta(&'a AlertaHandler),
    OpsGenie(&'a OpsGenieHandler),
    Talk(&'a TalkHandler),
    Mqtt(&'a MqttHandler),
    SnmpTrap(&'a SnmpTrapHandler),
}

impl Handler<'_> {
    /// The TICKscript method that opens this handler.
    pub fn method(&self) -> &'static str {
        match self {
            Handler::HttpPost(_) => "post",
            Handler::Tcp(_) => "tcp",
            Handler::Email(_) => "email",
            Handler::Exec(_) => "exec",
            Handler::Log(_) => "log",
            Handler::VictorOps(_) => "victorOps",
            Handler::PagerDuty(_) => "pagerDuty",
            Handler::Pushover(_) => "pushover",
            Handler::Sensu(_) => "sensu",
            Handler::Slack(_) => "slack",
            Handler::Telegram(_) => "telegram",
            Handler::HipChat(_) => "hipChat",
            Handler::Alerta(_) => "alerta",
            Handler::OpsGenie(_) => "opsGenie",
            Handler::Talk(_) => "talk",
            Handler::Mqtt(_) => "mqtt",
            Handler::SnmpTrap(_) => "snmpTrap",
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST alert data to an HTTP endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpPostHandler {
    pub url: String,
    /// Named endpoint from the server configuration.
    pub endpoint: String,
    pub headers: IndexMap<String, String>,
}

/// Send alert data to a TCP address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpHandler {
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailHandler {
    pub to_list: Vec<String>,
}

/// Run a command with the alert data on stdin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecHandler {
    /// Program followed by its arguments.
    pub command: Vec<String>,
}

/// Append alert data to a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogHandler {
    pub file_path: String,
    /// Permission bits used when the file is created.
    pub mode: u32,
}

impl Default for LogHandler {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            mode: 0o600,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VictorOpsHandler {
    pub routing_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagerDutyHandler {
    pub service_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PushoverHandler {
    pub user_key: String,
    pub device: String,
    pub title: String,
    pub url: String,
    pub url_title: String,
    pub sound: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensuHandler {
    pub source: String,
    pub handlers_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlackHandler {
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelegramHandler {
    pub chat_id: String,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HipChatHandler {
    pub room: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertaHandler {
    pub token: String,
    pub resource: String,
    pub event: String,
    pub environment: String,
    pub group: String,
    pub value: String,
    pub origin: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpsGenieHandler {
    pub teams_list: Vec<String>,
    pub recipients_list: Vec<String>,
}

/// Talk has no options of its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalkHandler {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MqttHandler {
    pub broker_name: String,
    pub topic: String,
    pub qos: u8,
    pub retained: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnmpTrapHandler {
    pub trap_oid: String,
    pub data_list: Vec<SnmpData>,
}

/// One variable binding sent with an SNMP trap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnmpData {
    pub oid: String,
    /// SNMP type code, e.g. `i` for integer or `s` for string.
    #[serde(rename = "type")]
    pub data_type: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_follow_canonical_kind_order() {
        let alert = AlertNode {
            snmp_trap_handlers: vec![SnmpTrapHandler::default()],
            email_handlers: vec![EmailHandler::default()],
            talk_handlers: vec![TalkHandler {}, TalkHandler {}],
            http_post_handlers: vec![HttpPostHandler::default()],
            ..Default::default()
        };

        let methods: Vec<_> = alert.handlers().map(|h| h.method()).collect();
        assert_eq!(methods, ["post", "email", "talk", "talk", "snmpTrap"]);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let alert: AlertNode = serde_json::from_str(
            r#"{
                "idField": "alert_id",
                "logHandlers": [{ "filePath": "/tmp/alerts.log" }],
                "snmpTrapHandlers": [{
                    "trapOid": "1.3.6.1.4.1.1",
                    "dataList": [{ "oid": "1.3.6.1.4.1.1.5", "type": "s", "value": "{{ .Level }}" }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(alert.id_field, "alert_id");
        assert!(alert.crit.is_none());
        assert_eq!(alert.log_handlers[0].mode, 0o600);
        assert_eq!(alert.snmp_trap_handlers[0].data_list[0].data_type, "s");
    }

    #[test]
    fn test_headers_keep_insertion_order() {
        let handler: HttpPostHandler =
            serde_json::from_str(r#"{ "url": "http://x", "headers": { "b": "1", "a": "2" } }"#)
                .unwrap();
        let keys: Vec<_> = handler.headers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
