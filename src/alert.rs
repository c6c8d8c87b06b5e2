//! Convert an [`AlertNode`] into its TICKscript chain.
//!
//! The output is `|alert()` followed by one property call per populated
//! field, then one block of calls per handler. Order is fixed:
//!
//! 1. `topic`, `id`, `message`, `details`, `info`, `warn`, `crit`,
//!    `infoReset`, `warnReset`, `critReset`, `history`, `levelTag`,
//!    `levelField`, `messageField`, `durationField`, `idTag`, `idField`
//! 2. `all`, `noRecoveries`
//! 3. `stateChangesOnly`
//! 4. `flapping`
//! 5. handlers, by kind in the order of [`AlertNode::handlers`]
//!
//! # Example
//!
//! ```rust
//! use tickgen::alert::convert_alert;
//! use tickgen::ast::{Lambda, Node};
//! use tickgen::pipeline::{AlertNode, EmailHandler};
//!
//! let alert = AlertNode {
//!     crit: Some(Lambda::new("\"usage_idle\" < 10")),
//!     email_handlers: vec![EmailHandler { to_list: vec!["oncall@example.com".into()] }],
//!     ..Default::default()
//! };
//!
//! let node = convert_alert(Node::identifier("stream"), &alert).unwrap();
//! assert_eq!(node.call_names(), ["alert", "crit", "email", "to"]);
//! ```

use crate::ast::{Node, NumberLiteral};
use crate::builder::ChainBuilder;
use crate::error::Result;
use crate::pipeline::{
    AlertNode, AlertaHandler, Handler, HttpPostHandler, MqttHandler, PushoverHandler,
    SensuHandler, SlackHandler, SnmpTrapHandler, TelegramHandler,
};

/// Builds the `|alert()` chain on top of a parent node.
#[derive(Debug)]
pub struct AlertConverter {
    b: ChainBuilder,
}

impl AlertConverter {
    /// Anchor the alert on `parent`, the node the alert is piped from.
    pub fn new(parent: Node) -> Self {
        Self {
            b: ChainBuilder::new(parent),
        }
    }

    /// Emit the alert chain for `a`.
    pub fn build(mut self, a: &AlertNode) -> Result<Node> {
        let span = tracing::debug_span!("alert", topic = %a.topic);
        let _enter = span.enter();

        self.b
            .pipe("alert", [])
            .dot("topic", [(&a.topic).into()])
            .dot("id", [(&a.id).into()])
            .dot("message", [(&a.message).into()])
            .dot("details", [(&a.details).into()])
            .dot("info", [a.info.as_ref().into()])
            .dot("warn", [a.warn.as_ref().into()])
            .dot("crit", [a.crit.as_ref().into()])
            .dot("infoReset", [a.info_reset.as_ref().into()])
            .dot("warnReset", [a.warn_reset.as_ref().into()])
            .dot("critReset", [a.crit_reset.as_ref().into()])
            .dot("history", [a.history.into()])
            .dot("levelTag", [(&a.level_tag).into()])
            .dot("levelField", [(&a.level_field).into()])
            .dot("messageField", [(&a.message_field).into()])
            .dot("durationField", [(&a.duration_field).into()])
            .dot("idTag", [(&a.id_tag).into()])
            .dot("idField", [(&a.id_field).into()])
            .dot_if("all", a.all, [])
            .dot_if("noRecoveries", a.no_recoveries, []);

        if a.state_changes_only {
            if a.state_changes_only_duration.is_zero() {
                self.b.dot("stateChangesOnly", []);
            } else {
                self.b
                    .dot("stateChangesOnly", [a.state_changes_only_duration.into()]);
            }
        }

        if a.use_flapping {
            self.b
                .dot_zero_value_ok("flapping", [a.flap_low.into(), a.flap_high.into()]);
        }

        let mut count = 0usize;
        for handler in a.handlers() {
            self.handler(handler);
            count += 1;
        }
        tracing::debug!(handlers = count, "converted alert");

        self.b.finish()
    }

    fn handler(&mut self, handler: Handler<'_>) {
        let open = handler.method();
        match handler {
            Handler::HttpPost(h) => self.http_post(open, h),
            Handler::Tcp(h) => {
                self.b.dot(open, []).dot("address", [(&h.address).into()]);
            }
            Handler::Email(h) => {
                self.b.dot(open, []);
                for to in &h.to_list {
                    self.b.dot("to", [to.into()]);
                }
            }
            Handler::Exec(h) => {
                self.b.dot(open, [(&h.command).into()]);
            }
            Handler::Log(h) => {
                self.b
                    .dot(open, [(&h.file_path).into()])
                    .dot("mode", [NumberLiteral::octal(i64::from(h.mode)).into()]);
            }
            Handler::VictorOps(h) => {
                self.b
                    .dot(open, [])
                    .dot("routingKey", [(&h.routing_key).into()]);
            }
            Handler::PagerDuty(h) => {
                self.b
                    .dot(open, [])
                    .dot("serviceKey", [(&h.service_key).into()]);
            }
            Handler::Pushover(h) => self.pushover(open, h),
            Handler::Sensu(h) => self.sensu(open, h),
            Handler::Slack(h) => self.slack(open, h),
            Handler::Telegram(h) => self.telegram(open, h),
            Handler::HipChat(h) => {
                self.b
                    .dot(open, [])
                    .dot("room", [(&h.room).into()])
                    .dot("token", [(&h.token).into()]);
            }
            Handler::Alerta(h) => self.alerta(open, h),
            Handler::OpsGenie(h) => {
                self.b
                    .dot(open, [])
                    .dot("teams", [(&h.teams_list).into()])
                    .dot("recipients", [(&h.recipients_list).into()]);
            }
            Handler::Talk(_) => {
                self.b.dot(open, []);
            }
            Handler::Mqtt(h) => self.mqtt(open, h),
            Handler::SnmpTrap(h) => self.snmp_trap(open, h),
        }
    }

    fn http_post(&mut self, open: &str, h: &HttpPostHandler) {
        self.b
            .dot(open, [(&h.url).into()])
            .dot("endpoint", [(&h.endpoint).into()]);
        for (key, value) in &h.headers {
            self.b.dot("header", [key.into(), value.into()]);
        }
    }

    fn pushover(&mut self, open: &str, h: &PushoverHandler) {
        self.b
            .dot(open, [])
            .dot("userKey", [(&h.user_key).into()])
            .dot("device", [(&h.device).into()])
            .dot("title", [(&h.title).into()])
            .dot("url", [(&h.url).into()])
            .dot("urlTitle", [(&h.url_title).into()])
            .dot("sound", [(&h.sound).into()]);
    }

    fn sensu(&mut self, open: &str, h: &SensuHandler) {
        self.b
            .dot(open, [])
            .dot("source", [(&h.source).into()])
            .dot("handlers", [(&h.handlers_list).into()]);
    }

    fn slack(&mut self, open: &str, h: &SlackHandler) {
        self.b
            .dot(open, [])
            .dot("channel", [(&h.channel).into()])
            .dot("username", [(&h.username).into()])
            .dot("iconEmoji", [(&h.icon_emoji).into()]);
    }

    fn telegram(&mut self, open: &str, h: &TelegramHandler) {
        self.b
            .dot(open, [])
            .dot("chatId", [(&h.chat_id).into()])
            .dot("parseMode", [(&h.parse_mode).into()])
            .dot_if("disableWebPagePreview", h.disable_web_page_preview, [])
            .dot_if("disableNotification", h.disable_notification, []);
    }

    fn alerta(&mut self, open: &str, h: &AlertaHandler) {
        self.b
            .dot(open, [])
            .dot("token", [(&h.token).into()])
            .dot("resource", [(&h.resource).into()])
            .dot("event", [(&h.event).into()])
            .dot("environment", [(&h.environment).into()])
            .dot("group", [(&h.group).into()])
            .dot("value", [(&h.value).into()])
            .dot("origin", [(&h.origin).into()])
            .dot("services", [(&h.services).into()]);
    }

    fn mqtt(&mut self, open: &str, h: &MqttHandler) {
        self.b
            .dot(open, [])
            .dot("brokerName", [(&h.broker_name).into()])
            .dot("topic", [(&h.topic).into()])
            .dot("qos", [h.qos.into()])
            .dot("retained", [h.retained.into()]);
    }

    fn snmp_trap(&mut self, open: &str, h: &SnmpTrapHandler) {
        self.b.dot(open, [(&h.trap_oid).into()]);
        for d in &h.data_list {
            self.b
                .dot("data", [(&d.oid).into(), (&d.data_type).into(), (&d.value).into()]);
        }
    }
}

/// Convert `alert` into a chain hanging off `parent`.
pub fn convert_alert(parent: Node, alert: &AlertNode) -> Result<Node> {
    AlertConverter::new(parent).build(alert)
}
