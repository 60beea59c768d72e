//! Mapping of rented GPU instances onto team chat endpoints.
//!
//! Only the parsing and assignment live here; fetching the listing is the
//! server's job.

use crate::types::Team;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceList {
    #[serde(default)]
    pub instances: Vec<Instance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub actual_status: Option<String>,
    #[serde(default)]
    pub public_ipaddr: Option<String>,
    /// Docker-style port map, e.g. `{"7500/tcp": [{"HostIp": "0.0.0.0", "HostPort": "41022"}]}`.
    #[serde(default)]
    pub ports: HashMap<String, Value>,
}

impl Instance {
    pub fn is_running(&self) -> bool {
        self.actual_status.as_deref() == Some("running")
    }

    /// Public port mapped to `container_port`, if the listing has one.
    pub fn host_port(&self, container_port: u16) -> Option<u16> {
        let mapping = self.ports.get(&format!("{container_port}/tcp"))?;
        let port = match mapping {
            Value::Array(bindings) => bindings.first()?.get("HostPort")?,
            other => other,
        };
        match port {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            _ => None,
        }
    }

    pub fn public_ip(&self) -> Option<&str> {
        self.public_ipaddr
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }
}

/// Assign the first three running instances to teams in team order.
///
/// An instance without a public address leaves its team unassigned rather
/// than shifting later instances up. Without a published mapping the
/// container port itself is used.
pub fn assign_instances(instances: &[Instance], container_port: u16) -> Vec<(Team, String)> {
    instances
        .iter()
        .filter(|i| i.is_running())
        .zip(Team::all())
        .filter_map(|(instance, team)| {
            let ip = instance.public_ip()?;
            let port = instance.host_port(container_port).unwrap_or(container_port);
            Some((*team, format!("http://{ip}:{port}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<Instance> {
        serde_json::from_str::<InstanceList>(json).unwrap().instances
    }

    #[test]
    fn maps_running_instances_in_order() {
        let instances = parse(
            r#"{"instances": [
                {"id": 1, "actual_status": "exited", "public_ipaddr": "10.0.0.9"},
                {"id": 2, "actual_status": "running", "public_ipaddr": "10.0.0.1",
                 "ports": {"7500/tcp": [{"HostIp": "0.0.0.0", "HostPort": "41022"}]}},
                {"id": 3, "actual_status": "running", "public_ipaddr": "10.0.0.2\n"},
                {"id": 4, "actual_status": "running", "public_ipaddr": "10.0.0.3",
                 "ports": {"7500/tcp": 40001}},
                {"id": 5, "actual_status": "running", "public_ipaddr": "10.0.0.4"}
            ]}"#,
        );
        let assigned = assign_instances(&instances, 7500);
        assert_eq!(
            assigned,
            [
                (Team::Usa, "http://10.0.0.1:41022".to_string()),
                (Team::China, "http://10.0.0.2:7500".to_string()),
                (Team::Neutral, "http://10.0.0.3:40001".to_string()),
            ]
        );
    }

    #[test]
    fn missing_ip_leaves_team_unassigned() {
        let instances = parse(
            r#"{"instances": [
                {"actual_status": "running"},
                {"actual_status": "running", "public_ipaddr": "10.0.0.2"}
            ]}"#,
        );
        let assigned = assign_instances(&instances, 7500);
        assert_eq!(assigned, [(Team::China, "http://10.0.0.2:7500".to_string())]);
    }

    #[test]
    fn empty_listing_assigns_nothing() {
        assert!(assign_instances(&parse("{}"), 7500).is_empty());
    }

    #[test]
    fn garbage_port_falls_back_to_container_port() {
        let instances = parse(
            r#"{"instances": [{"actual_status": "running", "public_ipaddr": "1.2.3.4",
                "ports": {"7500/tcp": [{"HostPort": "not-a-port"}]}}]}"#,
        );
        assert_eq!(
            assign_instances(&instances, 7500),
            [(Team::Usa, "http://1.2.3.4:7500".to_string())]
        );
    }
}
