// src/dispatch.rs
// Action ranking over a parsed analysis

use serde::Serialize;
use serde_json::Value;

/// Category rank; lower is more urgent
const SEVERITY: &[(&str, u8)] = &[("MEDICAL", 1), ("FIRE", 2), ("CRIME", 3)];

/// Rank for categories not in the table
const DEFAULT_SEVERITY: u8 = 4;

pub const PROCESSED: &str = "PROCESSED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    AutoDispatch,
    FirstAidGuidance,
    AlertMedicalContacts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub action_type: ActionKind,
    /// Severity category used for ordering
    #[serde(rename = "type")]
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
    /// Coordinates lifted from the analysis, `null` when it has none
    pub location: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPlan {
    pub status: &'static str,
    pub actions: Vec<Action>,
}

pub fn severity(category: &str) -> u8 {
    SEVERITY
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, rank)| *rank)
        .unwrap_or(DEFAULT_SEVERITY)
}

/// Stable: equal categories keep their relative order
pub fn sort_by_severity(actions: &mut [Action]) {
    actions.sort_by_key(|action| severity(&action.category));
}

/// Derive the prioritized action list for an analysis. Accepts either the
/// analysis object or the `{"analysis": {...}}` envelope the model returns.
/// Missing or mistyped keys are treated as absent.
pub fn rank_actions(input: &Value) -> DispatchPlan {
    let analysis = match input.get("analysis") {
        Some(inner) if inner.is_object() => inner,
        _ => input,
    };

    let location = analysis
        .get("location")
        .and_then(|loc| loc.get("coordinates"))
        .cloned()
        .unwrap_or(Value::Null);

    let mut actions = Vec::new();

    if analysis.get("risk_level").and_then(Value::as_str) == Some("CRITICAL") {
        actions.push(Action {
            action_type: ActionKind::AutoDispatch,
            category: emergency_type(analysis),
            services: Some(emergency_services(analysis)),
            location: location.clone(),
            keywords: Vec::new(),
            message: None,
        });
    }

    if let Some(raw_keywords) = analysis.get("medical_keywords") {
        let keywords = string_list(raw_keywords);
        actions.push(first_aid(&keywords, location.clone()));
        actions.push(alert_contacts(analysis, location));
    }

    sort_by_severity(&mut actions);

    DispatchPlan {
        status: PROCESSED,
        actions,
    }
}

fn emergency_type(analysis: &Value) -> String {
    analysis
        .get("emergency_type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .unwrap_or_else(|| "UNSPECIFIED".to_string())
}

/// `service_type` of every EMERGENCY_SERVICE entity, first occurrence wins
fn emergency_services(analysis: &Value) -> Vec<String> {
    let mut services: Vec<String> = Vec::new();
    let entities = analysis.get("entities").and_then(Value::as_array);

    for entity in entities.into_iter().flatten() {
        if entity.get("type").and_then(Value::as_str) != Some("EMERGENCY_SERVICE") {
            continue;
        }
        if let Some(service) = entity.get("service_type").and_then(Value::as_str)
            && !services.iter().any(|s| s == service)
        {
            services.push(service.to_string());
        }
    }

    services
}

/// A string or an array of strings; anything else is empty
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn first_aid(keywords: &[String], location: Value) -> Action {
    let message = if keywords.is_empty() {
        "Provide first aid guidance until responders arrive".to_string()
    } else {
        format!("Provide first aid guidance for: {}", keywords.join(", "))
    };

    Action {
        action_type: ActionKind::FirstAidGuidance,
        category: "MEDICAL".to_string(),
        services: None,
        location,
        keywords: keywords.to_vec(),
        message: Some(message),
    }
}

fn alert_contacts(analysis: &Value, location: Value) -> Action {
    let summary = ["summary", "understood_message"]
        .iter()
        .find_map(|key| analysis.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let message = match summary {
        Some(summary) => format!("Alert medical contacts: {}", summary),
        None => "Alert medical contacts about a possible medical emergency".to_string(),
    };

    Action {
        action_type: ActionKind::AlertMedicalContacts,
        category: "MEDICAL".to_string(),
        services: None,
        location,
        keywords: Vec::new(),
        message: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(category: &str, message: &str) -> Action {
        Action {
            action_type: ActionKind::AutoDispatch,
            category: category.to_string(),
            services: None,
            location: Value::Null,
            keywords: Vec::new(),
            message: Some(message.to_string()),
        }
    }

    // ============================================================================
    // Severity ordering
    // ============================================================================

    #[test]
    fn test_severity_table() {
        assert_eq!(severity("MEDICAL"), 1);
        assert_eq!(severity("FIRE"), 2);
        assert_eq!(severity("CRIME"), 3);
        assert_eq!(severity("FLOOD"), 4);
        assert_eq!(severity("medical"), 4);
    }

    #[test]
    fn test_sort_medical_fire_crime() {
        let mut actions = vec![action("FIRE", "f"), action("MEDICAL", "m"), action("CRIME", "c")];
        sort_by_severity(&mut actions);
        let order: Vec<&str> = actions.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(order, ["MEDICAL", "FIRE", "CRIME"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut actions = vec![
            action("OTHER", "first"),
            action("FLOOD", "second"),
            action("MEDICAL", "third"),
            action("OTHER", "fourth"),
        ];
        sort_by_severity(&mut actions);
        let messages: Vec<&str> = actions.iter().filter_map(|a| a.message.as_deref()).collect();
        assert_eq!(messages, ["third", "first", "second", "fourth"]);
    }

    // ============================================================================
    // Auto dispatch
    // ============================================================================

    #[test]
    fn test_services_deduplicated() {
        let plan = rank_actions(&json!({
            "risk_level": "CRITICAL",
            "entities": [
                {"type": "EMERGENCY_SERVICE", "service_type": "AMBULANCE"},
                {"type": "EMERGENCY_SERVICE", "service_type": "AMBULANCE"}
            ]
        }));
        assert_eq!(plan.status, "PROCESSED");
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].action_type, ActionKind::AutoDispatch);
        assert_eq!(plan.actions[0].services, Some(vec!["AMBULANCE".to_string()]));
    }

    #[test]
    fn test_services_keep_first_occurrence_order() {
        let plan = rank_actions(&json!({
            "risk_level": "CRITICAL",
            "entities": [
                {"type": "EMERGENCY_SERVICE", "service_type": "POLICE"},
                {"type": "PERSON", "service_type": "NOT_A_SERVICE"},
                {"type": "EMERGENCY_SERVICE", "service_type": "FIRE_DEPT"},
                {"type": "EMERGENCY_SERVICE", "service_type": "POLICE"},
                {"type": "EMERGENCY_SERVICE"}
            ]
        }));
        assert_eq!(
            plan.actions[0].services,
            Some(vec!["POLICE".to_string(), "FIRE_DEPT".to_string()])
        );
    }

    #[test]
    fn test_missing_nested_location_is_null() {
        let plan = rank_actions(&json!({"risk_level": "CRITICAL", "location": "downtown"}));
        assert_eq!(plan.actions[0].location, Value::Null);
        assert_eq!(plan.actions[0].services, Some(Vec::new()));
        assert_eq!(plan.actions[0].category, "UNSPECIFIED");

        let plan = rank_actions(&json!({"risk_level": "CRITICAL"}));
        assert_eq!(plan.actions[0].location, Value::Null);
    }

    #[test]
    fn test_location_and_type_lifted() {
        let plan = rank_actions(&json!({
            "risk_level": "CRITICAL",
            "emergency_type": "fire",
            "location": {"coordinates": [40.7, -74.0]}
        }));
        assert_eq!(plan.actions[0].location, json!([40.7, -74.0]));
        assert_eq!(plan.actions[0].category, "FIRE");
    }

    #[test]
    fn test_non_critical_has_no_dispatch() {
        assert!(rank_actions(&json!({"risk_level": "HIGH"})).actions.is_empty());
        assert!(rank_actions(&json!({"risk_level": 5})).actions.is_empty());
        assert!(rank_actions(&json!({})).actions.is_empty());
        assert!(rank_actions(&json!("not an object")).actions.is_empty());
    }

    // ============================================================================
    // Medical follow-ups
    // ============================================================================

    #[test]
    fn test_medical_keywords_add_two_actions() {
        let plan = rank_actions(&json!({
            "medical_keywords": ["bleeding", "unconscious"],
            "summary": "Person collapsed on the platform"
        }));
        assert_eq!(plan.actions.len(), 2);
        assert_eq!(plan.actions[0].action_type, ActionKind::FirstAidGuidance);
        assert_eq!(plan.actions[0].keywords, vec!["bleeding", "unconscious"]);
        assert_eq!(
            plan.actions[0].message.as_deref(),
            Some("Provide first aid guidance for: bleeding, unconscious")
        );
        assert_eq!(plan.actions[1].action_type, ActionKind::AlertMedicalContacts);
        assert_eq!(
            plan.actions[1].message.as_deref(),
            Some("Alert medical contacts: Person collapsed on the platform")
        );
    }

    #[test]
    fn test_medical_actions_precede_fire_dispatch() {
        let plan = rank_actions(&json!({
            "risk_level": "CRITICAL",
            "emergency_type": "FIRE",
            "medical_keywords": null
        }));
        let kinds: Vec<ActionKind> = plan.actions.iter().map(|a| a.action_type).collect();
        assert_eq!(
            kinds,
            [
                ActionKind::FirstAidGuidance,
                ActionKind::AlertMedicalContacts,
                ActionKind::AutoDispatch
            ]
        );
    }

    #[test]
    fn test_wrapped_analysis_is_unwrapped() {
        let plan = rank_actions(&json!({
            "analysis": {
                "risk_level": "CRITICAL",
                "entities": [{"type": "EMERGENCY_SERVICE", "service_type": "AMBULANCE"}]
            }
        }));
        assert_eq!(plan.actions.len(), 1);
    }

    #[test]
    fn test_plan_serialization() {
        let plan = rank_actions(&json!({
            "risk_level": "CRITICAL",
            "emergency_type": "MEDICAL",
            "entities": [{"type": "EMERGENCY_SERVICE", "service_type": "AMBULANCE"}]
        }));
        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({
                "status": "PROCESSED",
                "actions": [{
                    "action_type": "AUTO_DISPATCH",
                    "type": "MEDICAL",
                    "services": ["AMBULANCE"],
                    "location": null
                }]
            })
        );
    }
}
