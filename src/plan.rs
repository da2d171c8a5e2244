//! Schema-driven planning.
//!
//! Computes the planned state of a resource from its prior state and the
//! proposed configuration, listing the top-level attributes that change.

use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::schema::Schema;
use crate::types::{AttributeChange, PlanResult};

/// Plan a create, update or delete.
///
/// - Without prior state the resource is created: defaults are filled and
///   computed-only attributes are left unknown (`null`).
/// - With prior state and a `null` proposal the resource is deleted.
/// - Otherwise computed attributes are carried over from the prior state
///   and any change to a `force_new` attribute requires replacement.
pub fn plan(
    schema: &Schema,
    prior: Option<&Value>,
    proposed: &Value,
) -> Result<PlanResult, ProviderError> {
    match (prior, proposed) {
        (None, Value::Null) => Ok(PlanResult::no_change(Value::Null)),
        (Some(prior), Value::Null) => Ok(plan_delete(prior)),
        (None, proposed) => plan_create(schema, as_object(proposed)?),
        (Some(prior), proposed) => plan_update(schema, as_object(prior)?, as_object(proposed)?),
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ProviderError> {
    value
        .as_object()
        .ok_or_else(|| ProviderError::Validation("state must be an object".to_string()))
}

fn plan_create(
    schema: &Schema,
    proposed: &Map<String, Value>,
) -> Result<PlanResult, ProviderError> {
    let mut planned = proposed.clone();
    for (name, attr) in &schema.block.attributes {
        if attr.flags.is_computed_only() {
            planned.insert(name.clone(), Value::Null);
        }
    }
    apply_defaults(schema, &mut planned);

    let changes = sorted_keys(&planned)
        .into_iter()
        .filter_map(|key| match &planned[key] {
            Value::Null => None,
            value => Some(AttributeChange::added(key.clone(), value.clone())),
        })
        .collect();

    Ok(PlanResult::with_changes(Value::Object(planned), changes, false))
}

fn plan_update(
    schema: &Schema,
    prior: &Map<String, Value>,
    proposed: &Map<String, Value>,
) -> Result<PlanResult, ProviderError> {
    let mut planned = proposed.clone();
    for (name, attr) in &schema.block.attributes {
        if !attr.flags.computed {
            continue;
        }
        let unset = planned.get(name).map_or(true, Value::is_null);
        if attr.flags.is_computed_only() || (unset && attr.default.is_none()) {
            if let Some(value) = prior.get(name) {
                planned.insert(name.clone(), value.clone());
            }
        }
    }
    apply_defaults(schema, &mut planned);

    let mut changes = Vec::new();
    let mut requires_replace = false;
    let mut keys = sorted_keys(&planned);
    keys.extend(prior.keys().filter(|k| !planned.contains_key(*k)));
    keys.sort();

    for key in keys {
        let before = prior.get(key).cloned().unwrap_or(Value::Null);
        let after = planned.get(key).cloned().unwrap_or(Value::Null);
        if before == after {
            continue;
        }
        if schema.block.attributes.get(key).is_some_and(|a| a.force_new) {
            requires_replace = true;
        }
        changes.push(AttributeChange::modified(key.clone(), before, after));
    }

    Ok(PlanResult::with_changes(Value::Object(planned), changes, requires_replace))
}

fn plan_delete(prior: &Value) -> PlanResult {
    let changes = prior
        .as_object()
        .map(|obj| {
            sorted_keys(obj)
                .into_iter()
                .filter(|key| !obj[*key].is_null())
                .map(|key| AttributeChange::removed(key.clone(), obj[key].clone()))
                .collect()
        })
        .unwrap_or_default();
    PlanResult::with_changes(Value::Null, changes, false)
}

fn apply_defaults(schema: &Schema, planned: &mut Map<String, Value>) {
    for (name, attr) in &schema.block.attributes {
        if let Some(default) = &attr.default {
            let unset = planned.get(name).map_or(true, Value::is_null);
            if unset {
                planned.insert(name.clone(), default.clone());
            }
        }
    }
}

fn sorted_keys(map: &Map<String, Value>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;

    fn webhook_like() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("space_id", Attribute::required_int64().with_force_new())
            .with_attribute("name", Attribute::required_string())
            .with_attribute("activated", Attribute::optional_bool().with_default(json!(true)))
            .with_attribute("description", Attribute::optional_string())
    }

    #[test]
    fn test_plan_create_fills_defaults() {
        let result = plan(
            &webhook_like(),
            None,
            &json!({"space_id": 1, "name": "deploy", "id": "ignored"}),
        )
        .unwrap();

        assert_eq!(result.planned_state["activated"], json!(true));
        assert_eq!(result.planned_state["id"], Value::Null);
        let paths: Vec<_> = result.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["activated", "name", "space_id"]);
        assert!(!result.requires_replace);
    }

    #[test]
    fn test_plan_update_carries_computed() {
        let prior = json!({"id": "1/5", "space_id": 1, "name": "deploy", "activated": false});
        let proposed = json!({"space_id": 1, "name": "deploy", "activated": false});
        let result = plan(&webhook_like(), Some(&prior), &proposed).unwrap();

        assert_eq!(result.planned_state["id"], "1/5");
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_plan_update_resets_default_when_unset() {
        let prior = json!({"id": "1/5", "space_id": 1, "name": "deploy", "activated": false});
        let proposed = json!({"space_id": 1, "name": "deploy"});
        let result = plan(&webhook_like(), Some(&prior), &proposed).unwrap();

        assert_eq!(result.planned_state["activated"], json!(true));
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "activated");
    }

    #[test]
    fn test_plan_update_force_new() {
        let prior = json!({"id": "1/5", "space_id": 1, "name": "deploy", "activated": true});
        let proposed = json!({"space_id": 2, "name": "deploy", "activated": true});
        let result = plan(&webhook_like(), Some(&prior), &proposed).unwrap();

        assert!(result.requires_replace);
        assert_eq!(result.changes[0].path, "space_id");
    }

    #[test]
    fn test_plan_update_detects_removed_attribute() {
        let prior = json!({
            "id": "1/5", "space_id": 1, "name": "deploy", "activated": true, "description": "x"
        });
        let proposed = json!({"space_id": 1, "name": "deploy", "activated": true});
        let result = plan(&webhook_like(), Some(&prior), &proposed).unwrap();

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "description");
        assert_eq!(result.changes[0].after, Some(Value::Null));
    }

    #[test]
    fn test_plan_delete() {
        let prior = json!({"id": "1/5", "space_id": 1, "description": null});
        let result = plan(&webhook_like(), Some(&prior), &Value::Null).unwrap();

        assert_eq!(result.planned_state, Value::Null);
        let paths: Vec<_> = result.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["id", "space_id"]);
    }

    #[test]
    fn test_plan_rejects_non_object() {
        let err = plan(&webhook_like(), None, &json!([1])).unwrap_err();
        assert!(matches!(err, ProviderError::Validation(_)));
    }
}
