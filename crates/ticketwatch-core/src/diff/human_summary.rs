//! Human-readable rendering of a comparison.
//!
//! Produces the console report an operator sees after each delivery:
//!
//! ```text
//! CHANGES DETECTED in Ticket T1:
//!    status: 'open' → 'closed'
//! ```

use crate::diff::model::{ChangeSet, Comparison};
use serde_json::Value;

/// Render a comparison for one ticket as plain text.
///
/// Output is deterministic: fields appear in name order.
pub fn render_change_summary(ticket_id: &str, comparison: &Comparison) -> String {
    let mut out = String::new();

    if !comparison.changed {
        out.push_str(&format!("Ticket {} updated (no changes)\n", ticket_id));
        return out;
    }

    out.push_str(&format!("CHANGES DETECTED in Ticket {}:\n", ticket_id));
    match &comparison.changes {
        ChangeSet::FirstObservation => {
            out.push_str(&format!(
                "   {}\n",
                ticketwatch_core_types::schema::FIRST_RECEIVED_MESSAGE
            ));
        }
        ChangeSet::Fields(_) => {
            for (field, change) in comparison.changes.fields() {
                out.push_str(&format!(
                    "   {}: '{}' → '{}'\n",
                    field,
                    display_value(&change.old),
                    display_value(&change.new)
                ));
            }
        }
    }
    out
}

/// Strings print bare; everything else prints as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::ChangeEntry;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_no_changes() {
        let summary = render_change_summary("T1", &Comparison::from_fields(BTreeMap::new()));
        assert_eq!(summary, "Ticket T1 updated (no changes)\n");
    }

    #[test]
    fn test_first_observation() {
        let summary = render_change_summary("T1", &Comparison::first_observation());
        assert_eq!(
            summary,
            "CHANGES DETECTED in Ticket T1:\n   This is the first time this ticket has been received\n"
        );
    }

    #[test]
    fn test_field_lines_in_name_order() {
        let mut fields = BTreeMap::new();
        fields.insert(
            "status".to_string(),
            ChangeEntry {
                old: json!("open"),
                new: json!("closed"),
            },
        );
        fields.insert(
            "assignee".to_string(),
            ChangeEntry {
                old: Value::Null,
                new: json!("Bob"),
            },
        );
        fields.insert(
            "tags".to_string(),
            ChangeEntry {
                old: json!(["a"]),
                new: json!(["a", "b"]),
            },
        );

        let summary = render_change_summary("T9", &Comparison::from_fields(fields));
        assert_eq!(
            summary,
            "CHANGES DETECTED in Ticket T9:\n\
             \x20  assignee: 'null' → 'Bob'\n\
             \x20  status: 'open' → 'closed'\n\
             \x20  tags: '[\"a\"]' → '[\"a\",\"b\"]'\n"
        );
    }
}
