//! RFI row model matching the frontend RfiRow interface.

use serde::{Deserialize, Serialize};

fn not_available() -> String {
    "N/A".to_string()
}

/// A single Request for Information as exported from Procore.
///
/// Everything except `notes` is refreshed wholesale from the exporter
/// snapshot on each fetch; `notes` is the only locally mutable field and is
/// merged in from the notes file. Identity is `number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfiRow {
    pub number: String,
    pub subject: String,
    /// Party currently responsible for responding
    pub ball_in_court: String,
    pub due_date: String,
    /// Derived upstream; negative means not yet due
    #[serde(default)]
    pub days_late: i64,
    /// Date of the last ball-in-court change, or "N/A"
    #[serde(default = "not_available")]
    pub last_change_of_court: String,
    /// Days with the current party, or "N/A"
    #[serde(default = "not_available")]
    pub days_in_court: String,
    /// Free-text note edited through the dashboard
    #[serde(default)]
    pub notes: String,
    /// Deep link into Procore
    #[serde(default)]
    pub link: String,
    /// Pre-built reminder email link; derived here when the exporter omits it
    #[serde(default)]
    pub mailto_reminder: String,
}

impl RfiRow {
    /// Build the reminder mailto link from the row's own fields.
    pub fn derive_mailto_reminder(&self) -> String {
        let subject = format!("Reminder: RFI #{} - {}", self.number, self.subject);
        let body = format!(
            "Hi {},\n\nThis is a reminder that RFI #{} (\"{}\") is awaiting your response.\n\nThank you!",
            self.ball_in_court, self.number, self.subject
        );
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        )
    }

    /// Fill `mailto_reminder` if the exporter did not provide one.
    pub fn ensure_mailto_reminder(&mut self) {
        if self.mailto_reminder.is_empty() {
            self.mailto_reminder = self.derive_mailto_reminder();
        }
    }
}

/// Response body for GET /api/rfis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfiListResponse {
    pub rows: Vec<RfiRow>,
}

/// Request body for PUT /api/rfis/{number}/note.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub note: String,
}

/// Response body for PUT /api/rfis/{number}/note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNoteResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(number: &str, subject: &str, ball_in_court: &str) -> RfiRow {
        RfiRow {
            number: number.to_string(),
            subject: subject.to_string(),
            ball_in_court: ball_in_court.to_string(),
            due_date: "2026-09-01".to_string(),
            days_late: 0,
            last_change_of_court: "N/A".to_string(),
            days_in_court: "N/A".to_string(),
            notes: String::new(),
            link: String::new(),
            mailto_reminder: String::new(),
        }
    }

    #[test]
    fn test_mailto_reminder_is_derived_and_encoded() {
        let mut r = row("42", "Beam clearance & fireproofing", "Jane Doe");
        r.ensure_mailto_reminder();

        assert!(r.mailto_reminder.starts_with("mailto:?subject="));
        assert!(r.mailto_reminder.contains("RFI%20%2342"));
        // Ampersand in the subject must not break the query string
        assert!(r.mailto_reminder.contains("%26"));
    }

    #[test]
    fn test_exporter_provided_mailto_is_kept() {
        let mut r = row("7", "Door schedule", "GC");
        r.mailto_reminder = "mailto:gc@example.com?subject=RFI%207".to_string();
        r.ensure_mailto_reminder();

        assert_eq!(r.mailto_reminder, "mailto:gc@example.com?subject=RFI%207");
    }

    #[test]
    fn test_snapshot_row_defaults() {
        // Minimal exporter output: derived columns may be absent
        let r: RfiRow = serde_json::from_str(
            r#"{"number":"1","subject":"S","ball_in_court":"B","due_date":"2026-01-01"}"#,
        )
        .unwrap();

        assert_eq!(r.days_late, 0);
        assert_eq!(r.last_change_of_court, "N/A");
        assert_eq!(r.days_in_court, "N/A");
        assert_eq!(r.notes, "");
    }
}
