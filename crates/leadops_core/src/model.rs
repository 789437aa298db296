use std::fmt;

/// Opaque scrape job identifier assigned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque lead identifier (`_id` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeadId(String);

impl LeadId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
    /// Any other gateway vocabulary; treated as terminal.
    Other(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Other(raw) => raw,
        }
    }
}

/// Snapshot of a server-side scrape job. Replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub task_id: TaskId,
    pub status: JobStatus,
    /// Percentage, 0..=100.
    pub progress: u8,
    pub message: Option<String>,
    pub leads_found: Option<u64>,
}

impl Job {
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}

/// A descriptive lead field that may carry a scraper sentinel instead of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    /// No real value. Keeps the sentinel text ("No email", ...) when the gateway sent one.
    Absent { sentinel: Option<String> },
}

impl FieldValue {
    /// Classifies a raw gateway value. Empty strings and the scraper's placeholder
    /// texts are absent.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return FieldValue::Absent { sentinel: None };
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return FieldValue::Absent { sentinel: None };
        }
        if is_sentinel(trimmed) {
            return FieldValue::Absent {
                sentinel: Some(trimmed.to_string()),
            };
        }
        FieldValue::Present(trimmed.to_string())
    }

    pub fn present(&self) -> Option<&str> {
        match self {
            FieldValue::Present(value) => Some(value),
            FieldValue::Absent { .. } => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent { .. })
    }

    /// Text as the gateway stored it; sentinels round-trip, null becomes empty.
    pub fn raw_text(&self) -> &str {
        match self {
            FieldValue::Present(value) => value,
            FieldValue::Absent {
                sentinel: Some(sentinel),
            } => sentinel,
            FieldValue::Absent { sentinel: None } => "",
        }
    }
}

const SENTINELS: &[&str] = &[
    "No address",
    "No email",
    "No email found",
    "No phone",
    "No phone number",
    "No website",
    "Not specified",
];

fn is_sentinel(value: &str) -> bool {
    SENTINELS
        .iter()
        .any(|sentinel| sentinel.eq_ignore_ascii_case(value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub id: LeadId,
    pub name: FieldValue,
    pub address: FieldValue,
    pub city: FieldValue,
    pub country: FieldValue,
    pub phone: FieldValue,
    pub email: FieldValue,
    pub website: FieldValue,
    pub keyword: FieldValue,
}

/// Browse state sent to the gateway. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub keyword: Option<String>,
}

impl LeadQuery {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            search: String::new(),
            keyword: None,
        }
    }
}

/// A lead fetch tagged with the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRequest {
    pub generation: u64,
    pub query: LeadQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_leads: u64,
    pub locations_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_value_classifies_sentinels() {
        assert_eq!(
            FieldValue::parse(Some("No email")),
            FieldValue::Absent {
                sentinel: Some("No email".to_string())
            }
        );
        assert_eq!(
            FieldValue::parse(Some("Not specified")).raw_text(),
            "Not specified"
        );
        assert_eq!(FieldValue::parse(Some("   ")), FieldValue::Absent { sentinel: None });
        assert!(!FieldValue::parse(Some("No Frills Bakery")).is_absent());
        assert_eq!(FieldValue::parse(None).raw_text(), "");
        assert_eq!(
            FieldValue::parse(Some(" Nordic Bakery ")).present(),
            Some("Nordic Bakery")
        );
    }

    #[test]
    fn unknown_status_is_terminal() {
        assert!(!JobStatus::parse("running").is_terminal());
        assert!(JobStatus::parse("completed").is_terminal());
        let odd = JobStatus::parse("cancelled");
        assert!(odd.is_terminal());
        assert_eq!(odd.as_str(), "cancelled");
    }
}
