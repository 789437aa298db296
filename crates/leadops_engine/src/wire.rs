//! Gateway JSON shapes and their validation into core records.

use leadops_core::{FieldValue, Job, JobStatus, Lead, LeadId, LeadPage, Stats, TaskId};
use serde::{Deserialize, Serialize};

use crate::{FailureKind, GatewayError};

#[derive(Debug, Serialize)]
pub(crate) struct ScrapeRequest<'a> {
    pub keywords: &'a [String],
    pub locations: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct BulkDeleteRequest<'a> {
    pub lead_ids: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobWire {
    pub task_id: Option<String>,
    pub status: String,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub leads_found: Option<u64>,
}

impl JobWire {
    /// `fallback_id` covers status answers that omit the id.
    pub fn into_job(self, fallback_id: Option<&TaskId>) -> Result<Job, GatewayError> {
        let task_id = match (self.task_id, fallback_id) {
            (Some(id), _) if !id.trim().is_empty() => TaskId::new(id),
            (_, Some(fallback)) => fallback.clone(),
            _ => {
                return Err(GatewayError::new(
                    FailureKind::Malformed,
                    "job response without task_id",
                ))
            }
        };
        Ok(Job {
            task_id,
            status: JobStatus::parse(&self.status),
            progress: self.progress.clamp(0, 100) as u8,
            message: self.message.filter(|message| !message.trim().is_empty()),
            leads_found: self.leads_found,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeadWire {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl LeadWire {
    pub fn into_lead(self) -> Result<Lead, GatewayError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GatewayError::new(FailureKind::Malformed, "lead without _id"))?;
        Ok(Lead {
            id: LeadId::new(id),
            name: FieldValue::parse(self.name.as_deref()),
            address: FieldValue::parse(self.address.as_deref()),
            city: FieldValue::parse(self.city.as_deref()),
            country: FieldValue::parse(self.country.as_deref()),
            phone: FieldValue::parse(self.phone.as_deref()),
            email: FieldValue::parse(self.email.as_deref()),
            website: FieldValue::parse(self.website.as_deref()),
            keyword: FieldValue::parse(self.keyword.as_deref()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeadPageWire {
    #[serde(default)]
    pub leads: Vec<LeadWire>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

impl LeadPageWire {
    pub fn into_page(self, requested_page: u32) -> Result<LeadPage, GatewayError> {
        let leads = self
            .leads
            .into_iter()
            .map(LeadWire::into_lead)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LeadPage {
            leads,
            page: self.page.unwrap_or(requested_page),
            total_pages: self.pages,
            total_count: self.total,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsWire {
    #[serde(default)]
    pub total_leads: u64,
    #[serde(default)]
    pub locations_count: u64,
}

impl From<StatsWire> for Stats {
    fn from(wire: StatsWire) -> Self {
        Stats {
            total_leads: wire.total_leads,
            locations_count: wire.locations_count,
        }
    }
}

/// Parses a JSON body, reporting schema mismatches as `Malformed`.
pub(crate) fn parse<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|err| GatewayError::new(FailureKind::Malformed, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_progress_is_clamped_and_blank_message_dropped() {
        let wire: JobWire = parse(br#"{"task_id":"t","status":"running","progress":140,"message":"  "}"#)
            .expect("parse");
        let job = wire.into_job(None).expect("job");
        assert_eq!(job.progress, 100);
        assert_eq!(job.message, None);
    }

    #[test]
    fn status_answer_without_id_uses_requested_id() {
        let wire: JobWire = parse(br#"{"status":"completed","progress":100}"#).expect("parse");
        let job = wire.into_job(Some(&TaskId::new("t-7"))).expect("job");
        assert_eq!(job.task_id.as_str(), "t-7");
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn lead_without_id_is_malformed() {
        let wire: LeadWire = parse(br#"{"name":"Shop"}"#).expect("parse");
        let err = wire.into_lead().unwrap_err();
        assert_eq!(err.kind, FailureKind::Malformed);
    }

    #[test]
    fn null_contact_fields_become_absent() {
        let wire: LeadWire =
            parse(br#"{"_id":"1","name":"Shop","phone":null,"website":"No website"}"#)
                .expect("parse");
        let lead = wire.into_lead().expect("lead");
        assert!(lead.phone.is_absent());
        assert_eq!(lead.website.raw_text(), "No website");
        assert!(lead.email.is_absent());
    }
}
