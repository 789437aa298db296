use crate::{FieldValue, LeadId, Stats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mission: MissionView,
    pub browser: BrowserView,
    pub stats: Option<Stats>,
    pub notice: Option<String>,
    pub confirmation_prompt: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionView {
    pub phase: &'static str,
    pub keywords: Vec<String>,
    pub locations: Vec<String>,
    pub job: Option<JobView>,
    pub polling: bool,
    pub can_launch: bool,
    pub can_dismiss: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub task_id: String,
    pub status: String,
    pub progress: u8,
    pub message: String,
    pub leads_found: Option<u64>,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserView {
    pub rows: Vec<LeadRowView>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    /// 1-based row range shown, `(0, 0)` when empty.
    pub showing_from: u64,
    pub showing_to: u64,
    pub search: String,
    pub keyword_filter: Option<String>,
    pub keywords: Vec<String>,
    pub selected_count: usize,
    pub all_selected: bool,
    pub loading: bool,
    pub bulk_deleting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRowView {
    pub id: LeadId,
    pub name: FieldValue,
    pub address: FieldValue,
    pub city: FieldValue,
    pub country: FieldValue,
    pub phone: FieldValue,
    pub email: FieldValue,
    pub website: FieldValue,
    pub keyword: FieldValue,
    pub selected: bool,
}
