use crate::browser::{BrowserState, DEFAULT_PAGE_SIZE};
use crate::mission::{MissionPhase, MissionState};
use crate::view_model::{AppViewModel, BrowserView, JobView, LeadRowView, MissionView};
use crate::{ConsoleError, JobStatus, Stats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) mission: MissionState,
    pub(crate) browser: BrowserState,
    pub(crate) stats: Option<Stats>,
    notice: Option<ConsoleError>,
    pub(crate) dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Page size is fixed for the lifetime of the state.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            mission: MissionState::default(),
            browser: BrowserState::new(page_size),
            stats: None,
            notice: None,
            dirty: false,
        }
    }

    pub fn mission(&self) -> &MissionState {
        &self.mission
    }

    pub fn browser(&self) -> &BrowserState {
        &self.browser
    }

    pub fn notice(&self) -> Option<&ConsoleError> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mission: self.mission_view(),
            browser: self.browser_view(),
            stats: self.stats,
            notice: self.notice.as_ref().map(ToString::to_string),
            confirmation_prompt: self.browser.confirmation().map(|pending| pending.prompt()),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_notice(&mut self, notice: ConsoleError) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    fn mission_view(&self) -> MissionView {
        let mission = &self.mission;
        let phase = match mission.phase() {
            MissionPhase::Idle => "Idle",
            MissionPhase::Resuming(_) => "Resuming",
            MissionPhase::Submitting { .. } => "Launching",
            MissionPhase::Active(job) if job.is_running() => "Mission in Progress",
            MissionPhase::Active(job) if job.status == JobStatus::Failed => "Mission Failed",
            MissionPhase::Active(_) => "Mission Completed",
        };
        MissionView {
            phase,
            keywords: mission.keywords().to_vec(),
            locations: mission.locations().to_vec(),
            job: mission.job().map(|job| JobView {
                task_id: job.task_id.to_string(),
                status: job.status.as_str().to_string(),
                progress: job.progress,
                message: job.message.clone().unwrap_or_default(),
                leads_found: job.leads_found,
                running: job.is_running(),
            }),
            polling: mission.is_polling(),
            can_launch: mission.can_launch(),
            can_dismiss: mission.can_dismiss(),
        }
    }

    fn browser_view(&self) -> BrowserView {
        let browser = &self.browser;
        let query = browser.query();
        let rows = browser
            .leads()
            .iter()
            .map(|lead| LeadRowView {
                id: lead.id.clone(),
                name: lead.name.clone(),
                address: lead.address.clone(),
                city: lead.city.clone(),
                country: lead.country.clone(),
                phone: lead.phone.clone(),
                email: lead.email.clone(),
                website: lead.website.clone(),
                keyword: lead.keyword.clone(),
                selected: browser.selection().contains(&lead.id),
            })
            .collect::<Vec<_>>();
        let first_row = u64::from(query.page - 1) * u64::from(query.page_size) + 1;
        let (showing_from, showing_to) = if rows.is_empty() {
            (0, 0)
        } else {
            (first_row, first_row + rows.len() as u64 - 1)
        };
        BrowserView {
            page: query.page,
            total_pages: browser.total_pages(),
            total_count: browser.total_count(),
            showing_from,
            showing_to,
            search: query.search.clone(),
            keyword_filter: query.keyword.clone(),
            keywords: browser.keywords().to_vec(),
            selected_count: browser.selection().len(),
            all_selected: browser.all_visible_selected(),
            loading: browser.is_loading(),
            bulk_deleting: browser.is_bulk_deleting(),
            rows,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
