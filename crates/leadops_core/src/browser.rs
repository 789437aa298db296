//! Lead browser: filtered, server-paginated view of the lead collection with a
//! multi-select set and confirmed deletion.
//!
//! Every fetch is tagged with a generation. Only the answer for the current
//! generation is applied, so the view always reflects the most recently
//! requested query rather than the most recently completed response.

use std::collections::BTreeSet;

use leadops_logging::{leadops_debug, leadops_info, leadops_warn};

use crate::{
    AppState, ConsoleError, Effect, FetchTiming, Lead, LeadId, LeadPage, LeadQuery, LeadRequest,
    Msg, RemoteFailure,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Destructive action waiting for an explicit yes/no from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    DeleteLead(LeadId),
    BulkDelete(Vec<LeadId>),
}

impl PendingConfirmation {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirmation::DeleteLead(_) => {
                "Are you sure you want to delete this lead?".to_string()
            }
            PendingConfirmation::BulkDelete(ids) => {
                format!("Are you sure you want to delete {} leads?", ids.len())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserState {
    query: LeadQuery,
    generation: u64,
    leads: Vec<Lead>,
    total_pages: u32,
    total_count: u64,
    selection: BTreeSet<LeadId>,
    /// Selection replaced by the last select-all, restored when it is toggled back.
    select_all_undo: Option<BTreeSet<LeadId>>,
    keywords: Vec<String>,
    loading: bool,
    bulk_deleting: bool,
    confirmation: Option<PendingConfirmation>,
}

impl BrowserState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: LeadQuery::first_page(page_size.max(1)),
            generation: 0,
            leads: Vec::new(),
            total_pages: 0,
            total_count: 0,
            selection: BTreeSet::new(),
            select_all_undo: None,
            keywords: Vec::new(),
            loading: false,
            bulk_deleting: false,
            confirmation: None,
        }
    }

    pub fn query(&self) -> &LeadQuery {
        &self.query
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn selection(&self) -> &BTreeSet<LeadId> {
        &self.selection
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_bulk_deleting(&self) -> bool {
        self.bulk_deleting
    }

    pub fn confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.as_ref()
    }

    /// Highest page `set_page` accepts; an empty collection still has page 1.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn all_visible_selected(&self) -> bool {
        !self.leads.is_empty() && self.leads.iter().all(|lead| self.selection.contains(&lead.id))
    }

    /// Bumps the generation and describes the fetch for the current query.
    fn next_request(&mut self, timing: FetchTiming) -> Effect {
        self.generation += 1;
        self.loading = true;
        Effect::FetchLeads {
            request: LeadRequest {
                generation: self.generation,
                query: self.query.clone(),
            },
            timing,
        }
    }

    fn toggle(&mut self, id: LeadId) -> bool {
        if !self.leads.iter().any(|lead| lead.id == id) {
            return false;
        }
        self.select_all_undo = None;
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        true
    }

    /// Toggle over the visible rows. Selects exactly the visible rows, or, when
    /// they are all selected already, restores the selection that the previous
    /// select-all replaced, so two presses in a row leave the selection as it
    /// was. With nothing to restore it clears.
    fn select_all(&mut self) {
        let visible: BTreeSet<LeadId> = self.leads.iter().map(|lead| lead.id.clone()).collect();
        if self.all_visible_selected() {
            self.selection = self.select_all_undo.take().unwrap_or_default();
        } else {
            self.select_all_undo = Some(std::mem::replace(&mut self.selection, visible));
        }
    }

    fn clear_selection(&mut self) {
        self.select_all_undo = None;
        self.selection.clear();
    }

    fn remove_leads(&mut self, ids: &[LeadId]) {
        self.leads.retain(|lead| !ids.contains(&lead.id));
        for id in ids {
            self.selection.remove(id);
        }
        self.select_all_undo = None;
        self.total_count = self.total_count.saturating_sub(ids.len() as u64);
    }

    fn apply_page(&mut self, page: LeadPage) {
        self.leads = page.leads;
        self.total_pages = page.total_pages;
        self.total_count = page.total_count;
        let visible: BTreeSet<&LeadId> = self.leads.iter().map(|lead| &lead.id).collect();
        let before = self.selection.len();
        self.selection.retain(|id| visible.contains(id));
        if self.selection.len() != before {
            self.select_all_undo = None;
        }
    }
}

impl Default for BrowserState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

pub(crate) fn update_browser(state: &mut AppState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::BrowserOpened => {
            state.dirty = true;
            vec![
                Effect::FetchKeywords,
                state.browser.next_request(FetchTiming::Immediate),
            ]
        }
        Msg::SearchChanged(text) => {
            let browser = &mut state.browser;
            if browser.query.search == text {
                return Vec::new();
            }
            browser.query.search = text;
            browser.query.page = 1;
            state.dirty = true;
            vec![browser.next_request(FetchTiming::Debounced)]
        }
        Msg::KeywordFilterSelected(keyword) => {
            let browser = &mut state.browser;
            let keyword = keyword.filter(|kw| !kw.trim().is_empty());
            if browser.query.keyword == keyword {
                return Vec::new();
            }
            browser.query.keyword = keyword;
            browser.query.page = 1;
            state.dirty = true;
            vec![browser.next_request(FetchTiming::Debounced)]
        }
        Msg::PageRequested(page) => set_page(state, page),
        Msg::NextPage => {
            let page = state.browser.query.page.saturating_add(1);
            set_page(state, page)
        }
        Msg::PrevPage => {
            let page = state.browser.query.page.saturating_sub(1);
            set_page(state, page)
        }
        Msg::RefreshClicked => {
            state.dirty = true;
            vec![state.browser.next_request(FetchTiming::Immediate)]
        }
        Msg::LeadsLoaded { generation, result } => leads_loaded(state, generation, result),
        Msg::KeywordsLoaded(result) => {
            match result {
                Ok(keywords) => {
                    state.browser.keywords = keywords;
                    state.dirty = true;
                }
                Err(failure) => leadops_warn!("Keyword list unavailable: {}", failure.message),
            }
            Vec::new()
        }
        Msg::LeadToggled(id) => {
            if state.browser.toggle(id) {
                state.dirty = true;
            }
            Vec::new()
        }
        Msg::SelectAllClicked => {
            if !state.browser.leads.is_empty() {
                state.browser.select_all();
                state.dirty = true;
            }
            Vec::new()
        }
        Msg::ClearSelectionClicked => {
            if !state.browser.selection.is_empty() {
                state.browser.clear_selection();
                state.dirty = true;
            }
            Vec::new()
        }
        Msg::DeleteLeadClicked(id) => request_delete(state, id),
        Msg::BulkDeleteClicked => request_bulk_delete(state),
        Msg::ConfirmationAnswered(confirmed) => confirmation_answered(state, confirmed),
        Msg::LeadDeleted { id, result } => lead_deleted(state, id, result),
        Msg::LeadsBulkDeleted { ids, result } => bulk_deleted(state, ids, result),
        Msg::ExportClicked => {
            if state.browser.leads.is_empty() {
                return Vec::new();
            }
            vec![Effect::ExportLeads {
                leads: state.browser.leads.clone(),
            }]
        }
        _ => Vec::new(),
    }
}

fn set_page(state: &mut AppState, page: u32) -> Vec<Effect> {
    let browser = &mut state.browser;
    if page < 1 || page > browser.last_page() || page == browser.query.page {
        return Vec::new();
    }
    browser.query.page = page;
    state.dirty = true;
    vec![browser.next_request(FetchTiming::Immediate)]
}

fn leads_loaded(
    state: &mut AppState,
    generation: u64,
    result: Result<LeadPage, RemoteFailure>,
) -> Vec<Effect> {
    let browser = &mut state.browser;
    if generation != browser.generation {
        leadops_debug!(
            "Dropping stale lead page generation={} current={}",
            generation,
            browser.generation
        );
        return Vec::new();
    }
    browser.loading = false;
    state.dirty = true;

    let page = match result {
        Ok(page) => page,
        Err(failure) => {
            leadops_warn!(
                "Lead fetch failed: {}",
                ConsoleError::TransientGateway(failure.message)
            );
            return Vec::new();
        }
    };

    let requested = browser.query.page;
    if page.leads.is_empty() && requested > 1 {
        // Page emptied by deletions; step back toward the new last page.
        let fallback = page.total_pages.max(1).min(requested - 1);
        leadops_info!("Page {} is empty, falling back to page {}", requested, fallback);
        browser.apply_page(LeadPage {
            leads: Vec::new(),
            ..page
        });
        browser.query.page = fallback;
        return vec![browser.next_request(FetchTiming::Immediate)];
    }

    browser.apply_page(page);
    Vec::new()
}

fn request_delete(state: &mut AppState, id: LeadId) -> Vec<Effect> {
    if !state.browser.leads.iter().any(|lead| lead.id == id) {
        return Vec::new();
    }
    ask(state, PendingConfirmation::DeleteLead(id))
}

fn request_bulk_delete(state: &mut AppState) -> Vec<Effect> {
    if state.browser.bulk_deleting {
        leadops_warn!("Bulk delete already in progress");
        return Vec::new();
    }
    if state.browser.selection.is_empty() {
        state.set_notice(ConsoleError::Validation(
            "select at least one lead to delete".to_string(),
        ));
        return Vec::new();
    }
    let ids = state.browser.selection.iter().cloned().collect();
    ask(state, PendingConfirmation::BulkDelete(ids))
}

fn ask(state: &mut AppState, pending: PendingConfirmation) -> Vec<Effect> {
    let prompt = pending.prompt();
    state.browser.confirmation = Some(pending);
    state.dirty = true;
    vec![Effect::RequestConfirmation { prompt }]
}

fn confirmation_answered(state: &mut AppState, confirmed: bool) -> Vec<Effect> {
    let Some(pending) = state.browser.confirmation.take() else {
        return Vec::new();
    };
    state.dirty = true;
    if !confirmed {
        return Vec::new();
    }
    match pending {
        PendingConfirmation::DeleteLead(id) => vec![Effect::DeleteLead { id }],
        PendingConfirmation::BulkDelete(ids) => {
            if state.browser.bulk_deleting {
                return Vec::new();
            }
            state.browser.bulk_deleting = true;
            vec![Effect::BulkDelete { ids }]
        }
    }
}

fn lead_deleted(state: &mut AppState, id: LeadId, result: Result<(), RemoteFailure>) -> Vec<Effect> {
    state.dirty = true;
    match result {
        Ok(()) => {
            leadops_info!("Lead {} deleted", id);
            state.browser.remove_leads(std::slice::from_ref(&id));
            vec![state.browser.next_request(FetchTiming::Immediate)]
        }
        Err(failure) => {
            leadops_warn!("Deleting lead {} failed: {}", id, failure.message);
            state.set_notice(ConsoleError::mutation("deleting the lead", &failure));
            Vec::new()
        }
    }
}

fn bulk_deleted(
    state: &mut AppState,
    ids: Vec<LeadId>,
    result: Result<(), RemoteFailure>,
) -> Vec<Effect> {
    state.browser.bulk_deleting = false;
    state.dirty = true;
    match result {
        Ok(()) => {
            leadops_info!("Bulk deleted {} leads", ids.len());
            state.browser.remove_leads(&ids);
            state.browser.clear_selection();
            vec![state.browser.next_request(FetchTiming::Immediate)]
        }
        Err(failure) => {
            leadops_warn!("Bulk delete of {} leads failed: {}", ids.len(), failure.message);
            state.set_notice(ConsoleError::mutation("deleting the selected leads", &failure));
            Vec::new()
        }
    }
}
