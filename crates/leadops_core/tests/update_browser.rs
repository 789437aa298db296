use std::collections::BTreeSet;
use std::sync::Once;

use leadops_core::{
    update, AppState, ConsoleError, Effect, FetchTiming, FieldValue, Lead, LeadId, LeadPage,
    LeadRequest, Msg, PendingConfirmation, RemoteFailure, RemoteFailureKind,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(leadops_logging::initialize_for_tests);
}

fn lead(id: &str) -> Lead {
    let name = format!("Shop {id}");
    Lead {
        id: LeadId::new(id),
        name: FieldValue::parse(Some(&name)),
        address: FieldValue::parse(Some("1 Main St")),
        city: FieldValue::parse(Some("Austin")),
        country: FieldValue::parse(Some("USA")),
        phone: FieldValue::parse(Some("No phone")),
        email: FieldValue::parse(Some("No email")),
        website: FieldValue::parse(None),
        keyword: FieldValue::parse(Some("bakery")),
    }
}

fn fetch_request(effects: &[Effect]) -> (LeadRequest, FetchTiming) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchLeads { request, timing } => Some((request.clone(), *timing)),
            _ => None,
        })
        .expect("fetch effect")
}

fn load(
    state: AppState,
    request: &LeadRequest,
    ids: &[&str],
    total_pages: u32,
) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::LeadsLoaded {
            generation: request.generation,
            result: Ok(LeadPage {
                leads: ids.iter().map(|id| lead(id)).collect(),
                page: request.query.page,
                total_pages,
                total_count: u64::from(total_pages) * 3,
            }),
        },
    )
}

/// Opens the browser and answers the first fetch with the given ids.
fn opened(ids: &[&str], total_pages: u32) -> AppState {
    let (state, effects) = update(AppState::with_page_size(3), Msg::BrowserOpened);
    let (request, _) = fetch_request(&effects);
    load(state, &request, ids, total_pages).0
}

fn selected(state: &AppState) -> BTreeSet<String> {
    state
        .browser()
        .selection()
        .iter()
        .map(|id| id.to_string())
        .collect()
}

fn ids(state: &AppState) -> Vec<String> {
    state
        .browser()
        .leads()
        .iter()
        .map(|lead| lead.id.to_string())
        .collect()
}

#[test]
fn opening_fetches_keywords_and_first_page_immediately() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::BrowserOpened);

    assert_eq!(effects[0], Effect::FetchKeywords);
    let (request, timing) = fetch_request(&effects);
    assert_eq!(timing, FetchTiming::Immediate);
    assert_eq!(request.query.page, 1);
    assert_eq!(request.query.page_size, 20);
    assert!(state.browser().is_loading());
}

#[test]
fn keystrokes_issue_debounced_fetches_and_only_the_latest_applies() {
    init_logging();
    let mut state = opened(&["a", "b"], 1);
    let mut requests = Vec::new();
    for text in ["b", "ba", "bak", "bake", "bakery"] {
        let (next, effects) = update(state, Msg::SearchChanged(text.to_string()));
        let (request, timing) = fetch_request(&effects);
        assert_eq!(timing, FetchTiming::Debounced);
        requests.push(request);
        state = next;
    }

    let last = requests.last().expect("requests").clone();
    assert_eq!(last.query.search, "bakery");
    assert_eq!(last.query.page, 1);

    // A superseded answer arriving late is dropped.
    let (state, _) = load(state, &requests[1], &["stale"], 1);
    assert_eq!(ids(&state), ["a", "b"]);
    assert!(state.browser().is_loading());

    let (state, _) = load(state, &last, &["fresh"], 1);
    assert_eq!(ids(&state), ["fresh"]);
    assert!(!state.browser().is_loading());
}

#[test]
fn unchanged_search_text_does_not_refetch() {
    init_logging();
    let state = opened(&["a"], 1);
    let (state, _) = update(state, Msg::SearchChanged("gym".to_string()));
    let (_, effects) = update(state, Msg::SearchChanged("gym".to_string()));
    assert!(effects.is_empty());
}

#[test]
fn keyword_filter_resets_to_first_page_before_results_render() {
    init_logging();
    let state = opened(&["a", "b", "c"], 5);
    let (state, effects) = update(state, Msg::PageRequested(2));
    let (request, timing) = fetch_request(&effects);
    assert_eq!(timing, FetchTiming::Immediate);
    let (state, _) = load(state, &request, &["d", "e", "f"], 5);
    assert_eq!(state.view().browser.page, 2);

    let (state, effects) = update(state, Msg::KeywordFilterSelected(Some("gym".to_string())));
    let (request, timing) = fetch_request(&effects);

    assert_eq!(timing, FetchTiming::Debounced);
    assert_eq!(request.query.page, 1);
    assert_eq!(request.query.keyword.as_deref(), Some("gym"));
    assert_eq!(state.view().browser.page, 1);

    let (state, _) = load(state, &request, &["g1", "g2", "g3"], 4);
    assert_eq!(state.view().browser.page, 1);
    assert_eq!(state.view().browser.total_pages, 4);
}

#[test]
fn search_and_keyword_are_sent_together() {
    init_logging();
    let state = opened(&["a"], 1);
    let (state, _) = update(state, Msg::KeywordFilterSelected(Some("gym".to_string())));
    let (_, effects) = update(state, Msg::SearchChanged("austin".to_string()));
    let (request, _) = fetch_request(&effects);

    assert_eq!(request.query.search, "austin");
    assert_eq!(request.query.keyword.as_deref(), Some("gym"));
}

#[test]
fn pages_outside_range_are_ignored() {
    init_logging();
    let state = opened(&["a", "b", "c"], 5);
    let before = state.view();

    for page in [0, 6, 1] {
        let (next, effects) = update(state.clone(), Msg::PageRequested(page));
        assert!(effects.is_empty(), "page {page} should be ignored");
        assert_eq!(next.view(), before);
    }

    let (_, effects) = update(state.clone(), Msg::PrevPage);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::NextPage);
    assert_eq!(fetch_request(&effects).0.query.page, 2);
    assert_eq!(state.view().browser.page, 2);
}

#[test]
fn select_all_toggles_back_to_previous_selection() {
    init_logging();
    let state = opened(&["a", "b", "c"], 1);

    let (state, _) = update(state, Msg::SelectAllClicked);
    assert_eq!(selected(&state).len(), 3);
    assert!(state.view().browser.all_selected);
    let (state, _) = update(state, Msg::SelectAllClicked);
    assert!(selected(&state).is_empty());

    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("b")));
    let (state, _) = update(state, Msg::SelectAllClicked);
    assert_eq!(selected(&state).len(), 3);
    let (state, _) = update(state, Msg::SelectAllClicked);
    assert_eq!(selected(&state), BTreeSet::from(["b".to_string()]));
}

#[test]
fn toggling_unknown_lead_is_ignored() {
    init_logging();
    let state = opened(&["a"], 1);
    let (mut state, _) = update(state, Msg::LeadToggled(LeadId::new("zzz")));
    state.consume_dirty();

    let (mut state, _) = update(state, Msg::LeadToggled(LeadId::new("zzz")));
    assert!(selected(&state).is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn loading_a_new_page_prunes_selection_to_visible_leads() {
    init_logging();
    let state = opened(&["a", "b", "c"], 2);
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("a")));
    let (state, effects) = update(state, Msg::NextPage);
    let (request, _) = fetch_request(&effects);

    let (state, _) = load(state, &request, &["d", "e"], 2);
    assert!(selected(&state).is_empty());
}

#[test]
fn single_delete_waits_for_confirmation() {
    init_logging();
    let state = opened(&["a", "b", "c"], 1);

    let (state, effects) = update(state, Msg::DeleteLeadClicked(LeadId::new("b")));
    assert_eq!(
        effects,
        vec![Effect::RequestConfirmation {
            prompt: "Are you sure you want to delete this lead?".to_string()
        }]
    );
    assert_eq!(
        state.browser().confirmation(),
        Some(&PendingConfirmation::DeleteLead(LeadId::new("b")))
    );

    let (state, effects) = update(state, Msg::ConfirmationAnswered(false));
    assert!(effects.is_empty());
    assert!(state.browser().confirmation().is_none());
    assert_eq!(ids(&state), ["a", "b", "c"]);
}

#[test]
fn confirmed_delete_removes_exactly_that_lead() {
    init_logging();
    let state = opened(&["a", "b", "c"], 1);
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("a")));
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("b")));
    let (state, _) = update(state, Msg::DeleteLeadClicked(LeadId::new("b")));

    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    assert_eq!(
        effects,
        vec![Effect::DeleteLead {
            id: LeadId::new("b")
        }]
    );

    let (state, effects) = update(
        state,
        Msg::LeadDeleted {
            id: LeadId::new("b"),
            result: Ok(()),
        },
    );
    assert_eq!(ids(&state), ["a", "c"]);
    assert_eq!(selected(&state), BTreeSet::from(["a".to_string()]));
    assert_eq!(fetch_request(&effects).1, FetchTiming::Immediate);
}

#[test]
fn deleting_unselected_lead_keeps_selection() {
    init_logging();
    let state = opened(&["a", "b", "c"], 1);
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("a")));

    let (state, _) = update(
        state,
        Msg::LeadDeleted {
            id: LeadId::new("c"),
            result: Ok(()),
        },
    );

    assert_eq!(selected(&state), BTreeSet::from(["a".to_string()]));
}

#[test]
fn failed_delete_leaves_view_untouched() {
    init_logging();
    let state = opened(&["a", "b"], 1);
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("a")));

    let (state, effects) = update(
        state,
        Msg::LeadDeleted {
            id: LeadId::new("a"),
            result: Err(RemoteFailure::new(RemoteFailureKind::NotFound, "Lead not found")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(ids(&state), ["a", "b"]);
    assert_eq!(selected(&state).len(), 1);
    assert!(matches!(
        state.notice(),
        Some(ConsoleError::MutationFailure { .. })
    ));
}

#[test]
fn bulk_delete_with_empty_selection_is_rejected() {
    init_logging();
    let state = opened(&["a"], 1);

    let (state, effects) = update(state, Msg::BulkDeleteClicked);

    assert!(effects.is_empty());
    assert!(matches!(state.notice(), Some(ConsoleError::Validation(_))));
    assert!(state.browser().confirmation().is_none());
}

#[test]
fn bulk_delete_is_guarded_against_reentry() {
    init_logging();
    let state = opened(&["a", "b", "c"], 1);
    let (state, _) = update(state, Msg::SelectAllClicked);
    let (state, effects) = update(state, Msg::BulkDeleteClicked);
    assert_eq!(
        effects,
        vec![Effect::RequestConfirmation {
            prompt: "Are you sure you want to delete 3 leads?".to_string()
        }]
    );

    let (state, effects) = update(state, Msg::ConfirmationAnswered(true));
    let expected_ids = vec![LeadId::new("a"), LeadId::new("b"), LeadId::new("c")];
    assert_eq!(
        effects,
        vec![Effect::BulkDelete {
            ids: expected_ids.clone()
        }]
    );
    assert!(state.view().browser.bulk_deleting);

    let (state, effects) = update(state, Msg::BulkDeleteClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::LeadsBulkDeleted {
            ids: expected_ids,
            result: Ok(()),
        },
    );
    assert!(selected(&state).is_empty());
    assert!(ids(&state).is_empty());
    assert!(!state.view().browser.bulk_deleting);
    assert_eq!(fetch_request(&effects).1, FetchTiming::Immediate);
}

#[test]
fn failed_bulk_delete_keeps_selection() {
    init_logging();
    let state = opened(&["a", "b"], 1);
    let (state, _) = update(state, Msg::SelectAllClicked);
    let (state, _) = update(state, Msg::BulkDeleteClicked);
    let (state, _) = update(state, Msg::ConfirmationAnswered(true));

    let (state, effects) = update(
        state,
        Msg::LeadsBulkDeleted {
            ids: vec![LeadId::new("a"), LeadId::new("b")],
            result: Err(RemoteFailure::new(RemoteFailureKind::Unavailable, "502")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(selected(&state).len(), 2);
    assert!(!state.view().browser.bulk_deleting);
    assert!(state.notice().is_some());
}

#[test]
fn emptied_last_page_falls_back_to_new_last_page() {
    init_logging();
    let state = opened(&["a", "b", "c"], 3);
    let (state, effects) = update(state, Msg::PageRequested(3));
    let (request, _) = fetch_request(&effects);
    let (state, _) = load(state, &request, &["g"], 3);

    let (state, effects) = update(
        state,
        Msg::LeadDeleted {
            id: LeadId::new("g"),
            result: Ok(()),
        },
    );
    let (refetch, _) = fetch_request(&effects);
    assert_eq!(refetch.query.page, 3);

    let (state, effects) = load(state, &refetch, &[], 2);
    let (fallback, timing) = fetch_request(&effects);
    assert_eq!(timing, FetchTiming::Immediate);
    assert_eq!(fallback.query.page, 2);
    assert_eq!(state.view().browser.page, 2);

    let (state, effects) = load(state, &fallback, &["d", "e", "f"], 2);
    assert!(effects.is_empty());
    assert_eq!(ids(&state), ["d", "e", "f"]);
}

#[test]
fn page_emptied_elsewhere_drops_stale_rows_and_selection() {
    init_logging();
    let state = opened(&["a", "b", "c"], 3);
    let (state, effects) = update(state, Msg::PageRequested(3));
    let (request, _) = fetch_request(&effects);
    let (state, _) = load(state, &request, &["g", "h"], 3);
    let (state, _) = update(state, Msg::LeadToggled(LeadId::new("g")));
    assert_eq!(selected(&state).len(), 1);

    let (state, effects) = update(state, Msg::RefreshClicked);
    let (refresh, _) = fetch_request(&effects);
    let (state, effects) = load(state, &refresh, &[], 2);

    let (fallback, _) = fetch_request(&effects);
    assert_eq!(fallback.query.page, 2);
    let view = state.view().browser;
    assert_eq!(view.page, 2);
    assert!(view.rows.is_empty());
    assert_eq!(view.selected_count, 0);
    assert!(selected(&state).is_empty());
}

#[test]
fn failed_fetch_keeps_current_rows() {
    init_logging();
    let state = opened(&["a"], 1);
    let (state, effects) = update(state, Msg::RefreshClicked);
    let (request, _) = fetch_request(&effects);

    let (state, effects) = update(
        state,
        Msg::LeadsLoaded {
            generation: request.generation,
            result: Err(RemoteFailure::new(RemoteFailureKind::Unavailable, "timeout")),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(ids(&state), ["a"]);
    assert!(!state.browser().is_loading());
    assert!(state.notice().is_none());
}

#[test]
fn export_hands_over_loaded_page_only() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::ExportClicked);
    assert!(effects.is_empty());

    let state = opened(&["a", "b"], 4);
    let (_, effects) = update(state, Msg::ExportClicked);
    match effects.as_slice() {
        [Effect::ExportLeads { leads }] => assert_eq!(leads.len(), 2),
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn view_marks_absent_fields_and_row_range() {
    init_logging();
    let state = opened(&["a", "b", "c"], 2);
    let (state, effects) = update(state, Msg::NextPage);
    let (request, _) = fetch_request(&effects);
    let (state, _) = load(state, &request, &["d", "e"], 2);

    let view = state.view().browser;
    assert_eq!((view.showing_from, view.showing_to), (4, 5));
    assert!(view.rows[0].email.is_absent());
    assert_eq!(view.rows[0].email.raw_text(), "No email");
    assert_eq!(view.rows[0].city.present(), Some("Austin"));
}

#[test]
fn keywords_loaded_populate_filter_options() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::KeywordsLoaded(Ok(vec!["bakery".to_string(), "gym".to_string()])),
    );
    assert_eq!(state.view().browser.keywords, ["bakery", "gym"]);
}
