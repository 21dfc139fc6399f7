// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring routing, page state, messages, and commands.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, ContactLink, ServiceCard};
use crate::logic::api::{ApiError, InboxApi};
use crate::logic::export;
use crate::logic::mock_feed::MockFeedGenerator;
use crate::models::email::FetchedEmail;
use crate::models::route::Route;
use crate::ui::components::address_form::{
    self, AddressFormEvent, AddressFormModel, AddressFormMsg,
};
use crate::ui::components::dashboard::{
    self, DashboardCommand, DashboardEvent, DashboardModel, DashboardMsg,
};
use crate::ui::components::feed::{self, FeedCommand, FeedEvent, FeedModel, FeedMsg};
use crate::ui::components::search::{
    self, SearchCommand, SearchEvent, SearchModel, SearchMsg, SearchPurpose,
};
use crate::ui::components::services::ServicesMsg;

/// Shown for any non-2xx inbox response.
pub const INBOX_FETCH_FAILED: &str = "Failed to fetch emails from server.";

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Page currently shown.
    pub route: Route,
    /// Previously visited routes for the Back button.
    pub history: Vec<Route>,
    /// Editable path bar contents.
    pub path_input: String,
    pub services: Vec<ServiceCard>,
    pub links: Vec<ContactLink>,
    pub address_form: AddressFormModel,
    pub dashboard: DashboardModel,
    pub search: SearchModel,
    pub feed: FeedModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            path_input: Route::ServicePicker.to_path(),
            services: config.services.clone(),
            links: config.links.clone(),
            search: SearchModel::new(config.domains.clone()),
            feed: FeedModel::new(&config.feed),
            ..Default::default()
        }
    }
}

/// Application messages routed through the update function.
#[derive(Clone, Debug)]
pub enum Msg {
    Navigate(Route),
    /// Path typed into the path bar.
    NavigatePath(String),
    PathInputChanged(String),
    Back,
    DismissError,
    Services(ServicesMsg),
    AddressForm(AddressFormMsg),
    Dashboard(DashboardMsg),
    Search(SearchMsg),
    Feed(FeedMsg),
    ExportCompleted(Result<PathBuf, String>),
    BrowserOpened(Result<PathBuf, String>),
    LinkOpened(Result<String, String>),
}

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    FetchInbox {
        address: String,
    },
    FetchDomain {
        seq: u64,
        domain: String,
        purpose: SearchPurpose,
    },
    OpenInBrowser(FetchedEmail),
    SaveEmail {
        path: PathBuf,
        email: FetchedEmail,
    },
    OpenUrl(String),
    GenerateFeed {
        count: usize,
    },
    RefreshFeed {
        delay: Duration,
    },
    FeedTick {
        chance: f64,
    },
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Navigate(route) => navigate(model, route, cmds),
        Msg::NavigatePath(path) => navigate(model, Route::parse(&path), cmds),
        Msg::PathInputChanged(text) => model.path_input = text,
        Msg::Back => {
            if let Some(previous) = model.history.pop() {
                show_route(model, previous, cmds);
            }
        }
        Msg::DismissError => model.error = None,
        Msg::Services(ServicesMsg::Picked { name, color }) => {
            navigate(
                model,
                Route::Verification {
                    service: name.clone(),
                },
                cmds,
            );
            model.address_form.reset(&name, Some(color));
        }
        Msg::AddressForm(m) => match address_form::update(&mut model.address_form, m) {
            Some(AddressFormEvent::Navigate(route)) => navigate(model, route, cmds),
            Some(AddressFormEvent::OpenLink(url)) => cmds.push(Command::OpenUrl(url)),
            None => {}
        },
        Msg::Dashboard(m) => {
            let mut dash_cmds = Vec::new();
            let event = dashboard::update(&mut model.dashboard, m, &mut dash_cmds);
            cmds.extend(dash_cmds.into_iter().map(Command::from));
            match event {
                Some(DashboardEvent::Exit) => navigate(model, Route::ServicePicker, cmds),
                Some(DashboardEvent::Status(text)) => surface_event(model, text, false),
                None => {}
            }
        }
        Msg::Search(m) => {
            let mut search_cmds = Vec::new();
            let event = search::update(&mut model.search, m, &mut search_cmds);
            cmds.extend(search_cmds.into_iter().map(Command::from));
            match event {
                Some(SearchEvent::OpenInbox(address)) => {
                    navigate(model, Route::Dashboard { address }, cmds)
                }
                Some(SearchEvent::Status(text)) => surface_event(model, text, false),
                None => {}
            }
        }
        Msg::Feed(m) => {
            let mut feed_cmds = Vec::new();
            let event = feed::update(&mut model.feed, m, &mut feed_cmds);
            cmds.extend(feed_cmds.into_iter().map(Command::from));
            if let Some(FeedEvent::Status(text)) = event {
                surface_event(model, text, false);
            }
        }
        Msg::ExportCompleted(result) => match result {
            Ok(path) => surface_event(model, format!("Email saved: {}", path.display()), false),
            Err(err) => surface_event(model, format!("Failed to save email:\n\n{err}"), true),
        },
        Msg::BrowserOpened(result) => match result {
            Ok(_) => surface_event(model, "Opened email in browser.".into(), false),
            Err(err) => surface_event(model, format!("Failed to open browser:\n\n{err}"), true),
        },
        Msg::LinkOpened(result) => match result {
            Ok(url) => surface_event(model, format!("Opened {url}"), false),
            Err(err) => surface_event(model, format!("Failed to open link:\n\n{err}"), true),
        },
    }
}

/// Push the current route onto the history and show `route`.
fn navigate(model: &mut AppModel, route: Route, cmds: &mut Vec<Command>) {
    if route == model.route {
        model.path_input = route.to_path();
        return;
    }
    let previous = std::mem::replace(&mut model.route, Route::ServicePicker);
    model.history.push(previous);
    show_route(model, route, cmds);
}

/// Make `route` current and run its on-enter behaviour.
fn show_route(model: &mut AppModel, route: Route, cmds: &mut Vec<Command>) {
    debug!(%route, "navigating");
    model.path_input = route.to_path();

    match &route {
        Route::Verification { service } => {
            let accent = model
                .services
                .iter()
                .find(|s| &s.name == service)
                .map(|s| s.color.clone());
            model.address_form.reset(service, accent);
        }
        Route::Dashboard { address } => {
            let mut dash_cmds = Vec::new();
            model.dashboard.enter(address.clone(), &mut dash_cmds);
            cmds.extend(dash_cmds.into_iter().map(Command::from));
        }
        Route::Feed => {
            let mut feed_cmds = Vec::new();
            feed::update(&mut model.feed, FeedMsg::Init, &mut feed_cmds);
            cmds.extend(feed_cmds.into_iter().map(Command::from));
        }
        Route::NotFound { path } => warn!(path = %path, "no route for path"),
        Route::ServicePicker | Route::Search => {}
    }

    model.route = route;
}

impl From<DashboardCommand> for Command {
    fn from(cmd: DashboardCommand) -> Self {
        match cmd {
            DashboardCommand::Fetch { address } => Command::FetchInbox { address },
            DashboardCommand::OpenInBrowser(email) => Command::OpenInBrowser(email),
            DashboardCommand::Save { path, email } => Command::SaveEmail { path, email },
        }
    }
}

impl From<SearchCommand> for Command {
    fn from(cmd: SearchCommand) -> Self {
        match cmd {
            SearchCommand::FetchDomain {
                seq,
                domain,
                purpose,
            } => Command::FetchDomain {
                seq,
                domain,
                purpose,
            },
            SearchCommand::OpenInBrowser(email) => Command::OpenInBrowser(email),
            SearchCommand::Save { path, email } => Command::SaveEmail { path, email },
        }
    }
}

impl From<FeedCommand> for Command {
    fn from(cmd: FeedCommand) -> Self {
        match cmd {
            FeedCommand::Generate { count } => Command::GenerateFeed { count },
            FeedCommand::RefreshBatch { delay } => Command::RefreshFeed { delay },
            FeedCommand::Tick { chance } => Command::FeedTick { chance },
        }
    }
}

/// Execute a command on a worker thread and return the resulting message.
pub fn run_command(cmd: Command, api: &dyn InboxApi) -> Msg {
    match cmd {
        Command::FetchInbox { address } => {
            let result = api.fetch_inbox(&address).map_err(|err| {
                warn!(%address, error = %err, "inbox fetch failed");
                inbox_error_message(&err)
            });
            if let Ok(emails) = &result {
                info!(%address, count = emails.len(), "inbox loaded");
            }
            Msg::Dashboard(DashboardMsg::Loaded { address, result })
        }
        Command::FetchDomain {
            seq,
            domain,
            purpose,
        } => {
            let result = api.fetch_domain(&domain, None).map_err(|err| {
                warn!(%domain, error = %err, "domain fetch failed");
                err.to_string()
            });
            Msg::Search(SearchMsg::Loaded {
                seq,
                purpose,
                result,
            })
        }
        Command::OpenInBrowser(email) => {
            Msg::BrowserOpened(export::open_in_browser(&email).map_err(|e| format!("{e:#}")))
        }
        Command::SaveEmail { path, email } => Msg::ExportCompleted(
            export::write_html(&path, &email)
                .map(|_| path)
                .map_err(|e| format!("{e:#}")),
        ),
        Command::OpenUrl(url) => match open::that(&url) {
            Ok(()) => Msg::LinkOpened(Ok(url)),
            Err(err) => {
                warn!(%url, error = %err, "failed to open link");
                Msg::LinkOpened(Err(err.to_string()))
            }
        },
        Command::GenerateFeed { count } => {
            let now = Utc::now();
            let emails = MockFeedGenerator::default().initial(count, now);
            Msg::Feed(FeedMsg::Loaded { emails, at: now })
        }
        Command::RefreshFeed { delay } => {
            std::thread::sleep(delay);
            let now = Utc::now();
            let emails = MockFeedGenerator::default().refresh_batch(now);
            Msg::Feed(FeedMsg::Refreshed { emails, at: now })
        }
        Command::FeedTick { chance } => {
            let now = Utc::now();
            let email = MockFeedGenerator::default().tick(chance, now);
            Msg::Feed(FeedMsg::TickResult { email, at: now })
        }
    }
}

/// Any HTTP status failure collapses to one fixed message; other failures keep their text.
fn inbox_error_message(err: &ApiError) -> String {
    if err.status().is_some() {
        INBOX_FETCH_FAILED.to_string()
    } else {
        err.to_string()
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// In-memory API keyed by address or domain, recording every call.
    #[derive(Default)]
    struct FakeApi {
        inboxes: HashMap<String, Vec<FetchedEmail>>,
        domains: HashMap<String, Vec<FetchedEmail>>,
        fail_status: Option<u16>,
        calls: Mutex<Vec<String>>,
    }

    impl InboxApi for FakeApi {
        fn fetch_inbox(&self, address: &str) -> Result<Vec<FetchedEmail>, ApiError> {
            self.calls.lock().unwrap().push(format!("to={address}"));
            if let Some(status) = self.fail_status {
                return Err(ApiError::Status {
                    status,
                    body: "boom".into(),
                });
            }
            Ok(self.inboxes.get(address).cloned().unwrap_or_default())
        }

        fn fetch_domain(
            &self,
            domain: &str,
            _subject: Option<&str>,
        ) -> Result<Vec<FetchedEmail>, ApiError> {
            self.calls.lock().unwrap().push(format!("domain={domain}"));
            if let Some(status) = self.fail_status {
                return Err(ApiError::Status {
                    status,
                    body: String::new(),
                });
            }
            Ok(self.domains.get(domain).cloned().unwrap_or_default())
        }
    }

    fn email(id: &str, to: &str, subject: &str) -> FetchedEmail {
        FetchedEmail {
            id: id.into(),
            to: to.into(),
            subject: subject.into(),
            body: format!("<p>{subject}</p>"),
            ..Default::default()
        }
    }

    fn model() -> AppModel {
        AppModel::new(&AppConfig::default())
    }

    /// Apply `msg` and run every resulting command to completion.
    fn drive(model: &mut AppModel, msg: Msg, api: &dyn InboxApi) {
        let mut queue = vec![msg];
        while let Some(msg) = queue.pop() {
            let mut cmds = Vec::new();
            update(model, msg, &mut cmds);
            queue.extend(cmds.into_iter().map(|cmd| run_command(cmd, api)));
        }
    }

    #[test]
    fn picking_a_service_opens_verification_with_accent() {
        let mut model = model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Services(ServicesMsg::Picked {
                name: "NF".into(),
                color: "#b91c1c".into(),
            }),
            &mut cmds,
        );

        assert_eq!(
            model.route,
            Route::Verification {
                service: "NF".into()
            }
        );
        assert_eq!(model.path_input, "/NF/verification");
        assert_eq!(model.history, vec![Route::ServicePicker]);
        assert!(cmds.is_empty());
    }

    #[test]
    fn submitting_address_loads_dashboard() {
        let mut api = FakeApi::default();
        api.inboxes.insert(
            "me@brarov.tech".into(),
            vec![email("1", "me@brarov.tech", "Code")],
        );
        let mut model = model();

        drive(
            &mut model,
            Msg::NavigatePath("/NF/verification".into()),
            &api,
        );
        drive(
            &mut model,
            Msg::AddressForm(AddressFormMsg::InputChanged(" me@brarov.tech ".into())),
            &api,
        );
        drive(&mut model, Msg::AddressForm(AddressFormMsg::Submit), &api);

        assert_eq!(
            model.route,
            Route::Dashboard {
                address: "me@brarov.tech".into()
            }
        );
        assert_eq!(model.path_input, "/dashboard/me%40brarov.tech");
        assert_eq!(model.dashboard.emails().len(), 1);
        assert!(!model.dashboard.is_loading());
        assert_eq!(*api.calls.lock().unwrap(), vec!["to=me@brarov.tech"]);
    }

    #[test]
    fn inbox_status_errors_use_fixed_message() {
        let api = FakeApi {
            fail_status: Some(500),
            ..Default::default()
        };
        let mut model = model();

        drive(
            &mut model,
            Msg::Navigate(Route::Dashboard {
                address: "me@brarov.tech".into(),
            }),
            &api,
        );

        assert_eq!(model.dashboard.error(), Some(INBOX_FETCH_FAILED));
    }

    #[test]
    fn back_returns_to_previous_route() {
        let api = FakeApi::default();
        let mut model = model();
        drive(&mut model, Msg::Navigate(Route::Search), &api);
        drive(&mut model, Msg::Navigate(Route::Feed), &api);

        drive(&mut model, Msg::Back, &api);
        assert_eq!(model.route, Route::Search);
        drive(&mut model, Msg::Back, &api);
        assert_eq!(model.route, Route::ServicePicker);
        drive(&mut model, Msg::Back, &api);
        assert_eq!(model.route, Route::ServicePicker);
    }

    #[test]
    fn navigating_to_current_route_does_not_grow_history() {
        let mut model = model();
        let mut cmds = Vec::new();

        update(&mut model, Msg::Navigate(Route::Search), &mut cmds);
        update(&mut model, Msg::NavigatePath("/search/".into()), &mut cmds);

        assert_eq!(model.history.len(), 1);
    }

    #[test]
    fn unknown_path_shows_not_found() {
        let mut model = model();
        let mut cmds = Vec::new();

        update(&mut model, Msg::NavigatePath("/nope/at/all".into()), &mut cmds);

        assert_eq!(
            model.route,
            Route::NotFound {
                path: "/nope/at/all".into()
            }
        );
    }

    #[test]
    fn receiver_search_then_open_inbox() {
        let mut api = FakeApi::default();
        api.domains.insert(
            "brarov.tech".into(),
            vec![
                email("1", "a@brarov.tech", "x"),
                email("2", "a@brarov.tech", "y"),
            ],
        );
        let mut model = model();
        drive(&mut model, Msg::Navigate(Route::Search), &api);

        drive(&mut model, Msg::Search(SearchMsg::SearchReceivers), &api);
        assert_eq!(model.search.receivers(), ["a@brarov.tech"]);

        drive(
            &mut model,
            Msg::Search(SearchMsg::OpenInbox("a@brarov.tech".into())),
            &api,
        );
        assert_eq!(
            model.route,
            Route::Dashboard {
                address: "a@brarov.tech".into()
            }
        );
    }

    #[test]
    fn domain_status_error_shows_server_text_or_fallback() {
        let api = FakeApi {
            fail_status: Some(500),
            ..Default::default()
        };
        let mut model = model();

        drive(&mut model, Msg::Search(SearchMsg::SearchReceivers), &api);

        assert_eq!(model.search.domain_error(), Some("Request failed"));
    }

    #[test]
    fn entering_feed_generates_initial_batch() {
        let api = FakeApi::default();
        let mut model = model();

        drive(&mut model, Msg::Navigate(Route::Feed), &api);

        assert_eq!(model.feed.emails().len(), 25);
        assert!(model.feed.last_refresh().is_some());
    }

    #[test]
    fn saving_email_writes_file_and_sets_status() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mail.html");
        let api = FakeApi::default();
        let mut model = model();

        drive(
            &mut model,
            Msg::Dashboard(DashboardMsg::Loaded {
                address: String::new(),
                result: Ok(vec![email("1", "me@brarov.tech", "Hello")]),
            }),
            &api,
        );
        drive(&mut model, Msg::Dashboard(DashboardMsg::Select(0)), &api);
        drive(
            &mut model,
            Msg::Dashboard(DashboardMsg::Body(
                crate::ui::components::email_body::EmailBodyMsg::SaveTo(path.clone()),
            )),
            &api,
        );

        assert!(path.exists());
        assert!(model.error.is_none());
        assert!(
            model
                .status
                .as_deref()
                .is_some_and(|s| s.starts_with("Email saved"))
        );
    }

    #[test]
    fn failed_export_opens_error_modal() {
        let mut model = model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::ExportCompleted(Err("disk full".into())),
            &mut cmds,
        );

        assert_eq!(model.error.as_deref(), Some("Failed to save email:\n\ndisk full"));
        update(&mut model, Msg::DismissError, &mut cmds);
        assert!(model.error.is_none());
    }

    #[test]
    fn contact_link_becomes_open_url_command() {
        let mut model = model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::AddressForm(AddressFormMsg::OpenLink("https://t.me/x".into())),
            &mut cmds,
        );

        assert_eq!(cmds, vec![Command::OpenUrl("https://t.me/x".into())]);
    }
}
