//! Client controller.
//!
//! [`App`] ties the session, the capability cache, the location and the
//! feature services together. A render pass is synchronous and reads only
//! cache slots of the current identity; [`App::settle`] drives the loads a
//! render depends on until nothing it needs is outstanding.
//!
//! Capability loads happen in two stages. Eligibility comes first because
//! the navigation gate needs it on every path. Ban status and role are only
//! needed once a protected page is about to render, and are loaded
//! concurrently since neither depends on the other. The age gate needs ban
//! status alone, so a banned member who never confirmed still sees the
//! banned view.

use crate::cache::CapabilityCache;
use crate::config::{self, ClientConfig, ValidationError};
use crate::error::ClientResult;
use crate::features::{AgeGate, AgeGateForm, Directory, Forum, HelloCorner, Moderation, Profiles};
use crate::gate::{self, Eligibility, GateAction};
use crate::notify::Notices;
use crate::routes::{self, Route};
use crate::shell::{self, NavChrome, Page, Screen};
use crate::state::{Identity, Location, Session};
use crate::telemetry::spans;
use butterfly_api::{Backend, Principal};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{Instrument, debug, info};

/// The client core.
pub struct App {
    config: ClientConfig,
    session: Arc<Session>,
    capabilities: Arc<CapabilityCache>,
    location: Mutex<Location>,
    notices: Arc<Notices>,
    age_gate: AgeGate,
    forum: Forum,
    hello_corner: HelloCorner,
    directory: Arc<Directory>,
    profiles: Profiles,
    moderation: Moderation,
}

impl App {
    /// Build a client talking to `backend`, starting logged out at `/`.
    pub fn new(config: ClientConfig, backend: Arc<dyn Backend>) -> Self {
        let notices = Arc::new(Notices::new());
        let capabilities = Arc::new(CapabilityCache::new(Arc::clone(&backend)));
        let directory = Arc::new(Directory::new(Arc::clone(&backend)));
        let pages = &config.pagination;

        Self {
            session: Arc::new(Session::new()),
            location: Mutex::new(Location::default()),
            age_gate: AgeGate::new(Arc::clone(&capabilities), Arc::clone(&notices)),
            forum: Forum::new(
                Arc::clone(&backend),
                Arc::clone(&notices),
                pages.threads_page_size,
            ),
            hello_corner: HelloCorner::new(
                Arc::clone(&backend),
                Arc::clone(&notices),
                config.media.clone(),
                pages.messages_page_size,
            ),
            profiles: Profiles::new(
                Arc::clone(&backend),
                Arc::clone(&notices),
                Arc::clone(&directory),
                config.media.clone(),
            ),
            moderation: Moderation::new(
                backend,
                Arc::clone(&capabilities),
                Arc::clone(&notices),
                pages.reports_page_size,
            ),
            directory,
            capabilities,
            notices,
            config,
        }
    }

    /// Validate `config` first, reporting every problem found.
    pub fn try_new(
        config: ClientConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, Vec<ValidationError>> {
        config::validate(&config)?;
        Ok(Self::new(config, backend))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn capabilities(&self) -> &Arc<CapabilityCache> {
        &self.capabilities
    }

    pub fn notices(&self) -> &Arc<Notices> {
        &self.notices
    }

    pub fn age_gate(&self) -> &AgeGate {
        &self.age_gate
    }

    pub fn forum(&self) -> &Forum {
        &self.forum
    }

    pub fn hello_corner(&self) -> &HelloCorner {
        &self.hello_corner
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn moderation(&self) -> &Moderation {
        &self.moderation
    }

    /// The current identity's principal.
    pub fn principal(&self) -> Option<Principal> {
        self.session.principal()
    }

    // ========================================================================
    // Navigation & identity
    // ========================================================================

    /// The current path.
    pub fn path(&self) -> String {
        self.location.lock().path().to_string()
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.location.lock().history_len()
    }

    /// User navigation to `path`.
    pub fn navigate(&self, path: &str) {
        debug!(path = %path, "Navigate");
        self.location.lock().push(path);
    }

    /// Install `identity`, forgetting everything cached for the one it
    /// replaced.
    pub fn login(&self, identity: Identity) {
        if let Some(previous) = self.session.login(identity) {
            self.purge(previous.principal());
        }
    }

    /// Drop the identity and its cached state, then go to the landing page.
    pub fn logout(&self) {
        if let Some(previous) = self.session.logout() {
            self.purge(previous.principal());
        }
        self.location.lock().push(routes::LANDING);
    }

    fn purge(&self, principal: &Principal) {
        info!(principal = %principal, "Purging cached state");
        self.capabilities.purge(principal);
        self.forum.purge(principal);
        self.hello_corner.purge(principal);
        self.directory.purge(principal);
        self.profiles.purge(principal);
        self.moderation.purge(principal);
    }

    /// Confirm the current identity's eligibility from the age-gate form.
    pub async fn confirm_age(&self, form: &AgeGateForm) -> ClientResult<()> {
        let principal = self.session.principal();
        self.age_gate.confirm(principal.as_ref(), form).await
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// One synchronous render pass.
    ///
    /// The gate runs before any route resolves; its redirects replace the
    /// current history entry.
    pub fn render(&self) -> Screen {
        let principal = self.session.principal();
        let me = principal.as_ref();
        let eligibility = Eligibility::from(&self.capabilities.eligibility(me));

        let route = {
            let mut location = self.location.lock();
            match gate::evaluate(me.is_some(), eligibility, location.path()) {
                GateAction::Suspend => return Screen::Loading,
                GateAction::Redirect(to) => {
                    debug!(from = %location.path(), to = to, "Gate redirect");
                    location.replace(to);
                }
                GateAction::Proceed => {}
            }
            Route::parse(location.path())
        };

        match route {
            Route::Landing => Screen::Landing,
            Route::AgeGate => shell::entry(&self.capabilities.ban_status(me), Screen::AgeGate),
            Route::NotFound => Screen::NotFound,
            protected => {
                let page = self.page_for(protected, me);
                let nav = NavChrome::new(self.capabilities.is_admin(me));
                shell::protect(&self.capabilities.ban_status(me), nav, page)
            }
        }
    }

    /// Load what the current render depends on, then render.
    pub async fn settle(&self) -> Screen {
        let principal = self.session.principal();
        let span = spans::session(principal.as_ref().map(Principal::as_str))
            .in_scope(|| spans::render(&self.path()));
        async {
            loop {
                let screen = self.render();
                let principal = self.session.principal();
                let me = principal.as_ref();
                if me.is_none() {
                    return screen;
                }

                if self.capabilities.eligibility_needs_fetch(me) {
                    self.capabilities.load_eligibility(me).await;
                    continue;
                }

                let eligible =
                    Eligibility::from(&self.capabilities.eligibility(me)) == Eligibility::Eligible;
                let route = Route::parse(&self.path());
                let protected = eligible && route.is_protected();
                // the age gate is outside the shell but still shows a ban
                if !protected && route != Route::AgeGate {
                    return screen;
                }

                let need_ban = self.capabilities.ban_needs_fetch(me);
                let need_role = protected && self.capabilities.role_needs_fetch(me);
                if !need_ban && !need_role {
                    return screen;
                }
                tokio::join!(
                    async {
                        if need_ban {
                            self.capabilities.load_ban_status(me).await;
                        }
                    },
                    async {
                        if need_role {
                            self.capabilities.load_role(me).await;
                        }
                    },
                );
            }
        }
        .instrument(span)
        .await
    }

    fn page_for(&self, route: Route, me: Option<&Principal>) -> Page {
        match route {
            Route::PostDetail { post_id } => Page::PostDetail { post_id },
            Route::ProfileMe => Page::ProfileMe,
            Route::ProfileView { user_id } => Page::ProfileView { user_id },
            Route::Directory => Page::Directory,
            Route::Connections => Page::Connections,
            Route::ThreadDetail { thread_id } => Page::ThreadDetail {
                thread_id: thread_id.parse().ok(),
            },
            Route::Guidelines => Page::Guidelines,
            Route::Moderation => Page::Moderation(self.moderation.permissions(me)),
            // only protected routes reach here
            Route::Feed | Route::Landing | Route::AgeGate | Route::NotFound => Page::Feed,
        }
    }
}
