//! Member profiles, profile photos and contacts.

use super::{Directory, media};
use crate::cache::{QueryCache, QueryState};
use crate::config::MediaConfig;
use crate::error::{ClientError, ClientResult};
use crate::mutation::MutationTracker;
use crate::notify::Notices;
use butterfly_api::{Backend, CommunityProfile, MediaBlob, MediaKind, Principal};
use std::sync::Arc;
use tracing::{Instrument, info};

/// Profile service.
pub struct Profiles {
    backend: Arc<dyn Backend>,
    notices: Arc<Notices>,
    directory: Arc<Directory>,
    limits: MediaConfig,
    profiles: QueryCache<Principal, CommunityProfile>,
    photos: QueryCache<Principal, Option<MediaBlob>>,
    contacts: QueryCache<Principal, Vec<Principal>>,
    save: MutationTracker,
    upload: MutationTracker,
    connect: MutationTracker,
}

impl Profiles {
    pub fn new(
        backend: Arc<dyn Backend>,
        notices: Arc<Notices>,
        directory: Arc<Directory>,
        limits: MediaConfig,
    ) -> Self {
        Self {
            backend,
            notices,
            directory,
            limits,
            profiles: QueryCache::new("profile"),
            photos: QueryCache::new("profile_photo"),
            contacts: QueryCache::new("contacts"),
            save: MutationTracker::new(),
            upload: MutationTracker::new(),
            connect: MutationTracker::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Load `user`'s profile.
    pub async fn profile(
        &self,
        caller: Option<&Principal>,
        user: &Principal,
    ) -> QueryState<CommunityProfile> {
        let backend = Arc::clone(&self.backend);
        self.profiles
            .fetch(caller, user.clone(), || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_community_profile(caller, user).await?)
            })
            .await
    }

    /// Load the caller's own profile.
    pub async fn my_profile(&self, caller: Option<&Principal>) -> QueryState<CommunityProfile> {
        match caller {
            Some(me) => self.profile(Some(me), me).await,
            None => QueryState::Idle,
        }
    }

    /// Load `user`'s profile photo.
    pub async fn photo(
        &self,
        caller: Option<&Principal>,
        user: &Principal,
    ) -> QueryState<Option<MediaBlob>> {
        let backend = Arc::clone(&self.backend);
        self.photos
            .fetch(caller, user.clone(), || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_profile_photo(caller, user).await?)
            })
            .await
    }

    /// Load `user`'s contacts.
    pub async fn contacts(
        &self,
        caller: Option<&Principal>,
        user: &Principal,
    ) -> QueryState<Vec<Principal>> {
        let backend = Arc::clone(&self.backend);
        self.contacts
            .fetch(caller, user.clone(), || async move {
                let caller = caller.ok_or(ClientError::Unauthenticated)?;
                Ok(backend.get_contacts(caller, user).await?)
            })
            .await
    }

    pub fn peek_profile(
        &self,
        caller: Option<&Principal>,
        user: &Principal,
    ) -> QueryState<CommunityProfile> {
        self.profiles.peek(caller, user)
    }

    pub fn profile_needs_fetch(&self, caller: Option<&Principal>, user: &Principal) -> bool {
        self.profiles.needs_fetch(caller, user)
    }

    pub fn contacts_need_fetch(&self, caller: Option<&Principal>, user: &Principal) -> bool {
        self.contacts.needs_fetch(caller, user)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the caller's profile.
    pub async fn update(&self, caller: &Principal, profile: CommunityProfile) -> ClientResult<()> {
        let result = self
            .save
            .run(async { Ok(self.backend.update_community_profile(caller, profile).await?) })
            .instrument(crate::telemetry::spans::mutation("update_community_profile"))
            .await;

        match result {
            Ok(()) => {
                self.profiles.invalidate(caller, caller);
                self.directory.invalidate_all(caller);
                self.notices.success("Profile saved!");
                Ok(())
            }
            Err(e) => {
                self.notices.error("Failed to save profile");
                Err(e)
            }
        }
    }

    /// Upload a new profile photo for the caller.
    pub async fn upload_photo(&self, caller: &Principal, blob: MediaBlob) -> ClientResult<()> {
        if let Err(e) = media::validate(&blob, MediaKind::Image, &self.limits) {
            self.notices.error(e.to_string());
            return Err(e);
        }

        let result = self
            .upload
            .run(async { Ok(self.backend.upload_profile_photo(caller, blob).await?) })
            .instrument(crate::telemetry::spans::mutation("upload_profile_photo"))
            .await;

        match result {
            Ok(()) => {
                self.photos.invalidate(caller, caller);
                self.profiles.invalidate(caller, caller);
                self.notices.success("Photo uploaded!");
                Ok(())
            }
            Err(e) => {
                self.notices.error("Failed to upload photo");
                Err(e)
            }
        }
    }

    /// Send a connection request to the principal typed in `user_text`.
    pub async fn connect(&self, caller: &Principal, user_text: &str) -> ClientResult<()> {
        let Ok(target) = Principal::from_text(user_text) else {
            self.notices.error("Invalid user ID");
            return Err(ClientError::validation("Invalid user ID"));
        };

        let result = self
            .connect
            .run(async { Ok(self.backend.add_contact(caller, &target).await?) })
            .instrument(crate::telemetry::spans::mutation("add_contact"))
            .await;

        match result {
            Ok(()) => {
                info!(principal = %caller, target = %target, "Connection request sent");
                self.invalidate_contacts(caller, &target);
                self.notices.success("Connection request sent!");
                Ok(())
            }
            Err(e) => {
                self.notices.error("Failed to send connection request");
                Err(e)
            }
        }
    }

    /// Accept a pending request from `requester`.
    pub async fn accept(&self, caller: &Principal, requester: &Principal) -> ClientResult<()> {
        let result = self
            .connect
            .run(async { Ok(self.backend.accept_contact(caller, requester).await?) })
            .instrument(crate::telemetry::spans::mutation("accept_contact"))
            .await;

        match result {
            Ok(()) => {
                self.invalidate_contacts(caller, requester);
                self.notices.success("Connection accepted!");
                Ok(())
            }
            Err(e) => {
                self.notices.error("Failed to accept connection");
                Err(e)
            }
        }
    }

    /// Forget everything cached for `principal`.
    pub fn purge(&self, principal: &Principal) {
        self.profiles.purge(principal);
        self.photos.purge(principal);
        self.contacts.purge(principal);
    }

    fn invalidate_contacts(&self, caller: &Principal, other: &Principal) {
        self.contacts.invalidate(caller, caller);
        self.contacts.invalidate(caller, other);
    }
}
