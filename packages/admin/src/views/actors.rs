use async_trait::async_trait;
use common::actor::{ActorPage, ActorProfile, MessageResponse};

use super::{Notification, PAGE_LIMIT, Pager, SearchState};
use crate::client::ApiClient;
use crate::error::ApiError;

/// The calls the actor list needs.
#[async_trait]
pub trait ActorApi: Send + Sync {
    async fn get_actors(&self, page_no: u64, limit: u64) -> Result<ActorPage, ApiError>;
    async fn search_actor(&self, name: &str) -> Result<Vec<ActorProfile>, ApiError>;
    async fn delete_actor(&self, id: &str) -> Result<MessageResponse, ApiError>;
}

#[async_trait]
impl ActorApi for ApiClient {
    async fn get_actors(&self, page_no: u64, limit: u64) -> Result<ActorPage, ApiError> {
        ApiClient::get_actors(self, page_no, limit).await
    }

    async fn search_actor(&self, name: &str) -> Result<Vec<ActorProfile>, ApiError> {
        ApiClient::search_actor(self, name).await
    }

    async fn delete_actor(&self, id: &str) -> Result<MessageResponse, ApiError> {
        ApiClient::delete_actor(self, id).await
    }
}

/// Paginated, searchable list of actor profiles.
pub struct ActorListView<A> {
    api: A,
    pub actors: Vec<ActorProfile>,
    pub results: Vec<ActorProfile>,
    pub selected_profile: Option<ActorProfile>,
    pub busy: bool,
    pub pager: Pager,
    pub search: SearchState,
    notifications: Vec<Notification>,
}

impl<A: ActorApi> ActorListView<A> {
    pub fn new(api: A) -> Self {
        Self::with_limit(api, PAGE_LIMIT)
    }

    pub fn with_limit(api: A, limit: u64) -> Self {
        Self {
            api,
            actors: Vec::new(),
            results: Vec::new(),
            selected_profile: None,
            busy: false,
            pager: Pager::new(limit),
            search: SearchState::default(),
            notifications: Vec::new(),
        }
    }

    pub fn reached_to_end(&self) -> bool {
        self.pager.reached_to_end
    }

    /// Load a page. An empty page marks the end and keeps the current list on screen.
    pub async fn fetch(&mut self, page_no: u64) {
        match self.api.get_actors(page_no, self.pager.limit).await {
            Err(e) => self.notify(Notification::error(e.error)),
            Ok(page) if page.profiles.is_empty() => self.pager.mark_end(page_no),
            Ok(page) => self.actors = page.profiles,
        }
    }

    pub async fn next(&mut self) {
        match self.pager.next_page() {
            Ok(page_no) => self.fetch(page_no).await,
            Err(msg) => self.notify(Notification::error(msg)),
        }
    }

    pub async fn prev(&mut self) {
        match self.pager.prev_page() {
            Ok(page_no) => self.fetch(page_no).await,
            Err(msg) => self.notify(Notification::error(msg)),
        }
    }

    pub async fn search(&mut self, name: &str) {
        self.search.begin();
        match self.api.search_actor(name).await {
            Ok(results) => {
                self.search.finish(results.len());
                self.results = results;
            }
            Err(e) => {
                self.search.abort();
                self.notify(Notification::error(e.error));
            }
        }
    }

    pub fn reset_search(&mut self) {
        self.search.reset();
        self.results.clear();
    }

    /// Search results shadow the page while a search is showing.
    pub fn visible(&self) -> &[ActorProfile] {
        if self.showing_search() {
            &self.results
        } else {
            &self.actors
        }
    }

    /// Pagination controls only make sense for the plain list.
    pub fn shows_pagination(&self) -> bool {
        !self.showing_search()
    }

    fn showing_search(&self) -> bool {
        !self.results.is_empty() || self.search.result_not_found
    }

    /// Swap an edited profile into the list in place.
    pub fn on_actor_update(&mut self, profile: ActorProfile) {
        for list in [&mut self.actors, &mut self.results] {
            if let Some(slot) = list.iter_mut().find(|a| a.id == profile.id) {
                *slot = profile.clone();
            }
        }
    }

    pub fn select(&mut self, profile: ActorProfile) {
        self.selected_profile = Some(profile);
    }

    /// Delete the selected profile, then reload the current page from the server.
    pub async fn confirm_delete(&mut self) {
        let Some(profile) = self.selected_profile.clone() else {
            return;
        };

        self.busy = true;
        let result = self.api.delete_actor(&profile.id).await;
        self.busy = false;

        match result {
            Err(e) => self.notify(Notification::error(e.error)),
            Ok(res) => {
                self.fetch(self.pager.current_page_no).await;
                self.selected_profile = None;
                self.notify(Notification::success(res.message));
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Drain the notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
