use async_trait::async_trait;
use common::actor::MessageResponse;
use common::movie::{MovieListItem, MoviePage};

use super::{Notification, PAGE_LIMIT, Pager, SearchState};
use crate::client::ApiClient;
use crate::error::ApiError;

#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn get_movies(&self, page_no: u64, limit: u64) -> Result<MoviePage, ApiError>;
    async fn search_movies(&self, title: &str) -> Result<Vec<MovieListItem>, ApiError>;
    async fn delete_movie(&self, id: &str) -> Result<MessageResponse, ApiError>;
}

#[async_trait]
impl MovieApi for ApiClient {
    async fn get_movies(&self, page_no: u64, limit: u64) -> Result<MoviePage, ApiError> {
        ApiClient::get_movies(self, page_no, limit).await
    }

    async fn search_movies(&self, title: &str) -> Result<Vec<MovieListItem>, ApiError> {
        ApiClient::search_movies(self, title).await
    }

    async fn delete_movie(&self, id: &str) -> Result<MessageResponse, ApiError> {
        ApiClient::delete_movie(self, id).await
    }
}

/// Paginated, searchable movie list; same navigation rules as the actor list.
pub struct MovieListView<A> {
    api: A,
    pub movies: Vec<MovieListItem>,
    pub results: Vec<MovieListItem>,
    pub selected_movie: Option<MovieListItem>,
    pub busy: bool,
    pub pager: Pager,
    pub search: SearchState,
    notifications: Vec<Notification>,
}

impl<A: MovieApi> MovieListView<A> {
    pub fn new(api: A) -> Self {
        Self::with_limit(api, PAGE_LIMIT)
    }

    pub fn with_limit(api: A, limit: u64) -> Self {
        Self {
            api,
            movies: Vec::new(),
            results: Vec::new(),
            selected_movie: None,
            busy: false,
            pager: Pager::new(limit),
            search: SearchState::default(),
            notifications: Vec::new(),
        }
    }

    pub fn reached_to_end(&self) -> bool {
        self.pager.reached_to_end
    }

    pub async fn fetch(&mut self, page_no: u64) {
        match self.api.get_movies(page_no, self.pager.limit).await {
            Err(e) => self.notifications.push(Notification::error(e.error)),
            Ok(page) if page.movies.is_empty() => self.pager.mark_end(page_no),
            Ok(page) => self.movies = page.movies,
        }
    }

    pub async fn next(&mut self) {
        match self.pager.next_page() {
            Ok(page_no) => self.fetch(page_no).await,
            Err(msg) => self.notifications.push(Notification::error(msg)),
        }
    }

    pub async fn prev(&mut self) {
        match self.pager.prev_page() {
            Ok(page_no) => self.fetch(page_no).await,
            Err(msg) => self.notifications.push(Notification::error(msg)),
        }
    }

    pub async fn search(&mut self, title: &str) {
        self.search.begin();
        match self.api.search_movies(title).await {
            Ok(results) => {
                self.search.finish(results.len());
                self.results = results;
            }
            Err(e) => {
                self.search.abort();
                self.notifications.push(Notification::error(e.error));
            }
        }
    }

    pub fn reset_search(&mut self) {
        self.search.reset();
        self.results.clear();
    }

    pub fn visible(&self) -> &[MovieListItem] {
        if self.showing_search() {
            &self.results
        } else {
            &self.movies
        }
    }

    pub fn shows_pagination(&self) -> bool {
        !self.showing_search()
    }

    fn showing_search(&self) -> bool {
        !self.results.is_empty() || self.search.result_not_found
    }

    pub fn on_movie_update(&mut self, movie: MovieListItem) {
        for list in [&mut self.movies, &mut self.results] {
            if let Some(slot) = list.iter_mut().find(|m| m.id == movie.id) {
                *slot = movie.clone();
            }
        }
    }

    pub fn select(&mut self, movie: MovieListItem) {
        self.selected_movie = Some(movie);
    }

    pub async fn confirm_delete(&mut self) {
        let Some(movie) = self.selected_movie.clone() else {
            return;
        };

        self.busy = true;
        let result = self.api.delete_movie(&movie.id).await;
        self.busy = false;

        match result {
            Err(e) => self.notifications.push(Notification::error(e.error)),
            Ok(res) => {
                self.fetch(self.pager.current_page_no).await;
                self.selected_movie = None;
                self.notifications.push(Notification::success(res.message));
            }
        }
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}
