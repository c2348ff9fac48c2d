/// Progress of a search box: running, finished with hits, or finished empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    pub searching: bool,
    pub result_not_found: bool,
}

impl SearchState {
    pub fn begin(&mut self) {
        self.searching = true;
        self.result_not_found = false;
    }

    pub fn finish(&mut self, hits: usize) {
        self.searching = false;
        self.result_not_found = hits == 0;
    }

    /// The search failed; neither results nor "not found" apply.
    pub fn abort(&mut self) {
        self.searching = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
