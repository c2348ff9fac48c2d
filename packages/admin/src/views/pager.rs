pub const LAST_PAGE: &str = "You are on the last page";
pub const FIRST_PAGE: &str = "You are on the first page";

/// Zero-based page counter that learns where the list ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current_page_no: u64,
    pub reached_to_end: bool,
    pub limit: u64,
}

impl Pager {
    pub fn new(limit: u64) -> Self {
        Self {
            current_page_no: 0,
            reached_to_end: false,
            limit,
        }
    }

    /// Advance, unless the end is already known.
    pub fn next_page(&mut self) -> Result<u64, &'static str> {
        if self.reached_to_end {
            return Err(LAST_PAGE);
        }
        self.current_page_no += 1;
        Ok(self.current_page_no)
    }

    /// Step back; leaving the end page makes forward navigation possible again.
    pub fn prev_page(&mut self) -> Result<u64, &'static str> {
        if self.current_page_no == 0 {
            return Err(FIRST_PAGE);
        }
        self.reached_to_end = false;
        self.current_page_no -= 1;
        Ok(self.current_page_no)
    }

    /// An empty page came back: pin the counter there and stop moving forward.
    pub fn mark_end(&mut self, page_no: u64) {
        self.current_page_no = page_no;
        self.reached_to_end = true;
    }
}
