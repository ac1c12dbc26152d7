use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub(crate) fn is_numeric(s: &str) -> bool {
    lazy_static! {
        static ref NUMERIC_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
    }
    NUMERIC_RE.is_match(s)
}

/// Parses a non-negative decimal id or count; anything else is `None`.
pub(crate) fn parse_numeric(s: &str) -> Option<i64> {
    if !is_numeric(s) {
        return None;
    }
    s.parse::<i64>().ok()
}

/// Requested window into a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub size: i64,
}

impl Paging {
    /// Returns `None` (no pagination) unless both values are numeric and
    /// `size` is at least one.
    pub fn parse(page: Option<&str>, size: Option<&str>) -> Option<Self> {
        let page = parse_numeric(page?)?;
        let size = parse_numeric(size?)?;
        if size < 1 {
            return None;
        }
        Some(Self { page, size })
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub last: bool,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: i64,
    pub page: i64,
    pub number_of_elements: i64,
}

impl<T> Page<T> {
    /// `total_elements` is the size of the whole matching set, not of
    /// `content`.
    pub fn new(content: Vec<T>, paging: Option<Paging>, total_elements: i64) -> Self {
        let total_elements = total_elements.max(0);
        let number_of_elements = content.len() as i64;
        match paging {
            Some(Paging { page, size }) => {
                let total_pages = total_pages(total_elements, size);
                Self {
                    content,
                    last: page.saturating_add(1) >= total_pages,
                    total_elements,
                    total_pages,
                    size,
                    page,
                    number_of_elements,
                }
            }
            None => Self {
                content,
                last: true,
                total_elements,
                total_pages: if total_elements > 0 { 1 } else { 0 },
                size: total_elements,
                page: 0,
                number_of_elements,
            },
        }
    }
}

/// `ceil(total / size)`, floored at zero.
pub fn total_pages(total: i64, size: i64) -> i64 {
    if total <= 0 || size <= 0 {
        return 0;
    }
    (total - 1) / size + 1
}
