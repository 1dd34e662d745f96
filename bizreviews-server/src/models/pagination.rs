//! Offset/limit pagination for `GET /businesses`

use serde::Deserialize;

use super::ValidationError;

/// Default items per page
pub const DEFAULT_LIMIT: i64 = 3;

/// Pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip
    pub offset: i64,
    /// Rows to return (at least 1)
    pub limit: i64,
}

impl Page {
    /// Create a page, rejecting a negative offset or a non-positive limit.
    pub fn new(offset: i64, limit: i64) -> Result<Self, ValidationError> {
        if offset < 0 {
            return Err(ValidationError::InvalidQuery { param: "offset" });
        }
        if limit < 1 {
            return Err(ValidationError::InvalidQuery { param: "limit" });
        }
        Ok(Self { offset, limit })
    }

    /// The page after this one, if a page of `returned` rows suggests more.
    ///
    /// A full page is taken as "maybe more"; no total count is consulted,
    /// so the last page of an exact multiple still links to an empty page.
    pub fn next(&self, returned: usize) -> Option<Page> {
        if returned as i64 == self.limit {
            Some(Self {
                offset: self.offset + self.limit,
                limit: self.limit,
            })
        } else {
            None
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Raw query parameters; parsed by hand so that junk maps to a JSON 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

/// First occurrence of each key wins; unknown keys are ignored.
impl FromIterator<(String, String)> for PageParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "offset" => &mut params.offset,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

impl TryFrom<PageParams> for Page {
    type Error = ValidationError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        let offset = parse_param("offset", params.offset, 0)?;
        let limit = parse_param("limit", params.limit, DEFAULT_LIMIT)?;
        Page::new(offset, limit)
    }
}

fn parse_param(
    param: &'static str,
    raw: Option<String>,
    default: i64,
) -> Result<i64, ValidationError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidQuery { param }),
    }
}
