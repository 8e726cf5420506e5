//! The list helper shared by tables, detail lists and action links

use regalia_common::humanize;
use regalia_format::ValueFormatter;

use crate::params::RequestParams;

/// Renders listings for one request.
///
/// Holds the formatter for captions and values and the request whose
/// parameters sort links are built from.
#[derive(Debug, Clone)]
pub struct ListHelper<'a> {
    formatter: &'a ValueFormatter,
    request: RequestParams,
}

impl<'a> ListHelper<'a> {
    pub fn new(formatter: &'a ValueFormatter, request: RequestParams) -> Self {
        Self { formatter, request }
    }

    pub fn formatter(&self) -> &'a ValueFormatter {
        self.formatter
    }

    pub fn request(&self) -> &RequestParams {
        &self.request
    }

    /// Translation of `key`, or the humanized last key segment.
    pub(crate) fn t_or_humanize(&self, key: &str) -> String {
        self.formatter.t(key).unwrap_or_else(|| {
            let last = key.rsplit('.').next().unwrap_or(key);
            humanize(last)
        })
    }
}
