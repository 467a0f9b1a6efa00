//! Error types

use domops_css::CssError;
use domops_dom::DomError;
use domops_html::HtmlError;

/// domops errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was omitted or has the wrong shape
    #[error("argument error: {0}")]
    Argument(String),

    #[error(transparent)]
    Selector(#[from] CssError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] HtmlError),
}

impl Error {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
