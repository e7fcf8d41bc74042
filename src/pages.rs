//! Page registry — the fixed set of pre-rendered pages.
//!
//! DESIGN
//! ======
//! Each page is `header + body + footer`, composed exactly once at startup
//! from fragment files under the public directory. The registry is
//! immutable for the process lifetime and injected into handlers through
//! `AppState` rather than looked up ambiently. A missing or unreadable
//! fragment is a startup precondition failure, never a request-time error.

use std::path::{Path, PathBuf};

pub const NOTICE_ALREADY_LOGGED_IN: &str =
    "You are already logged in. Please logout before signing up as a new user";
pub const NOTICE_NOT_AUTHORIZED: &str = "Sorry but you are not authorized to view this page";
pub const NOTICE_NOT_FOUND: &str = "Sorry the page doesn't exist";

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("page fragment {path}: {source}")]
    Fragment {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Raw fragment sources, read once before composition.
pub(crate) struct Fragments {
    pub header: String,
    pub footer: String,
    pub frontpage: String,
    pub login: String,
    pub signup: String,
    pub link_account: String,
    pub profile: String,
}

/// Fully composed pages, shared read-only across all requests.
#[derive(Debug)]
pub struct PageRegistry {
    /// Kept uncomposed for rendering inline notices.
    header: String,
    pub frontpage: String,
    pub login: String,
    pub signup: String,
    pub link_account: String,
    pub profile: String,
}

impl PageRegistry {
    /// Read every fragment under `public_dir` and compose the page set.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first fragment that is missing or
    /// unreadable. The caller treats this as fatal.
    pub fn load(public_dir: &Path) -> Result<Self, PageError> {
        let fragments = Fragments {
            header: read_fragment(public_dir, "header/header.html")?,
            footer: read_fragment(public_dir, "footer/footer.html")?,
            frontpage: read_fragment(public_dir, "frontpage/frontpage.html")?,
            login: read_fragment(public_dir, "login/login.html")?,
            signup: read_fragment(public_dir, "signup/signup.html")?,
            link_account: read_fragment(public_dir, "linkaccount/linkaccount.html")?,
            profile: read_fragment(public_dir, "profile/profile.html")?,
        };
        Ok(Self::compose(fragments))
    }

    pub(crate) fn compose(fragments: Fragments) -> Self {
        let Fragments { header, footer, frontpage, login, signup, link_account, profile } = fragments;
        let page = |body: &str| format!("{header}{body}{footer}");

        Self {
            frontpage: page(&frontpage),
            login: page(&login),
            signup: page(&signup),
            link_account: page(&link_account),
            profile: page(&profile),
            header,
        }
    }

    /// Render an inline notice (401/404 bodies) under the shared header.
    #[must_use]
    pub fn notice(&self, message: &str) -> String {
        format!("{}<h4>{message}</h4>", self.header)
    }
}

fn read_fragment(public_dir: &Path, relative: &str) -> Result<String, PageError> {
    let path = public_dir.join(relative);
    std::fs::read_to_string(&path).map_err(|source| PageError::Fragment { path, source })
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
