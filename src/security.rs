//! Content-Security-Policy header.
//!
//! A static allow-list of the external origins permitted to supply
//! scripts, styles, fonts, images, and XHR targets (CDN-hosted icon and
//! script libraries, plus the Data Dragon image host). Built once at
//! router assembly and applied uniformly to every response; never
//! request-dependent.

use axum::http::HeaderValue;
use axum::http::header::CONTENT_SECURITY_POLICY;
use tower_http::set_header::SetResponseHeaderLayer;

/// `unsafe-inline` is required for the icon library's injected styles.
const DIRECTIVES: &[(&str, &[&str])] = &[
    ("default-src", &["'self'"]),
    (
        "script-src",
        &[
            "'self'",
            "*.fontawesome.com",
            "*.jquery.com",
            "*.jsdelivr.net",
            "*.cloudflare.com",
            "'unsafe-inline'",
        ],
    ),
    ("connect-src", &["'self'", "ka-f.fontawesome.com"]),
    (
        "style-src",
        &["'self'", "*.fontawesome.com", "*.jsdelivr.net", "*.cloudflare.com", "'unsafe-inline'"],
    ),
    ("font-src", &["'self'", "*.fontawesome.com"]),
    ("script-src-attr", &["'self'", "'unsafe-inline'"]),
    ("img-src", &["'self'", "ddragon.leagueoflegends.com"]),
];

#[must_use]
pub(crate) fn csp_value() -> String {
    DIRECTIVES
        .iter()
        .map(|(directive, sources)| format!("{directive} {}", sources.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Layer that stamps the policy onto every response.
#[must_use]
pub fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    let value = HeaderValue::from_str(&csp_value())
        .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"));
    SetResponseHeaderLayer::overriding(CONTENT_SECURITY_POLICY, value)
}

#[cfg(test)]
#[path = "security_test.rs"]
mod tests;
