use std::fmt;

use axum::{
    http::{header, HeaderName, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

/// A Content-Security-Policy as an ordered list of directives.
#[derive(Debug, Clone)]
pub struct ContentSecurityPolicy {
    directives: Vec<(&'static str, Vec<String>)>,
}

impl ContentSecurityPolicy {
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
        }
    }

    /// Appends `sources` to `directive`, creating it if needed.
    pub fn directive<I, T>(mut self, directive: &'static str, sources: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let sources = sources.into_iter().map(Into::into);
        match self.directives.iter_mut().find(|(name, _)| *name == directive) {
            Some((_, existing)) => existing.extend(sources),
            None => self.directives.push((directive, sources.collect())),
        }
        self
    }

    pub fn header_value(&self) -> Result<HeaderValue, header::InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_string())
    }
}

impl Default for ContentSecurityPolicy {
    /// The policy served by the signup site.
    fn default() -> Self {
        Self::new()
            .directive("default-src", ["'self'"])
            .directive("base-uri", ["'self'"])
            .directive("font-src", ["'self'", "https:", "data:"])
            .directive("form-action", ["'self'"])
            .directive("frame-ancestors", ["'self'"])
            .directive("img-src", ["'self'", "data:"])
            .directive("object-src", ["'none'"])
            .directive(
                "script-src",
                ["'self'", "https://www.gstatic.com", "https://cdnjs.cloudflare.com"],
            )
            .directive("script-src-attr", ["'none'"])
            .directive(
                "style-src",
                [
                    "'self'",
                    "'unsafe-inline'",
                    "https://www.gstatic.com",
                    "https://fonts.googleapis.com",
                ],
            )
            .directive("connect-src", ["'self'"])
            .directive("upgrade-insecure-requests", Vec::<String>::new())
    }
}

impl fmt::Display for ContentSecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, sources)) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(name)?;
            for source in sources {
                write!(f, " {source}")?;
            }
        }
        Ok(())
    }
}

/// Hardening headers sent alongside the CSP.
fn baseline_headers() -> [(HeaderName, HeaderValue); 11] {
    [
        (
            HeaderName::from_static("cross-origin-opener-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            HeaderValue::from_static("same-origin"),
        ),
        (
            HeaderName::from_static("origin-agent-cluster"),
            HeaderValue::from_static("?1"),
        ),
        (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ),
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
        (
            HeaderName::from_static("x-download-options"),
            HeaderValue::from_static("noopen"),
        ),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
        ),
        (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
    ]
}

/// Wraps every route of `router` with the security headers.
pub fn apply(
    mut router: Router,
    csp: &ContentSecurityPolicy,
) -> Result<Router, header::InvalidHeaderValue> {
    router = router.layer(SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        csp.header_value()?,
    ));
    for (name, value) in baseline_headers() {
        router = router.layer(SetResponseHeaderLayer::overriding(name, value));
    }
    Ok(router)
}
