use quill_core::ports::HtmlSanitizer;

/// Whitelist-based sanitizer backed by ammonia's default policy.
///
/// Scripts, styles, event-handler attributes and `javascript:` URLs are
/// removed; ordinary formatting tags survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmmoniaSanitizer;

impl HtmlSanitizer for AmmoniaSanitizer {
    fn sanitize(&self, html: &str) -> String {
        ammonia::clean(html)
    }
}
