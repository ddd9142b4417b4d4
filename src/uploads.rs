use serde::Serialize;

/// Marker every stored proof-of-payment path is anchored to
const UPLOADS_MARKER: &str = "/uploads/";

/// Map a raw stored path into a canonical path starting at `/uploads/`.
///
/// Stored paths come from mixed-OS upload pipelines, so backslashes are
/// rewritten first. When the marker appears more than once the last
/// occurrence wins; the marker comparison is case-insensitive but the
/// remainder keeps its original casing.
pub(crate) fn normalize_upload_path(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let slashed = raw.replace('\\', "/");
    let lowered = slashed.to_ascii_lowercase();

    if let Some(idx) = lowered.rfind(UPLOADS_MARKER) {
        let remainder = &slashed[idx + UPLOADS_MARKER.len()..];
        return format!("/uploads/{remainder}");
    }

    // No marker: a bare `uploads/...` path only needs its leading slash,
    // anything else gets rooted under /uploads/
    if lowered.starts_with("uploads/") {
        let remainder = &slashed["uploads/".len()..];
        return format!("/uploads/{remainder}");
    }

    format!("/uploads/{}", slashed.trim_start_matches('/'))
}

/// Resolve a raw stored path against the configured backend origin.
///
/// Inputs already carrying a scheme are treated as pre-normalized and
/// returned unchanged, which also makes re-application idempotent.
/// Empty or missing input resolves to an empty string.
pub(crate) fn resolve_upload_url(base_url: &str, raw: Option<&str>) -> String {
    let raw = raw.unwrap_or("");
    if raw.is_empty() {
        return String::new();
    }
    if raw.contains("://") {
        return raw.to_string();
    }

    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        normalize_upload_path(raw)
    )
}

/// How the admin UI should render a proof-of-payment asset.
/// Unknown or missing MIME hints fall back to a generic file link
/// instead of failing the detail view.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ProofKind {
    Image,
    Pdf,
    File,
}

impl ProofKind {
    pub(crate) fn from_mimetype(mimetype: Option<&str>) -> Self {
        match mimetype {
            Some(m) if m.starts_with("image/") => ProofKind::Image,
            Some("application/pdf") => ProofKind::Pdf,
            _ => ProofKind::File,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:5000";

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_upload_path(""), "");
        assert_eq!(resolve_upload_url(BASE, None), "");
        assert_eq!(resolve_upload_url(BASE, Some("")), "");
    }

    #[test]
    fn test_windows_style_path() {
        assert_eq!(
            resolve_upload_url(BASE, Some("C:\\uploads\\receipts\\img1.png")),
            "http://localhost:5000/uploads/receipts/img1.png"
        );
    }

    #[test]
    fn test_marker_case_insensitive() {
        assert_eq!(
            normalize_upload_path("/var/data/Uploads/proof.PDF"),
            "/uploads/proof.PDF"
        );
        assert_eq!(
            normalize_upload_path("srv/UPLOADS/a/B.png"),
            "/uploads/a/B.png"
        );
    }

    #[test]
    fn test_last_marker_wins() {
        assert_eq!(
            normalize_upload_path("/uploads/old/uploads/new/img.png"),
            "/uploads/new/img.png"
        );
    }

    #[test]
    fn test_bare_uploads_prefix() {
        assert_eq!(
            normalize_upload_path("uploads/receipts/img1.png"),
            "/uploads/receipts/img1.png"
        );
    }

    #[test]
    fn test_no_marker_gets_rooted() {
        assert_eq!(
            normalize_upload_path("receipts/img1.png"),
            "/uploads/receipts/img1.png"
        );
        assert_eq!(
            normalize_upload_path("///receipts/img1.png"),
            "/uploads/receipts/img1.png"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_upload_path("var/www/uploads/img.png");
        assert_eq!(normalize_upload_path(&once), once);
    }

    #[test]
    fn test_absolute_url_unchanged() {
        let absolute = "http://cdn.example.com/uploads/img.png";
        assert_eq!(resolve_upload_url(BASE, Some(absolute)), absolute);

        // Re-resolving an already-resolved URL must not double-prefix
        let resolved = resolve_upload_url(BASE, Some("uploads/img.png"));
        assert_eq!(resolve_upload_url(BASE, Some(&resolved)), resolved);
    }

    #[test]
    fn test_base_trailing_slash() {
        assert_eq!(
            resolve_upload_url("http://localhost:5000/", Some("uploads/a.png")),
            "http://localhost:5000/uploads/a.png"
        );
    }

    #[test]
    fn test_proof_kind_from_mimetype() {
        assert_eq!(ProofKind::from_mimetype(Some("image/png")), ProofKind::Image);
        assert_eq!(
            ProofKind::from_mimetype(Some("application/pdf")),
            ProofKind::Pdf
        );
        assert_eq!(
            ProofKind::from_mimetype(Some("application/octet-stream")),
            ProofKind::File
        );
        assert_eq!(ProofKind::from_mimetype(None), ProofKind::File);
    }
}
