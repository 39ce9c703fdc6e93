//! URL string composition

/// Strip leading and trailing `/` or `\` from one path part.
fn trim_part(part: &str) -> &str {
    part.trim_matches(['/', '\\'])
}

/// Join an endpoint and path segments with single `/` separators.
///
/// With no segments the endpoint is returned unchanged. Otherwise the
/// endpoint and every segment are trimmed of `/` and `\` edges and joined
/// in order.
pub fn compose_url(endpoint: &str, segments: &[String]) -> String {
    if segments.is_empty() {
        return endpoint.to_string();
    }

    let mut parts = Vec::with_capacity(segments.len() + 1);
    parts.push(trim_part(endpoint));
    parts.extend(segments.iter().map(|s| trim_part(s)));

    parts.join("/")
}
