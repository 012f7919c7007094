use crate::request::{CloudFrontEvent, CloudFrontRequest, EdgeError};
use std::borrow::Cow;
use tracing::{info, warn};

/// Drop the first path segment so `/<bucket>/<key>` maps onto the origin's `/<key>`
///
/// - `/seg/rest/of/path` -> `/rest/of/path`
/// - `/seg` and `/` -> `/`
/// - paths without a leading `/` are returned unchanged
pub fn strip_first_segment(path: &str) -> Cow<'_, str> {
    let Some(rest) = path.strip_prefix('/') else {
        warn!(uri = %path, "Request path is not rooted, leaving it unchanged");
        return Cow::Borrowed(path);
    };

    match rest.find('/') {
        Some(idx) => Cow::Borrowed(&rest[idx..]),
        None => Cow::Borrowed("/"),
    }
}

/// Rewrite the request's `uri`, leaving every other field alone
pub fn rewrite_request(mut request: CloudFrontRequest) -> CloudFrontRequest {
    let rewritten = strip_first_segment(&request.uri).into_owned();
    info!(from = %request.uri, to = %rewritten, "Rewrote request path");
    request.uri = rewritten;
    request
}

/// Origin-request entry point: extract the request and rewrite it
pub fn handle_event(event: CloudFrontEvent) -> Result<CloudFrontRequest, EdgeError> {
    Ok(rewrite_request(event.into_request()?))
}
