//! Edge Rewriter
//!
//! CloudFront origin-request function for a distribution that fronts several
//! S3 buckets. Each bucket is exposed under a cache behavior matching
//! `/<bucket-name>/*`; the function strips that leading segment so the request
//! reaches the bucket origin at the object's real key.
//!
//! Lambda@Edge only runs the managed Node.js and Python runtimes, so this
//! binary is not attached to the distribution directly. It serves origin
//! requests behind a supported runtime shim that forwards the CloudFront event
//! and returns the rewritten request unchanged.
//!
//! ```text
//! viewer ─▶ CloudFront /docs-111122223333/guide.pdf ─▶ edge-rewriter ─▶ S3 origin /guide.pdf
//! ```

pub mod config;
pub mod request;
pub mod rewrite;

pub use config::Config;
pub use request::{CloudFrontEvent, CloudFrontRequest, EdgeError};
pub use rewrite::{handle_event, rewrite_request, strip_first_segment};
