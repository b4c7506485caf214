//! Request identifiers.

use http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use ulid::Ulid;

/// Make a [Ulid] request identifier, used with
/// `ServiceBuilderExt::set_request_id`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUlid;

impl MakeRequestId for MakeRequestUlid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let req_id = Ulid::new().to_string().parse().ok()?;
        Some(RequestId::new(req_id))
    }
}
