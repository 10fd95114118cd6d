use crate::error::RemindError;
use actix_web::HttpRequest;
use remind_domain::ID;

const USER_ID_HEADER: &str = "remind-user-id";

/// Resolves the calling user's identity. Session verification happens at
/// the edge before requests reach this service, here the identity header
/// only needs to be present and well formed.
pub fn protect_route(http_req: &HttpRequest) -> Result<ID, RemindError> {
    let header = http_req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            RemindError::Unauthorized(format!(
                "Request is missing the `{}` header",
                USER_ID_HEADER
            ))
        })?;

    header
        .parse::<ID>()
        .map_err(|_| RemindError::Unauthorized(format!("Malformed user id: {}", header)))
}
