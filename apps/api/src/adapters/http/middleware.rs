use axum::{extract::Request, http::header::AUTHORIZATION, middleware::Next, response::Response};

/// Bearer credential presented with the request, if any.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub Option<String>);

pub async fn bearer_middleware(mut request: Request, next: Next) -> Response {
    let token = bearer_from_header(&request);
    request.extensions_mut().insert(BearerToken(token));
    next.run(request).await
}

fn bearer_from_header(req: &Request) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
