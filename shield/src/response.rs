use hyper::body::Bytes;
use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::convert::TryInto;

use crate::prelude::*;

const CONTENT_TYPE_TEXT: &str = "text/plain";
const CONTENT_TYPE_JSON: &str = "application/json";

/// # Blocking Response
///
/// The status code, header set and body issued in place of the downstream
/// response whenever a request is blocked.
///
/// Headers keep the configured order of values within each name. Issuing the
/// response writes the headers first, then the status, then the body, which
/// may be empty. `Content-Length` is left to hyper unless configured here.
#[derive(Clone, Debug)]
pub struct BlockingResponse {
    code: Status,
    headers: HeaderMap,
    body: Bytes,
}

impl BlockingResponse {
    pub fn new(code: Status) -> Self {
        Self {
            code,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn code(&self) -> Status {
        self.code
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub(crate) fn set_code(&mut self, code: Status) {
        self.code = code;
    }

    /// Append a value under `name`. Calling this repeatedly with the same name
    /// gives the header several values, issued in the order they were added.
    pub(crate) fn add_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    /// Set a plain text body along with its content type
    pub(crate) fn set_text(&mut self, text: String) {
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_TEXT),
        );
        self.body = Bytes::from(text);
    }

    /// Serialize `body` as the response body along with its content type
    pub(crate) fn set_json<T: serde::Serialize>(&mut self, body: &T) -> Result<(), ResponseError> {
        let json = serde_json::to_vec(body).map_err(ResponseError::SerializeJson)?;
        self.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        );
        self.body = Bytes::from(json);
        Ok(())
    }

    /// Write the configured headers onto `headers`.
    ///
    /// For every configured name, the first value replaces whatever `headers`
    /// already held under that name and the remaining values are appended
    /// after it. Names that are not configured are left alone.
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        for name in self.headers.keys() {
            let mut values = self.headers.get_all(name).iter();
            if let Some(first) = values.next() {
                headers.insert(name.clone(), first.clone());
            }
            for value in values {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    /// Build the outgoing response
    pub fn to_http(&self) -> HttpResponse {
        let mut resp = HttpResponse::new(HttpBody::empty());
        self.apply_headers(resp.headers_mut());
        *resp.status_mut() = self.code;
        *resp.body_mut() = HttpBody::from(self.body.clone());
        resp
    }
}

impl From<&BlockingResponse> for HttpResponse {
    fn from(value: &BlockingResponse) -> Self {
        value.to_http()
    }
}

impl From<BlockingResponse> for HttpResponse {
    fn from(value: BlockingResponse) -> Self {
        value.to_http()
    }
}

pub(crate) fn parse_status<T: TryInto<Status>>(code: T) -> Status {
    match code.try_into() {
        Ok(code) => code,
        Err(_) => panic!("Failed to parse input as http status code"),
    }
}

#[derive(Debug)]
pub enum ResponseError {
    SerializeJson(serde_json::Error),
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseError::SerializeJson(ref e) => {
                write!(f, "Failed to serialize json body: {}", e)
            }
        }
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResponseError::SerializeJson(ref e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> BlockingResponse {
        let mut r = BlockingResponse::new(Status::BAD_REQUEST);
        r.add_header(HeaderName::from_static("h"), HeaderValue::from_static("a"));
        r.add_header(HeaderName::from_static("h"), HeaderValue::from_static("b"));
        r.add_header(HeaderName::from_static("g"), HeaderValue::from_static("c"));
        r
    }

    fn values<'a>(headers: &'a HeaderMap, name: &str) -> Vec<&'a str> {
        headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn configured_values_displace_existing_ones() {
        let mut existing = HeaderMap::new();
        existing.append("h", HeaderValue::from_static("old-1"));
        existing.append("h", HeaderValue::from_static("old-2"));
        existing.append("untouched", HeaderValue::from_static("u"));

        configured().apply_headers(&mut existing);

        assert_eq!(values(&existing, "h"), vec!["a", "b"]);
        assert_eq!(values(&existing, "g"), vec!["c"]);
        assert_eq!(values(&existing, "untouched"), vec!["u"]);
    }

    #[tokio::test]
    async fn response_carries_code_headers_and_body() {
        let mut r = configured();
        r.set_body(Bytes::from_static(b"shield"));

        let resp = r.to_http();
        assert_eq!(resp.status(), Status::BAD_REQUEST);
        assert_eq!(values(resp.headers(), "h"), vec!["a", "b"]);
        assert_eq!(resp.headers().len(), 3);

        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"shield");
    }

    #[tokio::test]
    async fn empty_body_still_has_status_and_headers() {
        let resp = configured().to_http();
        assert_eq!(resp.status(), Status::BAD_REQUEST);
        assert_eq!(values(resp.headers(), "g"), vec!["c"]);

        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn text_and_json_set_content_type() {
        let mut r = BlockingResponse::new(Status::FORBIDDEN);
        r.set_text("nope".to_string());
        assert_eq!(r.headers()[header::CONTENT_TYPE], CONTENT_TYPE_TEXT);
        assert_eq!(&r.body()[..], b"nope");

        #[derive(serde::Serialize)]
        struct Rejection {
            message: &'static str,
        }
        r.set_json(&Rejection { message: "nope" }).unwrap();
        assert_eq!(r.headers()[header::CONTENT_TYPE], CONTENT_TYPE_JSON);
        assert_eq!(values(r.headers(), "content-type").len(), 1);
        assert_eq!(&r.body()[..], br#"{"message":"nope"}"#);
    }

    #[test]
    #[should_panic(expected = "status code")]
    fn zero_status_is_rejected() {
        parse_status(0u16);
    }
}
