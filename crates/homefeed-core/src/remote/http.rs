//! Blocking HTTP exchange over libcurl.
//!
//! Runs in the current thread; the REST store calls it from `spawn_blocking`.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Header lines, `Name: value`.
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub(crate) fn perform(req: &HttpRequest) -> Result<HttpResponse, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(&req.url)?;
    easy.follow_location(true)?;
    easy.connect_timeout(req.connect_timeout)?;
    easy.timeout(req.timeout)?;

    match req.method {
        Method::Get => easy.get(true)?,
        Method::Post => easy.post(true)?,
        Method::Patch | Method::Delete => easy.custom_request(req.method.as_str())?,
    }
    if let Some(body) = &req.body {
        // POSTFIELDS keeps the custom verb set above.
        easy.post_fields_copy(body)?;
    }

    let mut list = curl::easy::List::new();
    for line in &req.headers {
        list.append(line)?;
    }
    easy.http_headers(list)?;

    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(HttpResponse { status, body })
}
