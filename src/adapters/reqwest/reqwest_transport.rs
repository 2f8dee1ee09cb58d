// HttpTransport over a real network connection.
//
// The cookie store is enabled so the HttpOnly session cookie set by the
// backend on login is sent back on every later request, the same way a
// browser would do it.

use crate::core::ports::{
    ApiRequest, ApiResponse, FormPart, HttpTransport, Method, RequestBody, TransportError,
};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};

#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| TransportError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = request.url.clone();
        let connection_error = |e: reqwest::Error| TransportError::Connection {
            url: url.clone(),
            reason: e.to_string(),
        };

        let mut builder = self.client.request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(to_form(parts).map_err(&connection_error)?),
        };

        let response = builder.send().await.map_err(&connection_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(&connection_error)?.to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn to_form(parts: Vec<FormPart>) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let mut file = Part::bytes(bytes).file_name(file_name);
                if let Some(content_type) = content_type {
                    file = file.mime_str(&content_type)?;
                }
                form.part(name, file)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod reqwest_transport_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Method::Get, reqwest::Method::GET)]
    #[case(Method::Put, reqwest::Method::PUT)]
    #[case(Method::Delete, reqwest::Method::DELETE)]
    fn it_should_map_methods(#[case] method: Method, #[case] expected: reqwest::Method) {
        assert_eq!(to_reqwest_method(method), expected);
    }

    #[rstest]
    fn it_should_reject_malformed_part_content_types() {
        let result = to_form(vec![FormPart::File {
            name: "files".into(),
            file_name: "a.jpg".into(),
            content_type: Some("not a mime".into()),
            bytes: vec![1, 2, 3],
        }]);
        assert!(result.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_unreachable_hosts_as_connection_errors() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .send(ApiRequest {
                method: Method::Get,
                url: "http://127.0.0.1:1/me".into(),
                headers: Vec::new(),
                body: RequestBody::Empty,
            })
            .await;
        assert!(matches!(result, Err(TransportError::Connection { .. })));
    }
}
