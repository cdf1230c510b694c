use super::types::{DocumentId, DocumentStore, Result, StoreError};
use crate::config::{AppConfig, EndpointConfig};
use crate::upload::PendingFile;
use crate::utils::headers::header_map;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::debug;

/// `DocumentStore` backed by the blob service's HTTP API.
pub struct HttpDocumentStore {
    client: Client,
    base_url: Url,
    endpoints: EndpointConfig,
    headers: HeaderMap,
}

impl HttpDocumentStore {
    pub fn new(base_url: &str, endpoints: EndpointConfig, headers: HeaderMap) -> Result<Self> {
        Self::with_client(Client::new(), base_url, endpoints, headers)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        endpoints: EndpointConfig,
        headers: HeaderMap,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            endpoints,
            headers,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.endpoints.clone(),
            header_map(&config.headers),
        )
    }

    /// Appends `path` (and optionally one extra, percent-encoded segment) to
    /// the base URL, keeping any prefix the base URL already has.
    fn endpoint_url(&self, path: &str, segment: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if let Some(segment) = segment {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    fn ensure_success(response: &Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Status(status))
        }
    }

    async fn read_document_list(response: Response) -> Result<Vec<DocumentId>> {
        Self::ensure_success(&response)?;
        response
            .json::<Vec<DocumentId>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list(&self) -> Result<Vec<DocumentId>> {
        let url = self.endpoint_url(&self.endpoints.list, None)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::read_document_list(response).await
    }

    async fn upload(&self, files: &[PendingFile]) -> Result<Vec<DocumentId>> {
        let url = self.endpoint_url(&self.endpoints.upload, None)?;

        let mut form = Form::new();
        for file in files {
            let content = tokio::fs::read(&file.path)
                .await
                .map_err(|source| StoreError::Io {
                    path: file.path.clone(),
                    source,
                })?;
            let part = Part::bytes(content).file_name(file.name.clone());
            form = form.part("files", part);
        }

        debug!("POST {} ({} files)", url, files.len());
        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .multipart(form)
            .send()
            .await?;
        Self::read_document_list(response).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint_url(&self.endpoints.delete, Some(id))?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::ensure_success(&response)
    }

    async fn delete_all(&self) -> Result<()> {
        let url = self.endpoint_url(&self.endpoints.delete_all, None)?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::ensure_success(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use std::path::PathBuf;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use crate::upload::FileCollector;
    use tempfile::TempDir;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn store_with_headers(base_url: &str, headers: HeaderMap) -> HttpDocumentStore {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpDocumentStore::with_client(client, base_url, EndpointConfig::default(), headers)
            .unwrap()
    }

    fn store(base_url: &str) -> HttpDocumentStore {
        store_with_headers(base_url, HeaderMap::new())
    }

    /// Reads one request: the head, then a body framed by `Content-Length`
    /// or chunked encoding.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                return String::from_utf8_lossy(&request).to_string();
            }
        };

        let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
        let content_length = head.lines().find_map(|line| {
            line.strip_prefix("content-length:")
                .and_then(|value| value.trim().parse::<usize>().ok())
        });
        let chunked = head.contains("transfer-encoding: chunked");

        loop {
            let body = &request[head_end..];
            let complete = match content_length {
                Some(length) => body.len() >= length,
                None if chunked => body.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        String::from_utf8_lossy(&request).to_string()
    }

    /// Answers exactly one request with `status` and `body`, returning the
    /// raw request that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_endpoint_url_on_bare_host() {
        let store = store("http://localhost:5000");
        assert_eq!(
            store.endpoint_url("/getdata", None).unwrap().as_str(),
            "http://localhost:5000/getdata"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_base_prefix() {
        let store = store("http://localhost:5000/api/");
        assert_eq!(
            store.endpoint_url("/deleteall", None).unwrap().as_str(),
            "http://localhost:5000/api/deleteall"
        );
    }

    #[test]
    fn test_delete_url_encodes_identifier_as_one_segment() {
        let store = store("http://localhost:5000");
        assert_eq!(
            store
                .endpoint_url("/delete", Some("reports/q1 summary.pdf"))
                .unwrap()
                .as_str(),
            "http://localhost:5000/delete/reports%2Fq1%20summary.pdf"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result =
            HttpDocumentStore::new("not a url", EndpointConfig::default(), HeaderMap::new());
        assert!(matches!(result, Err(StoreError::InvalidUrl(_))));

        let result =
            HttpDocumentStore::new("mailto:someone", EndpointConfig::default(), HeaderMap::new());
        assert!(matches!(result, Err(StoreError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_list_parses_document_ids() {
        let (base_url, server) = serve_once("200 OK", r#"["a.pdf","b.pdf"]"#).await;

        let documents = store(&base_url).list().await.unwrap();
        assert_eq!(documents, vec!["a.pdf".to_string(), "b.pdf".to_string()]);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /getdata HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_list_reports_error_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", "{}").await;

        let result = store(&base_url).list().await;
        assert!(matches!(
            result,
            Err(StoreError::Status(status)) if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_rejects_unexpected_body() {
        let (base_url, server) = serve_once("200 OK", r#"{"blobs": []}"#).await;

        let result = store(&base_url).list().await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_sends_configured_headers() {
        let (base_url, server) = serve_once("200 OK", r#""ok""#).await;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static("secret"),
        );
        let store = store_with_headers(&base_url, headers);

        store.delete("a b.pdf").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /delete/a%20b.pdf HTTP/1.1"));
        assert!(request.contains("x-api-key: secret"));
    }

    #[tokio::test]
    async fn test_upload_fails_on_unreadable_file() {
        let missing = PathBuf::from("/definitely/not/here.pdf");
        let files = vec![PendingFile::new(missing.clone(), "here.pdf".to_string(), 0)];

        let result = store("http://127.0.0.1:9").upload(&files).await;
        assert!(matches!(result, Err(StoreError::Io { path, .. }) if path == missing));
    }

    #[tokio::test]
    async fn test_upload_sends_one_files_part_per_file() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(docs.join("q1")).unwrap();
        std::fs::write(docs.join("a.pdf"), "alpha-bytes").unwrap();
        std::fs::write(docs.join("q1").join("summary.md"), "summary-bytes").unwrap();
        let files = FileCollector::from_folder(&docs);
        assert_eq!(files.len(), 2);

        let (base_url, server) = serve_once("200 OK", r#"["old.pdf","a.pdf","summary.md"]"#).await;

        let documents = store(&base_url).upload(&files).await.unwrap();
        assert_eq!(
            documents,
            vec![
                "old.pdf".to_string(),
                "a.pdf".to_string(),
                "summary.md".to_string()
            ]
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /upload HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: multipart/form-data; boundary="));
        assert_eq!(request.matches("name=\"files\"").count(), 2);
        assert!(request.contains("filename=\"a.pdf\""));
        assert!(request.contains("filename=\"summary.md\""));
        assert!(!request.contains("docs/q1"));
        assert!(request.contains("alpha-bytes"));
        assert!(request.contains("summary-bytes"));
    }

    #[tokio::test]
    async fn test_upload_reports_error_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, "a").unwrap();
        let files = FileCollector::from_paths(&[path]);

        let (base_url, server) = serve_once("413 Payload Too Large", "{}").await;

        let result = store(&base_url).upload(&files).await;
        assert!(matches!(
            result,
            Err(StoreError::Status(status)) if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_all_posts_to_deleteall() {
        let (base_url, server) = serve_once("200 OK", r#""ok""#).await;

        store(&base_url).delete_all().await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /deleteall HTTP/1.1"));
    }
}
