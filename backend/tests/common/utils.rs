use axum::response::Response;
use http_body_util::BodyExt;
use uuid::Uuid;

/// Multipart form body builder
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("----registration-test-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Adds a plain text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Adds a file field, with a `Content-Type` header only when one is given
    pub fn file(
        mut self,
        name: &str,
        filename: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Self {
        let mut headers = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n",
            self.boundary
        );
        if let Some(content_type) = content_type {
            headers.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        headers.push_str("\r\n");

        self.body.extend_from_slice(headers.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Adds a file field whose `Content-Disposition` carries no `filename`
    pub fn unnamed_file(mut self, name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Value of the request `Content-Type` header
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Finished body including the closing boundary
    pub fn into_body(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

/// Complete registration form with a PNG image
pub fn registration_form(user_id: &str, filename: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .text("user_id", user_id)
        .text("name", "Ada Lovelace")
        .text("address", "12 St James's Square, London")
        .file("image", filename, Some("image/png"), data)
}

/// Small fake PNG payload
pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&[0u8; 64]);
    data
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Collect response body as text
pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Blob name at the end of an image URL
pub fn blob_name_from_url(image_url: &str) -> &str {
    image_url
        .rsplit('/')
        .next()
        .expect("image url must contain a blob name")
}
