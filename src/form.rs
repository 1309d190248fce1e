//! Multipart payloads for product writes.

use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use shelf_core::ProductInput;

use crate::error::{Error, Result};

/// A binary image attached to a create or update request.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk, guessing the content type from its extension.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidImage(format!("No file name in {}", path.display())))?
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }
}

/// Form fields plus image for `register-with-image` and update requests.
///
/// Every field is always present: optional barcode and category are sent
/// as empty strings when the input leaves them out.
#[derive(Debug, Clone)]
pub struct ProductForm {
    fields: Vec<(&'static str, String)>,
    image: ImageFile,
}

impl ProductForm {
    pub fn new(input: &ProductInput, image: ImageFile) -> Self {
        let fields = vec![
            ("title", input.title.clone()),
            ("price", input.price.to_string()),
            ("description", input.description.clone()),
            ("barcode", input.barcode.clone().unwrap_or_default()),
            ("category", input.category.clone().unwrap_or_default()),
        ];
        Self { fields, image }
    }

    /// Text fields in submission order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn image(&self) -> &ImageFile {
        &self.image
    }

    pub fn into_multipart(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }

        let part = Part::stream(self.image.bytes)
            .file_name(self.image.file_name)
            .mime_str(&self.image.content_type)
            .map_err(|e| Error::InvalidImage(e.to_string()))?;

        Ok(form.part("image", part))
    }
}
