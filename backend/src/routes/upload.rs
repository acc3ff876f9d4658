use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart},
    Extension, Json,
};
use registration_storage::user::{NewUserRecord, UserStore};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    media_storage::{generate_blob_name, BlobStore},
    types::AppError,
};

/// Prefix every accepted image content type starts with
const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub user_id: String,
    pub name: String,
    pub address: String,
    /// Public URL of the stored image
    pub image_url: String,
    /// Id assigned to the stored record
    pub database_id: i32,
}

/// File part of the registration form
struct ImagePart {
    filename: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// Registration form with every required part present
struct UploadForm {
    user_id: String,
    name: String,
    address: String,
    image: ImagePart,
}

impl UploadForm {
    /// Reads the whole multipart body, buffering the image in memory
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut user_id = None;
        let mut name = None;
        let mut address = None;
        let mut image = None;

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(ToString::to_string);

            match field_name.as_deref() {
                Some("user_id") => user_id = Some(field.text().await?),
                Some("name") => name = Some(field.text().await?),
                Some("address") => address = Some(field.text().await?),
                Some("image") => {
                    let filename = field.file_name().map(ToString::to_string);
                    let content_type = field.content_type().map(ToString::to_string);
                    let data = field.bytes().await?;

                    image = Some(ImagePart {
                        filename,
                        content_type,
                        data,
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            user_id: user_id.ok_or_else(|| AppError::missing_field("user_id"))?,
            name: name.ok_or_else(|| AppError::missing_field("name"))?,
            address: address.ok_or_else(|| AppError::missing_field("address"))?,
            image: image.ok_or_else(|| AppError::missing_field("image"))?,
        })
    }
}

/// Whether the declared content type names an image
fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with(IMAGE_CONTENT_TYPE_PREFIX)
}

/// Uploads the image and registers the user
///
/// 1. Rejects files whose declared content type is not `image/*`
/// 2. Stores the image under `<uuid>.<original extension>`
/// 3. Inserts a user record pointing at the image URL
///
/// Any failure after validation is reported as a 500 prefixed with
/// `Upload failed:`. A failed insert leaves the stored image in place.
///
/// # Errors
///
/// - 400 when the body is not `multipart/form-data`
/// - 422 when a form part is missing
/// - 400 when the file is not an image
/// - 500 when the object store or the database fails
#[instrument(skip(media_storage, user_store, multipart))]
pub async fn upload_user_data(
    Extension(media_storage): Extension<Arc<dyn BlobStore>>,
    Extension(user_store): Extension<Arc<dyn UserStore>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let form = UploadForm::from_multipart(multipart?).await?;

    let content_type = form
        .image
        .content_type
        .clone()
        .filter(|content_type| is_image_content_type(content_type))
        .ok_or_else(|| AppError::bad_request("File must be an image"))?;

    store_upload(media_storage.as_ref(), user_store.as_ref(), form, &content_type)
        .await
        .map(Json)
        .map_err(|err| AppError::internal(format!("Upload failed: {}", err.detail())))
}

async fn store_upload(
    media_storage: &dyn BlobStore,
    user_store: &dyn UserStore,
    form: UploadForm,
    content_type: &str,
) -> Result<UploadResponse, AppError> {
    let UploadForm {
        user_id,
        name,
        address,
        image,
    } = form;

    let blob_name = generate_blob_name(image.filename.as_deref().unwrap_or_default());
    let size = image.data.len();

    media_storage
        .upload(&blob_name, content_type, image.data)
        .await?;

    let image_url = media_storage.blob_url(&blob_name);
    tracing::info!(%blob_name, %image_url, size, "Stored image");

    let record = user_store
        .insert(NewUserRecord {
            user_id: user_id.clone(),
            name: name.clone(),
            address: address.clone(),
            image_url: image_url.clone(),
        })
        .await
        .inspect_err(|err| {
            tracing::error!(%blob_name, "Image stored without a user record: {err}");
        })?;

    tracing::info!(database_id = record.id, %user_id, "Registered user");

    Ok(UploadResponse {
        message: "User data uploaded successfully".to_string(),
        user_id,
        name,
        address,
        image_url,
        database_id: record.id,
    })
}
