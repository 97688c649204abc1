//! Image upload API: multipart → decode → PNG + thumbnail → S3
//!
//! Trip photos, item photos and avatars share one pipeline. The image row
//! id is reserved first because object keys embed it.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;

use shared::error::{AppError, ErrorCode};
use shared::models::{Image, ImageEntity};

use crate::auth::UserIdentity;
use crate::db;
use crate::db::images::NewImage;
use crate::state::AppState;
use crate::storage::{self, ImageKeys};

use super::{ApiResult, internal};

/// Maximum file size (20MB)
const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Longest edge of the stored original
const MAX_DIMENSION: u32 = 1000;

/// Longest edge of the thumbnail
const THUMB_DIMENSION: u32 = 200;

/// Encoded original and thumbnail
#[derive(Debug)]
struct Processed {
    original: Vec<u8>,
    thumb: Vec<u8>,
}

/// Pull the `file` field out of a multipart body and check size and extension
pub(crate) async fn read_file_field(
    multipart: &mut Multipart,
    allowed_ext: &[&str],
) -> Result<(String, Vec<u8>), AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        if matches!(field.name(), Some("file") | Some("")) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?;
            file = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!("File too large: {} bytes (max {MAX_FILE_SIZE})", data.len()),
        ));
    }

    let ext = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !allowed_ext.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported format: {ext}. Supported: {}", allowed_ext.join(", ")),
        ));
    }

    Ok((filename, data))
}

/// Decode, apply EXIF orientation, bound the size and encode both PNGs
fn process(data: &[u8]) -> Result<Processed, AppError> {
    let invalid =
        |e: image::ImageError| AppError::with_message(ErrorCode::InvalidImageFile, e.to_string());

    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AppError::with_message(ErrorCode::InvalidImageFile, e.to_string()))?
        .into_decoder()
        .map_err(invalid)?;
    let orientation = decoder.orientation().map_err(invalid)?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(invalid)?;
    img.apply_orientation(orientation);

    let original = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.thumbnail(MAX_DIMENSION, MAX_DIMENSION)
    } else {
        img.clone()
    };
    let thumb = img.thumbnail(THUMB_DIMENSION, THUMB_DIMENSION);

    Ok(Processed {
        original: encode_png(&original)?,
        thumb: encode_png(&thumb)?,
    })
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Image encoding failed: {e}"),
            )
        })?;
    Ok(buffer)
}

/// Process and upload an image, then record it
async fn store_image(
    state: &AppState,
    user_id: i64,
    entity: ImageEntity,
    entity_id: Option<i64>,
    data: Vec<u8>,
) -> Result<Image, AppError> {
    let processed = tokio::task::spawn_blocking(move || process(&data))
        .await
        .map_err(internal)??;

    let image_id = db::images::next_id(&state.pool).await.map_err(internal)?;
    let keys = ImageKeys::new(user_id, entity, entity_id, image_id);

    for (key, bytes) in [
        (&keys.original, processed.original),
        (&keys.thumb, processed.thumb),
    ] {
        if let Err(e) = storage::put_png(&state.s3, key, bytes).await {
            tracing::error!(key = %key, error = %e, "S3 upload failed");
            storage::delete_all(&state.s3, &[keys.original.as_str(), keys.thumb.as_str()]).await;
            return Err(AppError::new(ErrorCode::FileStorageFailed));
        }
    }

    let url = state.s3.public_url(&keys.original);
    let url_thumb = state.s3.public_url(&keys.thumb);
    let new_image = NewImage {
        id: image_id,
        user_id,
        avatar: entity == ImageEntity::Avatar,
        trip_id: (entity == ImageEntity::Trip).then_some(entity_id).flatten(),
        item_id: (entity == ImageEntity::Item).then_some(entity_id).flatten(),
        s3_key: &keys.original,
        s3_key_thumb: &keys.thumb,
        url: &url,
        url_thumb: &url_thumb,
    };

    match db::images::insert(&state.pool, &new_image).await {
        Ok(image) => {
            tracing::info!(user_id, image_id, entity = %entity, "Image uploaded to S3");
            Ok(image)
        }
        Err(e) => {
            storage::delete_all(&state.s3, &[keys.original.as_str(), keys.thumb.as_str()]).await;
            Err(internal(e))
        }
    }
}

/// Delete an image's objects and row
pub(crate) async fn remove_image(state: &AppState, image: &Image) -> Result<(), AppError> {
    db::images::delete(&state.pool, image.id)
        .await
        .map_err(internal)?;
    storage::delete_all(&state.s3, &[image.s3_key.as_str(), image.s3_key_thumb.as_str()]).await;
    tracing::info!(user_id = image.user_id, image_id = image.id, "Image removed");
    Ok(())
}

/// POST /trip/{trip_id}/upload-image
pub async fn upload_trip_image(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
    mut multipart: Multipart,
) -> ApiResult<Image> {
    db::trips::find_owned(&state.pool, identity.user_id, trip_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::TripNotFound))?;

    let (_, data) = read_file_field(&mut multipart, SUPPORTED_FORMATS).await?;
    let image = store_image(&state, identity.user_id, ImageEntity::Trip, Some(trip_id), data).await?;
    Ok(Json(image))
}

/// POST /item/{item_id}/image
pub async fn upload_item_image(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(item_id): Path<i64>,
    mut multipart: Multipart,
) -> ApiResult<Image> {
    db::items::find(&state.pool, identity.user_id, item_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;

    let (_, data) = read_file_field(&mut multipart, SUPPORTED_FORMATS).await?;
    let image = store_image(&state, identity.user_id, ImageEntity::Item, Some(item_id), data).await?;
    Ok(Json(image))
}

/// POST /user/avatar
///
/// Replaces any previous avatar
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    mut multipart: Multipart,
) -> ApiResult<Image> {
    let (_, data) = read_file_field(&mut multipart, SUPPORTED_FORMATS).await?;
    let previous = db::images::find_avatar(&state.pool, identity.user_id)
        .await
        .map_err(internal)?;

    let image = store_image(&state, identity.user_id, ImageEntity::Avatar, None, data).await?;
    db::users::set_avatar_url(&state.pool, identity.user_id, Some(&image.url_thumb))
        .await
        .map_err(internal)?;

    if let Some(old) = previous {
        remove_image(&state, &old).await?;
    }
    Ok(Json(image))
}

/// DELETE /image/{image_id}
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(image_id): Path<i64>,
) -> ApiResult<bool> {
    let image = db::images::find_owned(&state.pool, identity.user_id, image_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ImageNotFound))?;

    remove_image(&state, &image).await?;
    if image.avatar {
        db::users::set_avatar_url(&state.pool, identity.user_id, None)
            .await
            .map_err(internal)?;
    }
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_process_bounds_sizes() {
        let processed = process(&png_bytes(2400, 1200)).unwrap();

        let original = image::load_from_memory(&processed.original).unwrap();
        assert_eq!((original.width(), original.height()), (1000, 500));

        let thumb = image::load_from_memory(&processed.thumb).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (200, 100));
    }

    #[test]
    fn test_process_keeps_small_original() {
        let processed = process(&png_bytes(300, 150)).unwrap();
        let original = image::load_from_memory(&processed.original).unwrap();
        assert_eq!((original.width(), original.height()), (300, 150));
    }

    #[test]
    fn test_process_rejects_garbage() {
        let err = process(b"definitely not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
