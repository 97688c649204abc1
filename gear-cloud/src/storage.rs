//! Image object storage in S3
//!
//! Keys: `user/{user_id}/{entity}[/{entity_id}]/{image_id}.png`, thumbnail
//! next to it as `{image_id}-thumb.png`.

use shared::models::ImageEntity;

use crate::state::S3Storage;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Object keys of one stored image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageKeys {
    pub original: String,
    pub thumb: String,
}

impl ImageKeys {
    pub fn new(user_id: i64, entity: ImageEntity, entity_id: Option<i64>, image_id: i64) -> Self {
        let dir = match entity_id {
            Some(id) => format!("user/{user_id}/{entity}/{id}"),
            None => format!("user/{user_id}/{entity}"),
        };
        Self {
            original: format!("{dir}/{image_id}.png"),
            thumb: format!("{dir}/{image_id}-thumb.png"),
        }
    }
}

pub async fn put_png(s3: &S3Storage, key: &str, bytes: Vec<u8>) -> Result<(), BoxError> {
    s3.client
        .put_object()
        .bucket(&s3.bucket)
        .key(key)
        .body(bytes.into())
        .content_type("image/png")
        .send()
        .await?;
    Ok(())
}

/// Delete objects; failures are logged and skipped
pub async fn delete_all(s3: &S3Storage, keys: &[&str]) {
    for key in keys {
        if let Err(e) = s3
            .client
            .delete_object()
            .bucket(&s3.bucket)
            .key(*key)
            .send()
            .await
        {
            tracing::warn!(key = %key, error = %e, "S3 delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_keys() {
        let keys = ImageKeys::new(3, ImageEntity::Trip, Some(12), 99);
        assert_eq!(keys.original, "user/3/trip/12/99.png");
        assert_eq!(keys.thumb, "user/3/trip/12/99-thumb.png");

        let avatar = ImageKeys::new(3, ImageEntity::Avatar, None, 100);
        assert_eq!(avatar.original, "user/3/avatar/100.png");
    }
}
