//! Image editing boundary for the "magic edit" of a doll's picture.
//!
//! The editor is one opaque async call: image and prompt in, edited image or
//! nothing out. Fetching and converting the doll's current picture happens
//! before this boundary; callers hand in the bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::collection::Collection;

/// Raw image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn from_base64(mime_type: impl Into<String>, data: &str) -> Option<Self> {
        let bytes = STANDARD.decode(data.trim()).ok()?;
        Some(Self::new(mime_type, bytes))
    }

    /// Embed as a `data:` URL, usable as a doll image reference.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        Self::from_base64(mime_type, data)
    }

    /// Guess the MIME type from a file extension, defaulting to PNG.
    pub fn mime_type_for_extension(extension: Option<&str>) -> &'static str {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "image/png",
        }
    }
}

/// Edits an image according to a text prompt.
///
/// Returns `None` on any failure; implementations log the cause.
#[allow(async_fn_in_trait)]
pub trait ImageEditor {
    async fn request_image_edit(&self, image: &ImageData, prompt: &str) -> Option<ImageData>;
}

/// Editor for setups without an image service; every edit fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImageEditor;

impl ImageEditor for NoImageEditor {
    async fn request_image_edit(&self, _image: &ImageData, _prompt: &str) -> Option<ImageData> {
        None
    }
}

/// What the gallery should show after an edit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The doll now shows the edited picture.
    Applied,
    /// The editor produced nothing; offer the player another try.
    Retry,
    UnknownDoll,
}

/// Run a magic edit on a doll's picture and store the result in the collection.
pub async fn edit_doll_image<E: ImageEditor>(
    editor: &E,
    collection: &mut Collection,
    doll_id: &str,
    source: &ImageData,
    prompt: &str,
) -> EditOutcome {
    if collection.get(doll_id).is_none() {
        return EditOutcome::UnknownDoll;
    }
    match editor.request_image_edit(source, prompt).await {
        Some(edited) => {
            collection.set_image(doll_id, edited.to_data_url());
            EditOutcome::Applied
        }
        None => {
            tracing::debug!(doll = doll_id, "image edit produced nothing");
            EditOutcome::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::RewardData;

    struct Invert;

    impl ImageEditor for Invert {
        async fn request_image_edit(&self, image: &ImageData, _prompt: &str) -> Option<ImageData> {
            Some(ImageData::new(
                image.mime_type.clone(),
                image.bytes.iter().map(|b| !b).collect(),
            ))
        }
    }

    #[test]
    fn test_data_url_round_trip() {
        let image = ImageData::new("image/png", vec![0x89, b'P', b'N', b'G']);
        let url = image.to_data_url();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        assert_eq!(ImageData::from_data_url(&url), Some(image));
    }

    #[test]
    fn test_rejects_non_data_urls() {
        assert!(ImageData::from_data_url("https://picsum.photos/seed/1/400/400").is_none());
        assert!(ImageData::from_data_url("data:image/png,plain").is_none());
        assert!(ImageData::from_data_url("data:image/png;base64,@@@").is_none());
    }

    #[test]
    fn test_mime_type_guess() {
        assert_eq!(ImageData::mime_type_for_extension(Some("JPG")), "image/jpeg");
        assert_eq!(ImageData::mime_type_for_extension(None), "image/png");
    }

    #[tokio::test]
    async fn test_applied_edit_replaces_image() {
        let mut collection = Collection::new();
        let id = collection.unlock(&RewardData::offline()).id.clone();
        let source = ImageData::new("image/png", vec![0, 1]);

        let outcome = edit_doll_image(&Invert, &mut collection, &id, &source, "add a hat").await;

        assert_eq!(outcome, EditOutcome::Applied);
        let stored = ImageData::from_data_url(&collection.get(&id).unwrap().image_url).unwrap();
        assert_eq!(stored.bytes, vec![255, 254]);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_image_and_offers_retry() {
        let mut collection = Collection::new();
        let id = collection.unlock(&RewardData::offline()).id.clone();
        let before = collection.get(&id).unwrap().image_url.clone();
        let source = ImageData::new("image/png", vec![1]);

        let outcome = edit_doll_image(&NoImageEditor, &mut collection, &id, &source, "x").await;

        assert_eq!(outcome, EditOutcome::Retry);
        assert_eq!(collection.get(&id).unwrap().image_url, before);
    }

    #[tokio::test]
    async fn test_unknown_doll() {
        let mut collection = Collection::new();
        let source = ImageData::new("image/png", vec![1]);
        let outcome = edit_doll_image(&Invert, &mut collection, "nope", &source, "x").await;
        assert_eq!(outcome, EditOutcome::UnknownDoll);
    }
}
