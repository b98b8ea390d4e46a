use crate::error::ExtractError;

/// Extracts face embedding vectors from raw image bytes.
///
/// The input is an encoded image (JPEG, PNG, WebP). The output is a
/// dense f32 vector whose dimensionality is returned by
/// [`FaceExtractor::dimension`].
///
/// `Ok(None)` means the image carried no usable face (nothing detected,
/// corrupt data, unsupported format). Implementations never signal that
/// case through an error: errors are reserved for the extractor itself
/// being unable to work (see [`ExtractError::Unavailable`]).
///
/// Implementations must be safe for concurrent use (Send + Sync) and
/// must not mutate the input.
#[async_trait::async_trait]
pub trait FaceExtractor: Send + Sync {
    /// Compute a face embedding from encoded image bytes.
    async fn extract(&self, image: &[u8]) -> Result<Option<Vec<f32>>, ExtractError>;

    /// Return the dimensionality of the embedding vectors (e.g., 512).
    fn dimension(&self) -> usize;
}
