use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },
    #[error("image write failed: {0}")]
    Image(#[from] image::ImageError),
}
