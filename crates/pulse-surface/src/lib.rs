pub mod canvas;
pub mod config;
pub mod driver;
pub mod error;
pub mod presenter;

pub use canvas::RasterCanvas;
pub use config::DriverConfig;
pub use driver::{FrameDriver, Visibility};
pub use error::SurfaceError;
pub use presenter::{Presenter, RecordingPresenter};
