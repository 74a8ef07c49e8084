use pulse_core::Frame;

use crate::error::SurfaceError;

/// The host's drawing sink. Receives one finished frame per tick.
pub trait Presenter: Send {
    /// Clear to the frame background, then fill every point in order.
    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError>;

    /// Surface size changed.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let _ = (width, height);
        Ok(())
    }
}

/// Keeps the last frame and counts presents. No pixels are touched.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    last_frame: Option<Frame>,
    presented: usize,
    total_points: usize,
    sizes: Vec<(u32, u32)>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    /// Points across every presented frame.
    pub fn total_points(&self) -> usize {
        self.total_points
    }

    /// Every size passed to `resize`, oldest first.
    pub fn sizes(&self) -> &[(u32, u32)] {
        &self.sizes
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &Frame) -> Result<(), SurfaceError> {
        self.presented += 1;
        self.total_points += frame.len();
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.sizes.push((width, height));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::{DrawPoint, Rgb};

    #[test]
    fn test_records_frames() {
        let mut presenter = RecordingPresenter::new();
        let mut frame = Frame::new(Rgb::BLACK, 10.0, 10.0);
        frame.push(DrawPoint::new(1.0, 1.0, 1.0, Rgb::WHITE));

        presenter.present(&frame).unwrap();
        presenter.present(&frame).unwrap();
        presenter.resize(20, 30).unwrap();

        assert_eq!(presenter.presented(), 2);
        assert_eq!(presenter.total_points(), 2);
        assert_eq!(presenter.last_frame(), Some(&frame));
        assert_eq!(presenter.sizes(), &[(20, 30)]);
    }
}
