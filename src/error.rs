// error.rs — failures of the transition animation driver

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("frame time {0} is not a finite non-negative duration")]
    InvalidFrameTime(f32),
    #[error("{track} track produced a non-finite value")]
    NonFinite { track: &'static str },
}
