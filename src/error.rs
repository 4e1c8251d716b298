//! Error types for engine configuration and the wgpu front end.

use thiserror::Error;

/// Rejected simulation configurations. Raised once, at engine construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyGrid { width: u32, height: u32 },
    /// `x + y * W` cannot be represented for every cell (and its neighbours) of the grid.
    #[error("grid {width}x{height} overflows the {bits}-bit cell key")]
    KeyOverflow { width: u32, height: u32, bits: u32 },
    #[error("seed ring radius fraction must be in (0, 1], got {0}")]
    RingFraction(f32),
    #[error("anchor margin {margin} does not fit inside a {width}x{height} grid")]
    AnchorMargin { margin: u32, width: u32, height: u32 },
    #[error("random walk {field} must be finite, got {value}")]
    NonFiniteWalk { field: &'static str, value: f32 },
    #[error("particle radius must be positive and finite, got {0}")]
    ParticleRadius(f32),
    #[error("ring scale must be positive and finite, got {0}")]
    RingScale(f32),
}

/// Failures while bringing up the GPU surface.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to create GPU surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reported no supported formats")]
    NoSurfaceFormat,
}
