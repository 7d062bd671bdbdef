mod core;
mod triangle;

pub use self::core::{Barycentric, Euler3, Point3, Tolerance, Vec3};
pub use triangle::{
    DEFAULT_SAMPLE_JITTER, SurfaceSampleDiagnostics, SurfaceSampleOptions, Triangle,
    barycentric_lattice, lattice_resolution, lattice_size, sample_surface_points,
    sample_surface_weights, stride_indices,
};

#[cfg(test)]
mod tests;
