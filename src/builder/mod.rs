//! External build-system and toolchain drivers.

pub mod cmake;
pub mod emsdk;
pub mod vcpkg;

pub use cmake::CMakeDriver;
pub use emsdk::Emsdk;
pub use vcpkg::Vcpkg;
