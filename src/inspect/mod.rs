//! Package inspection: the control-paragraph model and the `dpkg-deb`
//! backed inspector.

pub mod control;
pub mod dpkg;

pub use control::ControlFields;
pub use dpkg::DpkgInspector;
