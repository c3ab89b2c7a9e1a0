//! Backend selection for the tensor scoring path.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Selected backend type
pub type SelectedBackend = NdArray;
/// Selected device type
pub type SelectedDevice = NdArrayDevice;

/// Creates the device for the selected backend
pub fn create_device() -> SelectedDevice {
    NdArrayDevice::default()
}

/// Gets the backend name for logging purposes
pub const fn get_backend_name() -> &'static str {
    "NdArray (CPU)"
}
