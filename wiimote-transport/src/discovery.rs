//! Device discovery for Wii Remotes

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_remote::HidRemoteTransport;
use crate::types::{DiscoveredDevice, TransportDeviceInfo, TransportType};

/// Check if a device is connected via Bluetooth
fn is_bluetooth_bus(device_info: &hidapi::DeviceInfo) -> bool {
    matches!(device_info.bus_type(), hidapi::BusType::Bluetooth)
}

/// HID device discovery for Wii Remotes
#[derive(Debug, Default)]
pub struct HidDiscovery;

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new() -> Self {
        Self
    }

    /// List currently attached remotes
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            let (vid, pid) = (device_info.vendor_id(), device_info.product_id());
            if !device_registry::is_wiimote(vid, pid) {
                continue;
            }
            if !is_bluetooth_bus(device_info) {
                debug!("Skipping {:04x}:{:04x} on non-Bluetooth bus", vid, pid);
                continue;
            }

            let path = device_info.path().to_string_lossy().into_owned();
            // hidapi lists one entry per collection; the remote has a single node
            if devices
                .iter()
                .any(|d: &DiscoveredDevice| d.info.device_path == path)
            {
                continue;
            }

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid,
                    pid,
                    transport_type: TransportType::HidBluetooth,
                    device_path: path,
                    serial: device_info.serial_number().map(str::to_owned),
                    product_name: device_info.product_string().map(str::to_owned),
                },
            });
        }

        debug!("Discovered {} Wii Remote(s)", devices.len());
        Ok(devices)
    }

    /// Open a discovered remote; call [`HidRemoteTransport::start`] to begin reading
    pub fn open_device(
        &self,
        device: &DiscoveredDevice,
    ) -> Result<HidRemoteTransport, TransportError> {
        let api = HidApi::new()?;
        let path = std::ffi::CString::new(device.info.device_path.clone())
            .map_err(|e| TransportError::Internal(e.to_string()))?;

        let output = api.open_path(&path)?;
        let input = api.open_path(&path)?;
        info!(
            "Opened {} ({:04x}:{:04x}) at {}",
            device.info.product_name.as_deref().unwrap_or("Wii Remote"),
            device.info.vid,
            device.info.pid,
            device.info.device_path
        );

        Ok(HidRemoteTransport::new(output, input, device.info.clone()))
    }

    /// Open the first attached remote
    pub fn open_first(&self) -> Result<HidRemoteTransport, TransportError> {
        let devices = self.list_devices()?;
        let first = devices
            .first()
            .ok_or_else(|| TransportError::DeviceNotFound("No Wii Remote found".into()))?;
        self.open_device(first)
    }
}
