//! Master volume capability
//!
//! Only Windows exposes a master level through `IAudioEndpointVolume`; every
//! other platform gets [`UnsupportedVolume`], which reports no range so the
//! controller never produces volume actions.

use crate::state::VolumeRange;

/// Errors from the OS audio layer
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("volume control is not available on this platform")]
    Unsupported,

    #[error("audio endpoint call failed: {0}")]
    Endpoint(String),
}

/// OS master volume capability
pub trait VolumeController {
    /// Range reported by the OS, `None` when volume cannot be controlled
    fn range(&self) -> Option<VolumeRange>;

    /// Set the master level in decibels
    fn set_master_level(&mut self, level_db: f32) -> Result<(), VolumeError>;
}

/// Volume control for platforms without support
#[derive(Debug, Default)]
pub struct UnsupportedVolume;

impl VolumeController for UnsupportedVolume {
    fn range(&self) -> Option<VolumeRange> {
        None
    }

    fn set_master_level(&mut self, _level_db: f32) -> Result<(), VolumeError> {
        Err(VolumeError::Unsupported)
    }
}

/// Pick the platform's volume control
pub fn platform_volume() -> Box<dyn VolumeController> {
    #[cfg(windows)]
    {
        match endpoint::EndpointVolume::open() {
            Ok(volume) => return Box::new(volume),
            Err(e) => tracing::warn!(?e, "default audio endpoint unavailable"),
        }
    }
    tracing::info!("volume control unsupported on this platform");
    Box::new(UnsupportedVolume)
}

#[cfg(windows)]
mod endpoint {
    use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
    use windows::Win32::Media::Audio::{eConsole, eRender, IMMDeviceEnumerator, MMDeviceEnumerator};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
    };

    use super::{VolumeController, VolumeError, VolumeRange};

    fn endpoint_err(e: windows::core::Error) -> VolumeError {
        VolumeError::Endpoint(e.to_string())
    }

    /// Default render endpoint's master volume
    pub struct EndpointVolume {
        endpoint: IAudioEndpointVolume,
        range: VolumeRange,
    }

    impl EndpointVolume {
        pub fn open() -> Result<Self, VolumeError> {
            // SAFETY: COM is initialized on this thread before any interface
            // is created, and all interfaces stay on this thread.
            unsafe {
                CoInitializeEx(None, COINIT_APARTMENTTHREADED)
                    .ok()
                    .map_err(endpoint_err)?;
                let enumerator: IMMDeviceEnumerator =
                    CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL).map_err(endpoint_err)?;
                let device = enumerator
                    .GetDefaultAudioEndpoint(eRender, eConsole)
                    .map_err(endpoint_err)?;
                let endpoint: IAudioEndpointVolume =
                    device.Activate(CLSCTX_ALL, None).map_err(endpoint_err)?;

                let (mut min_db, mut max_db, mut step_db) = (0.0f32, 0.0f32, 0.0f32);
                endpoint
                    .GetVolumeRange(&mut min_db, &mut max_db, &mut step_db)
                    .map_err(endpoint_err)?;
                tracing::info!(min_db, max_db, step_db, "audio endpoint volume range");

                Ok(Self {
                    endpoint,
                    range: VolumeRange { min_db, max_db },
                })
            }
        }
    }

    impl VolumeController for EndpointVolume {
        fn range(&self) -> Option<VolumeRange> {
            Some(self.range)
        }

        fn set_master_level(&mut self, level_db: f32) -> Result<(), VolumeError> {
            // SAFETY: a null event context GUID is allowed by the API.
            unsafe {
                self.endpoint
                    .SetMasterVolumeLevel(level_db, std::ptr::null())
                    .map_err(endpoint_err)
            }
        }
    }
}
