//! NVS-backed configuration store.
//!
//! Implements [`ConfigPort`] on top of ESP-IDF's non-volatile storage.
//! Config blobs are postcard-encoded and range-validated on both the load
//! and save paths, so a corrupted blob can never hand the controller an
//! all-zero configuration. The simulation backend keeps the blob in a
//! `RefCell<Option<Vec<u8>>>` for tests.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::config::SystemConfig;
use crate::controller::ports::{ConfigError, ConfigPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
const CONFIG_NAMESPACE: &[u8] = b"autowater\0";
#[cfg(target_os = "espidf")]
const CONFIG_KEY: &[u8] = b"syscfg\0";

#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 256;

pub struct NvsConfigStore {
    #[cfg(not(target_os = "espidf"))]
    blob: std::cell::RefCell<Option<Vec<u8>>>,
}

impl NvsConfigStore {
    /// Create the store and initialise NVS flash.
    ///
    /// On first boot or after a version mismatch the NVS partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the single
            // main-task context before any other NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NvsConfigStore: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK {
                    return Err(ConfigError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(ConfigError::IoError);
            }
            info!("NvsConfigStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsConfigStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            blob: std::cell::RefCell::new(None),
        })
    }

    /// Open the config namespace, run a closure with the handle, close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(CONFIG_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl ConfigPort for NvsConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let Some(bytes) = self.blob.borrow().clone() else {
                info!("NvsConfigStore: no stored config, using defaults");
                return Ok(SystemConfig::default());
            };
            let cfg: SystemConfig =
                postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
            cfg.validate().map_err(ConfigError::ValidationFailed)?;
            info!("NvsConfigStore: loaded config from store");
            Ok(cfg)
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(false, |handle| {
                let mut size: usize = 0;

                // First call sizes the blob.
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        CONFIG_KEY.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        CONFIG_KEY.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let cfg: SystemConfig =
                        postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
                    cfg.validate().map_err(ConfigError::ValidationFailed)?;
                    info!("NvsConfigStore: loaded config from NVS ({} bytes)", bytes.len());
                    Ok(cfg)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => {
                    info!("NvsConfigStore: no stored config, using defaults");
                    Ok(SystemConfig::default())
                }
                Err(e) => {
                    warn!("NvsConfigStore: NVS read error {}, using defaults", e);
                    Ok(SystemConfig::default())
                }
            }
        }
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate().map_err(ConfigError::ValidationFailed)?;

        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            *self.blob.borrow_mut() = Some(bytes);
            info!("NvsConfigStore: config saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        CONFIG_KEY.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("NvsConfigStore: config saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsConfigStore: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }
}
