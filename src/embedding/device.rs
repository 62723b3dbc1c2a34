use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Selects the compute device for `component` based on enabled features.
///
/// GPU probing failures are logged and the CPU is used instead.
pub fn select_device(component: &str) -> Device {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!(component, "Using Metal GPU acceleration");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(component, error = %msg, "Metal device unavailable");
                failures.push(format!("metal failed: {msg}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!(component, "Using CUDA GPU acceleration");
                return device;
            }
            Err(e) => {
                let msg = e.to_string();
                warn!(component, error = %msg, "CUDA device unavailable");
                failures.push(format!("cuda failed: {msg}"));
            }
        }
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    {
        let reason = if failures.is_empty() {
            "no GPU device available".to_string()
        } else {
            failures.join("; ")
        };
        warn!(component, reason = %reason, "Falling back to CPU device");
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!(component, "No GPU backend compiled, using CPU");

    Device::Cpu
}
