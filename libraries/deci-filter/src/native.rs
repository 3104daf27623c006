//! Binding to the compiled C decimation filter
//!
//! The firmware filter is built as a shared library and loaded at run time.
//! It exports two functions:
//!
//! ```c
//! void     decimation_filter_set_sample_rate(unsigned int sample_rate);
//! uint32_t decimation_filter_downsample(int32_t *src, int32_t *dest, unsigned int num_samps);
//! ```
//!
//! The library keeps its filter state in globals, so only one
//! [`NativeDecimator`] per loaded library should be driven at a time.

#![allow(unsafe_code)]

use deci_core::{DeciError, Decimator, Result};
use libloading::Library;
use std::fmt;
use std::os::raw::c_uint;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type SetSampleRateFn = unsafe extern "C" fn(c_uint);
type DownsampleFn = unsafe extern "C" fn(*mut i32, *mut i32, c_uint) -> c_uint;

const SET_SAMPLE_RATE_SYMBOL: &[u8] = b"decimation_filter_set_sample_rate\0";
const DOWNSAMPLE_SYMBOL: &[u8] = b"decimation_filter_downsample\0";

/// Decimator backed by a dynamically loaded C library
pub struct NativeDecimator {
    path: PathBuf,
    set_sample_rate: SetSampleRateFn,
    downsample: DownsampleFn,
    /// The C side takes a mutable source pointer, so chunks are copied here first
    scratch: Vec<i32>,
    // Keeps the function pointers above valid; declared last so it drops last
    _library: Library,
}

impl NativeDecimator {
    /// Load the library at `path` and resolve both filter entry points
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading runs the library's initializers; the filter library
        // has none beyond zeroing its static state.
        let library = unsafe { Library::new(&path) }.map_err(|e| {
            DeciError::filter(format!("failed to load {}: {e}", path.display()))
        })?;

        // SAFETY: the declared signatures match the exported C prototypes.
        let set_sample_rate = unsafe {
            *library
                .get::<SetSampleRateFn>(SET_SAMPLE_RATE_SYMBOL)
                .map_err(|e| missing_symbol(&path, "decimation_filter_set_sample_rate", &e))?
        };
        let downsample = unsafe {
            *library
                .get::<DownsampleFn>(DOWNSAMPLE_SYMBOL)
                .map_err(|e| missing_symbol(&path, "decimation_filter_downsample", &e))?
        };

        info!(library = %path.display(), "Loaded native decimation filter");

        Ok(Self {
            path,
            set_sample_rate,
            downsample,
            scratch: Vec::new(),
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn missing_symbol(path: &Path, symbol: &str, err: &libloading::Error) -> DeciError {
    DeciError::filter(format!(
        "{} does not export {symbol}: {err}",
        path.display()
    ))
}

fn to_c_uint(value: usize, what: &str) -> Result<c_uint> {
    c_uint::try_from(value)
        .map_err(|_| DeciError::invalid_input(format!("{what} {value} exceeds the C interface")))
}

impl Decimator for NativeDecimator {
    fn configure_sample_rate(&mut self, target_sample_rate: u32) -> Result<()> {
        // SAFETY: plain value argument, no pointers cross the boundary.
        unsafe { (self.set_sample_rate)(target_sample_rate) };
        debug!(target_sample_rate, "Native filter configured");
        Ok(())
    }

    fn downsample(&mut self, source: &[i32], dest: &mut [i32]) -> Result<usize> {
        // The C filter writes at most one output per input sample
        if dest.len() < source.len() {
            return Err(DeciError::invalid_input(format!(
                "destination holds {} samples, native filter needs room for {}",
                dest.len(),
                source.len()
            )));
        }
        let num_samples = to_c_uint(source.len(), "chunk length")?;

        self.scratch.clear();
        self.scratch.extend_from_slice(source);

        // SAFETY: `scratch` holds exactly `num_samples` samples and `dest` at
        // least as many; both outlive the call and do not alias.
        let produced =
            unsafe { (self.downsample)(self.scratch.as_mut_ptr(), dest.as_mut_ptr(), num_samples) };

        Ok(produced as usize)
    }

    fn name(&self) -> &str {
        "native"
    }
}

impl fmt::Debug for NativeDecimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeDecimator")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
