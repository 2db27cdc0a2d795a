//! Batch processing
//!
//! Runs the try/catch pass over many methods. Methods are independent, each
//! one carries its own region tree and pending state, so they are processed in
//! parallel.

use crate::error::Error;
use crate::method::{Method, MethodFlag};
use crate::structuring::{process_try_catch_regions, ProcessOptions, ProcessSummary};
use rayon::prelude::*;

/// Result of processing one method
#[derive(Debug, Clone)]
pub struct MethodOutcome {
    pub name: String,
    pub result: Result<ProcessSummary, Error>,
}

impl MethodOutcome {
    pub fn is_fallback(&self) -> bool {
        self.result.is_err()
    }
}

/// Drives [`process_try_catch_regions`] over a set of methods
#[derive(Debug, Clone, Default)]
pub struct TryCatchProcessor {
    options: ProcessOptions,
}

impl TryCatchProcessor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Process a single method
    ///
    /// A fatal error does not propagate: the method is flagged for fallback
    /// rendering and the error is reported in the outcome.
    pub fn process_method(&self, method: &mut Method) -> MethodOutcome {
        let result = process_try_catch_regions(method, &self.options);
        if let Err(e) = &result {
            log::warn!("Try/catch reconstruction failed for {}: {}", method.name, e);
            method.add_flag(MethodFlag::TryCatchFallback);
            method.add_warning(format!("try/catch reconstruction failed: {}", e));
        }
        MethodOutcome {
            name: method.name.clone(),
            result,
        }
    }

    /// Process all methods in parallel, outcomes in input order
    pub fn process_all(&self, methods: &mut [Method]) -> Vec<MethodOutcome> {
        methods
            .par_iter_mut()
            .map(|method| self.process_method(method))
            .collect()
    }
}
