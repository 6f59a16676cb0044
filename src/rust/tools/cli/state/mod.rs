#![cfg(feature = "cli")]

use std::sync::Arc;

use crate::tools::logger::Logger;

#[derive(Clone)]
pub struct CliContext {
    logger: Arc<Logger>,
}

impl CliContext {
    pub fn new(verbose: bool) -> Self {
        let logger = if verbose {
            Logger::verbose()
        } else {
            Logger::new()
        };
        Self {
            logger: Arc::new(logger),
        }
    }

    pub fn logger(&self) -> Arc<Logger> {
        Arc::clone(&self.logger)
    }
}
