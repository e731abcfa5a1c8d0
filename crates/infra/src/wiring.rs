//! Local adapter wiring for the use cases.

use repopack_adapters::{ChardetEncoding, GitignoreCompiler, LocalFileSystem};
use repopack_app::{IgnoreRulesDeps, SanitizeDeps, ScanDeps};
use repopack_ports::{FileSystemPort, LoggerPort};
use std::sync::Arc;

/// Use-case dependencies backed by local adapters.
#[derive(Clone)]
pub struct LocalDeps {
    /// Ignore-pattern resolution.
    pub ignore: IgnoreRulesDeps,
    /// Repository scan.
    pub scan: ScanDeps,
    /// Sanitization pipeline.
    pub sanitize: SanitizeDeps,
}

impl LocalDeps {
    /// Wire the local filesystem, gitignore compiler, and chardet decoder.
    #[must_use]
    pub fn new(logger: Option<Arc<dyn LoggerPort>>) -> Self {
        let filesystem: Arc<dyn FileSystemPort> = Arc::new(LocalFileSystem::default());
        let encoding = Arc::new(ChardetEncoding::new());

        Self {
            ignore: IgnoreRulesDeps {
                filesystem: Arc::clone(&filesystem),
                compiler: Arc::new(GitignoreCompiler::new()),
                logger: logger.clone(),
            },
            scan: ScanDeps {
                filesystem: Arc::clone(&filesystem),
                logger: logger.clone(),
            },
            sanitize: SanitizeDeps {
                filesystem,
                detector: encoding.clone(),
                decoder: encoding,
                logger,
            },
        }
    }
}
