//! File downloads.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;

use crate::error_handling::CrawlerError;
use crate::fetch::DownloadEvent;
use crate::urls::Query;

use super::{Context, PipelineChoice};

impl Context {
    /// Derives the local file for a download.
    ///
    /// Without a destination, or with one ending in `/`, the URL basename (query
    /// and fragment stripped) is used as the file name. Relative results are
    /// resolved against the download path.
    ///
    /// # Returns
    ///
    /// `None` when a file name is needed and the URL has no basename.
    pub fn generate_filename(&self, url: &str, destination: Option<&Path>) -> Option<PathBuf> {
        let path = match destination {
            Some(dir) if dir.to_string_lossy().ends_with('/') || dir.is_dir() => {
                dir.join(url_basename(url)?)
            }
            Some(file) => file.to_path_buf(),
            None => PathBuf::from(url_basename(url)?),
        };
        Some(match &self.download_path {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        })
    }

    /// Downloads `url` into a local file.
    ///
    /// The body streams straight into the file; redirect bodies are discarded.
    /// A non-200 status or an empty body vetoes the download before the
    /// download hook runs, and the hook may veto it too. A vetoed or failed
    /// download leaves no file behind. Accepted files get the configured mode
    /// (unix) and, when enabled, the remote modification time.
    ///
    /// # Arguments
    ///
    /// * `url` - Relative or absolute URL
    /// * `destination` - File or directory (trailing `/`); `None` uses the URL basename
    /// * `query` - Query merged during normalization
    /// * `referer` - Overrides the referer option
    ///
    /// # Returns
    ///
    /// The number of bytes written, or `None` when the download was vetoed.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::InvalidDestination` when no file name can be
    /// derived, `CrawlerError::Io` for file system failures, and any error of
    /// `send_request`.
    pub fn download(
        &mut self,
        url: &str,
        destination: Option<&Path>,
        query: Option<Query>,
        referer: Option<&str>,
    ) -> Result<Option<u64>, CrawlerError> {
        let target = self
            .generate_filename(url, destination)
            .ok_or_else(|| CrawlerError::InvalidDestination(url.to_string()))?;
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut request = self.request(url, query, referer);
        request.set_sink(Box::new(File::create(&target)?));

        match self.send_request(request, PipelineChoice::Raw) {
            Ok(Some(_)) => {}
            Ok(None) => {
                discard(&target);
                return Ok(None);
            }
            Err(e) => {
                discard(&target);
                return Err(e);
            }
        }

        let Some(response) = self.responses.last() else {
            discard(&target);
            return Ok(None);
        };
        let size = response.download_size().unwrap_or(0);
        let document_time = response.document_time();

        let mut event = DownloadEvent::new(&target, response, response.status_code() == 200 && size > 0);
        self.hooks.on_download(&mut event);
        if event.is_ignored() {
            debug!("Download of {} to {} vetoed", url, target.display());
            discard(&target);
            return Ok(None);
        }

        #[cfg(unix)]
        if let Some(mode) = self.override_file_mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))?;
        }
        if self.use_remote_time {
            if let Some(time) = document_time {
                let file = OpenOptions::new().write(true).open(&target)?;
                file.set_modified(SystemTime::from(time))?;
            }
        }

        debug!("Downloaded {} bytes to {}", size, target.display());
        Ok(Some(size))
    }
}

fn url_basename(url: &str) -> Option<String> {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = &url[..end];
    let name = path.rsplit('/').next()?.trim();
    let name = if name.contains(':') { "" } else { name };
    (!name.is_empty()).then(|| name.to_string())
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!("Could not remove {}: {}", path.display(), e);
    }
}
