//! Utility functions and helpers

use std::path::Path;

use sha2::{Digest, Sha256};

/// Generate a hash of the given content
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// Get relative path from base to target, with forward slashes
pub fn relative_path(from: &Path, to: &Path) -> Option<String> {
    pathdiff::diff_paths(to, from).map(path_to_module_id)
}

/// Clean a path by removing . and .. components
///
/// Leading `..` segments of a relative path are kept.
pub fn clean_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    if absolute {
        format!("/{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

/// Convert a file path to a forward-slash module path
pub fn path_to_module_id<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .display()
        .to_string()
        .replace('\\', "/")
}

/// Prefix a project-relative path so bundlers resolve it as a file, not a package
pub fn to_request(path: &str) -> String {
    let cleaned = clean_path(path);
    if cleaned.starts_with('/') || cleaned.starts_with("../") {
        cleaned
    } else {
        format!("./{}", cleaned)
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();

    if secs >= 1.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.0}ms", secs * 1000.0)
    }
}
