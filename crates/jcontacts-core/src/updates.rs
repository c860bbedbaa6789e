//! Update checks against the published version properties file.
//!
//! Everything here is blocking; callers that care about responsiveness run
//! it on a worker thread. Failures are meant to be shown as status messages.

use crate::error::UpdateError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Where the newest version is announced.
pub const DEFAULT_URL: &str =
    "https://github.com/Janorico/Versions/raw/main/JContacts.properties";

/// Version key of this build, compared against `newest-version.key`.
pub const CURRENT_VERSION: f32 = 2.0;

const KEY: &str = "newest-version.key";
const DISPLAY_NAME: &str = "newest-version.display-name";
const WINDOWS_INSTALLER: &str = "newest-version.windows-installer";

/// Details of the newest published version.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateInfo {
    pub version_key: f32,
    pub display_name: String,
    pub windows_installer: Option<String>,
}

impl UpdateInfo {
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, UpdateError> {
        let raw_key = props.get(KEY).ok_or(UpdateError::MissingProperty(KEY))?;
        let version_key = raw_key
            .trim()
            .parse::<f32>()
            .map_err(|_| UpdateError::InvalidVersion(raw_key.clone()))?;
        let display_name = props
            .get(DISPLAY_NAME)
            .ok_or(UpdateError::MissingProperty(DISPLAY_NAME))?
            .clone();

        Ok(Self {
            version_key,
            display_name,
            windows_installer: props.get(WINDOWS_INSTALLER).cloned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    UpToDate,
    Available(UpdateInfo),
}

pub struct UpdateChecker {
    url: String,
    current_version: f32,
}

impl Default for UpdateChecker {
    fn default() -> Self {
        Self::new(DEFAULT_URL, CURRENT_VERSION)
    }
}

impl UpdateChecker {
    pub fn new(url: impl Into<String>, current_version: f32) -> Self {
        Self {
            url: url.into(),
            current_version,
        }
    }

    /// Fetch the properties file and compare versions.
    pub fn check(&self) -> Result<UpdateStatus, UpdateError> {
        tracing::info!("Checking for updates at {}", self.url);
        let body = reqwest::blocking::get(&self.url)?
            .error_for_status()?
            .text()?;
        self.evaluate(&body)
    }

    /// Compare a fetched properties document against the running version.
    pub fn evaluate(&self, properties: &str) -> Result<UpdateStatus, UpdateError> {
        let info = UpdateInfo::from_properties(&parse_properties(properties))?;
        if info.version_key > self.current_version {
            tracing::info!("Update available: {}", info.display_name);
            Ok(UpdateStatus::Available(info))
        } else {
            Ok(UpdateStatus::UpToDate)
        }
    }
}

/// Download `url` into `dest`, reporting bytes written and the total size.
pub fn download(
    url: &str,
    dest: &Path,
    mut progress: impl FnMut(u64, Option<u64>),
) -> Result<u64, UpdateError> {
    let mut response = reqwest::blocking::get(url)?.error_for_status()?;
    let total = response.content_length();
    let mut out = BufWriter::new(File::create(dest)?);

    let mut buf = [0u8; 1024];
    let mut written = 0u64;
    loop {
        let n = response.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n])?;
        written += n as u64;
        progress(written, total);
    }
    out.flush()?;

    tracing::info!("Downloaded {} bytes to {}", written, dest.display());
    Ok(written)
}

/// Target path of the installer in the user's downloads folder.
///
/// Installers are only published for Windows.
pub fn installer_path(info: &UpdateInfo) -> Result<PathBuf, UpdateError> {
    if !cfg!(windows) {
        return Err(UpdateError::UnsupportedPlatform);
    }
    let downloads = dirs::download_dir().ok_or(UpdateError::NoDownloadDir)?;
    Ok(downloads.join(format!("{}-Installer.exe", info.display_name)))
}

/// Parse a Java-style `.properties` document.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut logical = String::new();

    for raw in text.lines() {
        let line = raw.trim_start();
        if logical.is_empty()
            && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        // an odd number of trailing backslashes continues the line
        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        let (key, value) = split_entry(&logical);
        map.insert(key, value);
        logical.clear();
    }

    if !logical.is_empty() {
        let (key, value) = split_entry(&logical);
        map.insert(key, value);
    }
    map
}

fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    key.push(next);
                }
            }
            '=' | ':' => break,
            c if c.is_whitespace() => {
                let rest = chars.as_str().trim_start();
                let rest = rest.strip_prefix(|c: char| c == '=' || c == ':').unwrap_or(rest);
                return (key, unescape(rest.trim_start()));
            }
            c => key.push(c),
        }
    }

    (key, unescape(chars.as_str().trim_start()))
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# JContacts versions
! generated
newest-version.key=2.1
newest-version.display-name = JContacts 2.1
newest-version.windows-installer=https\\://example.com/\\
    JContacts-2.1.exe
";

    #[test]
    fn parses_java_properties() {
        let props = parse_properties(SAMPLE);
        assert_eq!(props.len(), 3);
        assert_eq!(props["newest-version.key"], "2.1");
        assert_eq!(props["newest-version.display-name"], "JContacts 2.1");
        assert_eq!(
            props["newest-version.windows-installer"],
            "https://example.com/JContacts-2.1.exe"
        );
    }

    #[test]
    fn whitespace_and_colon_separators() {
        let props = parse_properties("a b\nc: d\ne\\ f=g\nh=caf\\u00e9");
        assert_eq!(props["a"], "b");
        assert_eq!(props["c"], "d");
        assert_eq!(props["e f"], "g");
        assert_eq!(props["h"], "café");
    }

    #[test]
    fn newer_version_is_available() {
        let checker = UpdateChecker::new("unused", 2.0);
        let status = checker.evaluate(SAMPLE).unwrap();
        let UpdateStatus::Available(info) = status else {
            panic!("expected an update");
        };
        assert_eq!(info.display_name, "JContacts 2.1");
        assert!(info.windows_installer.is_some());
    }

    #[test]
    fn same_version_is_up_to_date() {
        let checker = UpdateChecker::new("unused", 2.1);
        assert_eq!(checker.evaluate(SAMPLE).unwrap(), UpdateStatus::UpToDate);
    }

    #[test]
    fn missing_or_bad_keys_are_errors() {
        let checker = UpdateChecker::default();
        assert!(matches!(
            checker.evaluate("newest-version.display-name=x"),
            Err(UpdateError::MissingProperty(KEY))
        ));
        assert!(matches!(
            checker.evaluate("newest-version.key=two"),
            Err(UpdateError::InvalidVersion(_))
        ));
        assert!(matches!(
            checker.evaluate("newest-version.key=3"),
            Err(UpdateError::MissingProperty(DISPLAY_NAME))
        ));
    }

    #[cfg(not(windows))]
    #[test]
    fn installer_requires_windows() {
        let info = UpdateInfo {
            version_key: 3.0,
            display_name: "JContacts 3".to_string(),
            windows_installer: None,
        };
        assert!(matches!(
            installer_path(&info),
            Err(UpdateError::UnsupportedPlatform)
        ));
    }
}
