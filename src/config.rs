use std::path::PathBuf;

use log::warn;

use crate::mt_message::MessageVariant;

pub const DEFAULT_SAVE_FOLDER: &str = "saved_swift_files";

/// Runtime settings read from the environment. CLI flags override these.
///
/// The binaries load a `.env` file (via `dotenvy`) before calling
/// [`Config::from_env`], so values from that file show up here too.
/// Variables already set in the process environment win over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `SWIFT_SAVE_FOLDER`
    pub save_folder: PathBuf,
    /// `SWIFT_VARIANT`
    pub variant: MessageVariant,
    /// `BATCH_WORKERS`, defaults to the number of CPUs.
    pub batch_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_folder: PathBuf::from(DEFAULT_SAVE_FOLDER),
            variant: MessageVariant::Standard,
            batch_workers: num_cpus::get(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let save_folder = lookup("SWIFT_SAVE_FOLDER")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.save_folder);

        let variant = match lookup("SWIFT_VARIANT") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring SWIFT_VARIANT: {}", e);
                defaults.variant
            }),
            None => defaults.variant,
        };

        let batch_workers = lookup("BATCH_WORKERS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| v >= 1)
            .unwrap_or(defaults.batch_workers);

        Self {
            save_folder,
            variant,
            batch_workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.save_folder, PathBuf::from(DEFAULT_SAVE_FOLDER));
        assert_eq!(cfg.variant, MessageVariant::Standard);
        assert!(cfg.batch_workers >= 1);
    }

    #[test]
    fn test_overrides() {
        let cfg = config_from(&[
            ("SWIFT_SAVE_FOLDER", "/tmp/out"),
            ("SWIFT_VARIANT", "RTGS"),
            ("BATCH_WORKERS", "3"),
        ]);
        assert_eq!(cfg.save_folder, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.variant, MessageVariant::Rtgs);
        assert_eq!(cfg.batch_workers, 3);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let cfg = config_from(&[
            ("SWIFT_SAVE_FOLDER", "  "),
            ("SWIFT_VARIANT", "sepa"),
            ("BATCH_WORKERS", "0"),
        ]);
        assert_eq!(cfg.save_folder, PathBuf::from(DEFAULT_SAVE_FOLDER));
        assert_eq!(cfg.variant, MessageVariant::Standard);
        assert!(cfg.batch_workers >= 1);
    }

    #[test]
    fn test_dotenv_file_values_are_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# local settings\nSWIFT_SAVE_FOLDER=/srv/swift/out\nSWIFT_VARIANT=rtgs\n",
        )
        .unwrap();

        let env: HashMap<String, String> = dotenvy::from_path_iter(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        let cfg = Config::from_lookup(|key| env.get(key).cloned());
        assert_eq!(cfg.save_folder, PathBuf::from("/srv/swift/out"));
        assert_eq!(cfg.variant, MessageVariant::Rtgs);
        assert!(cfg.batch_workers >= 1);
    }
}
