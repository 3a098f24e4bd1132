//! Animation tuning options with TOML preset support.
//!
//! Options serialize to/from TOML so tuned feel presets can be stored next
//! to the application and swapped at runtime.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::DEFAULT_RESPONSE;
use crate::error::{ensure, AnimationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation")]
#[serde(default)]
/// Second-order dynamics parameters and the convergence tolerance.
pub struct AnimationOptions {
    /// Natural frequency in Hz. Higher settles faster.
    #[schemars(title = "Frequency", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub frequency: f64,
    /// Damping ratio: below 1 overshoots, 1 is critical, above 1 is sluggish.
    #[schemars(title = "Damping", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub damping_ratio: f64,
    /// Initial response: negative anticipates, above 1 overshoots on
    /// target motion.
    #[schemars(title = "Response", range(min = -2.0, max = 2.0), extend("step" = 0.1))]
    pub response: f64,
    /// Distance from the target at which the loop stops.
    #[schemars(skip)]
    pub epsilon: f64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            frequency: 2.0,
            damping_ratio: 1.0,
            response: DEFAULT_RESPONSE,
            epsilon: 0.01,
        }
    }
}

impl AnimationOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(AnimationOptions)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<(), AnimationError> {
        ensure(
            "frequency",
            self.frequency,
            self.frequency.is_finite() && self.frequency > 0.0,
        )?;
        ensure(
            "damping_ratio",
            self.damping_ratio,
            self.damping_ratio.is_finite() && self.damping_ratio >= 0.0,
        )?;
        ensure("response", self.response, self.response.is_finite())?;
        ensure(
            "epsilon",
            self.epsilon,
            self.epsilon.is_finite() && self.epsilon > 0.0,
        )
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, AnimationError> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| AnimationError::OptionsParse(e.to_string()))?;
        if let Err(e) = options.validate() {
            log::warn!("rejecting options from {}: {e}", path.display());
            return Err(e);
        }
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// Out-of-range options are rejected before anything is written, so a
    /// saved preset always loads back.
    pub fn save(&self, path: &Path) -> Result<(), AnimationError> {
        self.validate()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| AnimationError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("damped-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn default_round_trips_through_toml() {
        let opts = AnimationOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: AnimationOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
frequency = 4.5
";
        let opts: AnimationOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.frequency, 4.5);
        assert_eq!(opts.damping_ratio, 1.0);
        assert_eq!(opts.epsilon, 0.01);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let bad = AnimationOptions {
            damping_ratio: -0.5,
            ..AnimationOptions::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(AnimationError::InvalidParameter {
                name: "damping_ratio",
                ..
            })
        ));
        assert!(AnimationOptions::default().validate().is_ok());
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = scratch_dir("presets");
        let snappy = AnimationOptions {
            frequency: 6.0,
            damping_ratio: 0.6,
            ..AnimationOptions::default()
        };
        snappy.save(&dir.join("snappy.toml")).unwrap();
        AnimationOptions::default()
            .save(&dir.join("calm.toml"))
            .unwrap();
        std::fs::write(dir.join("notes.txt"), "not a preset").unwrap();

        assert_eq!(
            AnimationOptions::list_presets(&dir),
            vec!["calm".to_owned(), "snappy".to_owned()]
        );
        let loaded = AnimationOptions::load(&dir.join("snappy.toml")).unwrap();
        assert_eq!(loaded, snappy);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_rejects_invalid_values() {
        let dir = scratch_dir("invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "frequency = 0.0\n").unwrap();

        assert!(matches!(
            AnimationOptions::load(&path),
            Err(AnimationError::InvalidParameter {
                name: "frequency",
                ..
            })
        ));

        std::fs::write(&path, "frequency = \"fast\"\n").unwrap();
        assert!(matches!(
            AnimationOptions::load(&path),
            Err(AnimationError::OptionsParse(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_rejects_invalid_values() {
        let dir = scratch_dir("save-invalid");
        let path = dir.join("broken.toml");
        let bad = AnimationOptions {
            epsilon: 0.0,
            ..AnimationOptions::default()
        };

        assert!(matches!(
            bad.save(&path),
            Err(AnimationError::InvalidParameter {
                name: "epsilon",
                ..
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let path = scratch_dir("missing").join("nope.toml");
        assert!(matches!(
            AnimationOptions::load(&path),
            Err(AnimationError::Io(_))
        ));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(AnimationOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("frequency"));
        assert!(props.contains_key("damping_ratio"));
        assert!(props.contains_key("response"));
        assert!(!props.contains_key("epsilon"));
    }
}
