//! Profile Card - keep a README profile card in sync with a YAML profile
//!
//! This library loads a personal profile from YAML and writes its values into
//! SVG cards (typically a dark and a light variant). Each value element has a
//! dotted "prefix" sibling that is resized so the columns of the card stay
//! aligned whatever the length of the new value.
//!
//! # Example
//!
//! ```rust
//! use profile_card::{Profile, TemplateDocument, DEFAULT_FILL};
//!
//! let profile = Profile::from_yaml_str(r#"
//! OS: Linux
//! Host: box
//! Kernel: "6.1"
//! IDE: [vim]
//! Languages: { Programming: [Go], Speaking: [EN] }
//! Hobbies: [reading]
//! Contacts: { Emails: { Personal: a@b.c }, LinkedIn: li/x, Discord: "d#1" }
//! "#).unwrap();
//!
//! let os_only: Vec<_> = profile.bindings().into_iter().take(1).collect();
//! let mut card = TemplateDocument::from_string(
//!     "card.svg",
//!     r#"<svg><tspan id="prefix_os"> ........ </tspan><tspan id="os">Windows</tspan></svg>"#,
//! );
//! card.apply(&os_only, DEFAULT_FILL).unwrap();
//!
//! assert!(card.as_str().contains(r#"<tspan id="prefix_os"> .......... </tspan>"#));
//! assert!(card.as_str().contains(r#"<tspan id="os">Linux</tspan>"#));
//! ```

pub mod document;
pub mod error;
pub mod profile;

use std::path::{Path, PathBuf};

use tracing::info;

pub use document::{FieldUpdate, TemplateDocument, UpdateConfig, DEFAULT_FILL, XML_DECLARATION};
pub use error::{CardError, Diagnostic, Location};
pub use profile::{Binding, Profile, DEFAULT_CONFIG_PATH};

/// Card files updated when no targets are given, in processing order
pub const DEFAULT_TARGETS: [&str; 2] = ["dark_mode.svg", "light_mode.svg"];

/// The default target paths as owned values
pub fn default_targets() -> Vec<PathBuf> {
    DEFAULT_TARGETS.iter().map(PathBuf::from).collect()
}

/// Load the profile at `config_path` and update every target in order.
///
/// Targets are processed one after another; the first failure stops the run
/// and later targets are left untouched.
///
/// # Example
///
/// ```rust
/// use profile_card::{run, CardError, UpdateConfig};
///
/// let err = run("does-not-exist.yml", &["card.svg"], &UpdateConfig::new()).unwrap_err();
/// assert!(matches!(err, CardError::NotFound { .. }));
/// ```
pub fn run<P: AsRef<Path>>(
    config_path: impl AsRef<Path>,
    targets: &[P],
    config: &UpdateConfig,
) -> Result<Vec<FieldUpdate>, CardError> {
    let profile = profile::load(config_path)?;

    let mut updates = Vec::new();
    for target in targets {
        let target = target.as_ref();
        let applied = document::apply(target, &profile, config)?;
        info!(
            path = %target.display(),
            fields = applied.len(),
            overflowed = applied.iter().filter(|u| u.overflow).count(),
            "updated card"
        );
        updates.extend(applied);
    }
    Ok(updates)
}
