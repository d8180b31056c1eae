//! Profile configuration: the YAML document supplying every card value
//!
//! The loader parses straight into typed structures, so a missing or
//! misshapen key is reported with its field name as soon as the file is read.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{CardError, Diagnostic};

/// Conventional configuration file name, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Personal profile shown on the card
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(rename = "OS", deserialize_with = "scalar")]
    pub os: String,
    #[serde(rename = "Host", deserialize_with = "scalar")]
    pub host: String,
    #[serde(rename = "Kernel", deserialize_with = "scalar")]
    pub kernel: String,
    #[serde(rename = "IDE", deserialize_with = "scalar_list")]
    pub ide: Vec<String>,
    #[serde(rename = "Languages")]
    pub languages: Languages,
    #[serde(rename = "Hobbies", deserialize_with = "scalar_list")]
    pub hobbies: Vec<String>,
    #[serde(rename = "Contacts")]
    pub contacts: Contacts,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Languages {
    #[serde(rename = "Programming", deserialize_with = "scalar_list")]
    pub programming: Vec<String>,
    #[serde(rename = "Speaking", deserialize_with = "scalar_list")]
    pub speaking: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Contacts {
    #[serde(rename = "Emails")]
    pub emails: Emails,
    #[serde(rename = "LinkedIn", deserialize_with = "scalar")]
    pub linkedin: String,
    #[serde(rename = "Discord", deserialize_with = "scalar")]
    pub discord: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Emails {
    #[serde(rename = "Personal", deserialize_with = "scalar")]
    pub personal: String,
}

/// One value to write into a card: the element id and its rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: &'static str,
    pub value: String,
}

impl Binding {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl Profile {
    /// Load a profile from [`DEFAULT_CONFIG_PATH`]
    pub fn load_default() -> Result<Self, CardError> {
        load(DEFAULT_CONFIG_PATH)
    }

    /// Parse a profile from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }

    /// The fixed, ordered list of element updates derived from this profile
    pub fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::new("os", &self.os),
            Binding::new("host", &self.host),
            Binding::new("kernel", &self.kernel),
            Binding::new("ide", join(&self.ide)),
            Binding::new("lang_prog", join(&self.languages.programming)),
            Binding::new("lang_spk", join(&self.languages.speaking)),
            Binding::new("hobbies", join(&self.hobbies)),
            Binding::new("email_personal", &self.contacts.emails.personal),
            Binding::new("linkedin", &self.contacts.linkedin),
            Binding::new("discord", &self.contacts.discord),
        ]
    }
}

/// Load a profile from a YAML file.
///
/// Missing files map to [`CardError::NotFound`], malformed YAML (including a
/// missing key) to [`CardError::Parse`], any other read failure to
/// [`CardError::Io`].
pub fn load(path: impl AsRef<Path>) -> Result<Profile, CardError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CardError::not_found(path),
        _ => CardError::io(path, e),
    })?;

    let profile =
        Profile::from_yaml_str(&content).map_err(|e| CardError::parse(path, Diagnostic::from(&e)))?;
    debug!(path = %path.display(), "loaded profile");
    Ok(profile)
}

fn join(items: &[String]) -> String {
    items.join(", ")
}

/// YAML scalar accepted wherever the card expects text
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(n) => write!(f, "{}", n),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(|s| s.to_string())
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<Scalar>::deserialize(deserializer)?;
    Ok(items.iter().map(Scalar::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL: &str = r#"
OS: Linux
Host: box
Kernel: "6.1"
IDE: [vim]
Languages:
  Programming: [Go]
  Speaking: [EN]
Hobbies: [reading]
Contacts:
  Emails:
    Personal: a@b.c
  LinkedIn: li/x
  Discord: "d#1"
"#;

    #[test]
    fn test_parse_full_profile() {
        let profile = Profile::from_yaml_str(FULL).expect("Should parse");
        assert_eq!(profile.os, "Linux");
        assert_eq!(profile.kernel, "6.1");
        assert_eq!(profile.ide, vec!["vim".to_string()]);
        assert_eq!(profile.contacts.emails.personal, "a@b.c");
        assert_eq!(profile.contacts.discord, "d#1");
    }

    #[test]
    fn test_bindings_order_and_values() {
        let profile = Profile::from_yaml_str(FULL).expect("Should parse");
        let pairs: Vec<(&str, String)> = profile
            .bindings()
            .into_iter()
            .map(|b| (b.key, b.value))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("os", "Linux".to_string()),
                ("host", "box".to_string()),
                ("kernel", "6.1".to_string()),
                ("ide", "vim".to_string()),
                ("lang_prog", "Go".to_string()),
                ("lang_spk", "EN".to_string()),
                ("hobbies", "reading".to_string()),
                ("email_personal", "a@b.c".to_string()),
                ("linkedin", "li/x".to_string()),
                ("discord", "d#1".to_string()),
            ]
        );
    }

    #[test]
    fn test_sequences_join_with_comma_space() {
        let yaml = FULL.replace("IDE: [vim]", "IDE: [VS Code, Neovim, Helix]");
        let profile = Profile::from_yaml_str(&yaml).expect("Should parse");
        assert_eq!(profile.bindings()[3].value, "VS Code, Neovim, Helix");
    }

    #[test]
    fn test_empty_sequence_renders_empty() {
        let yaml = FULL.replace("Hobbies: [reading]", "Hobbies: []");
        let profile = Profile::from_yaml_str(&yaml).expect("Should parse");
        let hobbies = profile
            .bindings()
            .into_iter()
            .find(|b| b.key == "hobbies")
            .expect("hobbies binding");
        assert_eq!(hobbies.value, "");
    }

    #[test]
    fn test_non_string_scalars_render_as_text() {
        let yaml = FULL
            .replace("Kernel: \"6.1\"", "Kernel: 6.1")
            .replace("Host: box", "Host: 42")
            .replace("IDE: [vim]", "IDE: [vim, 3, true]");
        let profile = Profile::from_yaml_str(&yaml).expect("Should parse");
        assert_eq!(profile.kernel, "6.1");
        assert_eq!(profile.host, "42");
        assert_eq!(profile.ide, vec!["vim", "3", "true"]);
    }

    #[test]
    fn test_missing_field_is_named() {
        let yaml = FULL.replace("Host: box\n", "");
        let err = Profile::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("Host"), "got: {}", err);
    }

    #[test]
    fn test_missing_nested_field_is_named() {
        let yaml = FULL.replace("  LinkedIn: li/x\n", "");
        let err = Profile::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("LinkedIn"), "got: {}", err);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let yaml = format!("{}\nShell: zsh\n", FULL);
        assert!(Profile::from_yaml_str(&yaml).is_ok());
    }

    #[test]
    fn test_load_default_uses_conventional_path() {
        // Tests run from the package root, which carries no config.yml
        match Profile::load_default().unwrap_err() {
            CardError::NotFound { path } => assert_eq!(path, Path::new(DEFAULT_CONFIG_PATH)),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
