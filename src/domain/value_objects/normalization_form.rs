use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use unicode_normalization::UnicodeNormalization;

use crate::domain::errors::PolicyError;

/// Unicode normalization form applied to every sanitized string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum NormalizationForm {
    /// Canonical composition
    #[default]
    Nfc,
    /// Canonical decomposition
    Nfd,
    /// Compatibility composition
    Nfkc,
    /// Compatibility decomposition
    Nfkd,
}

impl NormalizationForm {
    pub fn normalize(&self, input: &str) -> String {
        match self {
            NormalizationForm::Nfc => input.nfc().collect(),
            NormalizationForm::Nfd => input.nfd().collect(),
            NormalizationForm::Nfkc => input.nfkc().collect(),
            NormalizationForm::Nfkd => input.nfkd().collect(),
        }
    }
}

impl std::fmt::Display for NormalizationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationForm::Nfc => write!(f, "NFC"),
            NormalizationForm::Nfd => write!(f, "NFD"),
            NormalizationForm::Nfkc => write!(f, "NFKC"),
            NormalizationForm::Nfkd => write!(f, "NFKD"),
        }
    }
}

impl std::str::FromStr for NormalizationForm {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NFC" => Ok(NormalizationForm::Nfc),
            "NFD" => Ok(NormalizationForm::Nfd),
            "NFKC" => Ok(NormalizationForm::Nfkc),
            "NFKD" => Ok(NormalizationForm::Nfkd),
            _ => Err(PolicyError::InvalidNormalizationForm(s.to_string())),
        }
    }
}

/// Value of the `unicodeNormalizeForm` option.
///
/// Accepts a form name in any case, or `none`/empty to turn normalization off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationSetting {
    Disabled,
    Form(NormalizationForm),
}

impl NormalizationSetting {
    pub fn form(self) -> Option<NormalizationForm> {
        match self {
            NormalizationSetting::Disabled => None,
            NormalizationSetting::Form(form) => Some(form),
        }
    }
}

impl From<NormalizationForm> for NormalizationSetting {
    fn from(form: NormalizationForm) -> Self {
        NormalizationSetting::Form(form)
    }
}

impl std::fmt::Display for NormalizationSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationSetting::Disabled => write!(f, "none"),
            NormalizationSetting::Form(form) => write!(f, "{}", form),
        }
    }
}

impl std::str::FromStr for NormalizationSetting {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(NormalizationSetting::Disabled);
        }
        trimmed.parse().map(NormalizationSetting::Form)
    }
}

impl Serialize for NormalizationSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NormalizationSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_parses_forms_and_none() {
        assert_eq!(
            "nfkd".parse::<NormalizationSetting>().unwrap(),
            NormalizationSetting::Form(NormalizationForm::Nfkd)
        );
        for disabled in ["", " ", "none", "NONE"] {
            assert_eq!(
                disabled.parse::<NormalizationSetting>().unwrap(),
                NormalizationSetting::Disabled
            );
        }
        assert!(matches!(
            "NFZ".parse::<NormalizationSetting>(),
            Err(PolicyError::InvalidNormalizationForm(_))
        ));
    }

    #[test]
    fn test_setting_serde() {
        let setting: NormalizationSetting = serde_json::from_str(r#""Nfc""#).unwrap();
        assert_eq!(setting.form(), Some(NormalizationForm::Nfc));

        let setting: NormalizationSetting = serde_json::from_str(r#""none""#).unwrap();
        assert_eq!(setting.form(), None);

        let err = serde_json::from_str::<NormalizationSetting>(r#""NFX""#).unwrap_err();
        assert!(err.to_string().contains("Invalid unicode normalization form"));

        assert_eq!(
            serde_json::to_string(&NormalizationSetting::from(NormalizationForm::Nfkc)).unwrap(),
            r#""NFKC""#
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("nfkc".parse::<NormalizationForm>().unwrap(), NormalizationForm::Nfkc);
        assert_eq!("NFD".parse::<NormalizationForm>().unwrap(), NormalizationForm::Nfd);
        assert!("NFX".parse::<NormalizationForm>().is_err());
    }

    #[test]
    fn test_composition_and_decomposition() {
        let decomposed = "e\u{0301}";
        assert_eq!(NormalizationForm::Nfc.normalize(decomposed), "\u{00e9}");
        assert_eq!(NormalizationForm::Nfd.normalize("\u{00e9}"), decomposed);
    }

    #[test]
    fn test_compatibility_forms_fold_ligatures() {
        assert_eq!(NormalizationForm::Nfkc.normalize("\u{fb01}le"), "file");
        assert_eq!(NormalizationForm::Nfc.normalize("\u{fb01}le"), "\u{fb01}le");
    }
}
