//! Client-side step taxonomy.
//!
//! A [`StepDescriptor`] is what the presentation layer renders next: a [`StepType`] plus a loose
//! record of capability flags. [`StepDescriptor::typed`] narrows it into [`StepConfig`], where
//! each step type only accepts its own options shape.

use std::collections::BTreeMap;

use derive_more::{Deref, DerefMut, From, Into};
use serde::{Deserialize, Serialize, de::Error as _};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StepType {
    Welcome,
    UserConsent,
    Auth,
    Document,
    Poa,
    Face,
    Complete,
    /// Profile-data form, emitted for the `profile_data` task
    Data,
}

/// Capability flags for a step, merged shallowly by the resolver.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut, From, Into,
)]
#[serde(transparent)]
pub struct StepOptions(Map<String, Value>);

impl StepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Copy of `self` with `overrides` written on top. Keys in `overrides` win.
    #[must_use]
    pub fn merged<K, I>(&self, overrides: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut map = self.0.clone();
        for (key, value) in overrides {
            map.insert(key.into(), value);
        }
        Self(map)
    }
}

impl TryFrom<Value> for StepOptions {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(serde_json::Error::custom(format!(
                "step options must be a JSON object, got {other}"
            ))),
        }
    }
}

/// The next step to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDescriptor {
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub options: StepOptions,
}

impl StepDescriptor {
    pub fn new(step_type: StepType, options: StepOptions) -> Self {
        Self { step_type, options }
    }

    /// Interpret the options according to the step type.
    ///
    /// # Errors
    /// Fails when an option has the wrong type for this step, or when options are given for a
    /// step that takes none.
    pub fn typed(&self) -> Result<StepConfig, serde_json::Error> {
        let options = || Value::Object(self.options.0.clone());
        Ok(match self.step_type {
            StepType::Welcome => StepConfig::Welcome(serde_json::from_value(options())?),
            StepType::UserConsent => {
                if !self.options.is_empty() {
                    return Err(serde_json::Error::custom(
                        "the userConsent step does not take options",
                    ));
                }
                StepConfig::UserConsent
            }
            StepType::Auth => StepConfig::Auth(serde_json::from_value(options())?),
            StepType::Document => StepConfig::Document(serde_json::from_value(options())?),
            StepType::Poa => StepConfig::Poa(serde_json::from_value(options())?),
            StepType::Face => StepConfig::Face(serde_json::from_value(options())?),
            StepType::Complete => StepConfig::Complete(serde_json::from_value(options())?),
            StepType::Data => StepConfig::Data(serde_json::from_value(options())?),
        })
    }
}

/// Typed step configuration; each variant carries only its own options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "options", rename_all = "camelCase")]
pub enum StepConfig {
    Welcome(StepOptionWelcome),
    UserConsent,
    Auth(StepOptionAuth),
    Document(StepOptionDocument),
    Poa(StepOptionPoa),
    Face(StepOptionFace),
    Complete(StepOptionComplete),
    Data(StepOptionData),
}

impl StepConfig {
    pub fn step_type(&self) -> StepType {
        match self {
            StepConfig::Welcome(_) => StepType::Welcome,
            StepConfig::UserConsent => StepType::UserConsent,
            StepConfig::Auth(_) => StepType::Auth,
            StepConfig::Document(_) => StepType::Document,
            StepConfig::Poa(_) => StepType::Poa,
            StepConfig::Face(_) => StepType::Face,
            StepConfig::Complete(_) => StepType::Complete,
            StepConfig::Data(_) => StepType::Data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedVariant {
    Standard,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    DrivingLicence,
    NationalIdentityCard,
    ResidencePermit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoaType {
    BankBuildingSocietyStatement,
    UtilityBill,
    CouncilTax,
    BenefitLetters,
    GovernmentLetter,
}

/// Either a plain on/off switch or a pre-selected issuing country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentTypeConfig {
    Enabled(bool),
    Country { country: Option<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_variant: Option<RequestedVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_fallback: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_uploader: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_webcam: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOptionWelcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_button: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOptionAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOptionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_types: Option<BTreeMap<DocumentType, DocumentTypeConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_cross_device: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_country_selection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_live_document_capture: Option<bool>,
    #[serde(flatten)]
    pub capture: CaptureOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOptionPoa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_types: Option<BTreeMap<PoaType, bool>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOptionFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_multiple_selfie_capture: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_capture_fallback: Option<bool>,
    #[serde(flatten)]
    pub capture: CaptureOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOptionComplete {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submessage: Option<String>,
}

/// Profile fields the data step collects; empty strings mean "not yet provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOptionData {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub address: ProfileAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileAddress {
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
}
