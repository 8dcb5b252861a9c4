use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Unit of work the workflow service can ask the client to perform.
///
/// The set is closed. Strings outside it do not parse and the step resolver reports them as
/// unresolved.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskId {
    UploadDocument,
    UploadDocumentPhoto,
    UploadFacePhoto,
    UploadFaceVideo,
    ProofOfAddressCapture,
    ProfileData,
}

impl TaskId {
    /// Parse a raw task identifier, `None` when it is not one of the known tasks.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}
