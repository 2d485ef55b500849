//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// LLM models known to the extraction pipeline (Value Object)
///
/// Reasoning models reject an explicit sampling temperature, so every
/// request builder consults [`Model::is_reasoning`] before pinning one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // GPT models
    Gpt4o,
    Gpt4oMini,
    Gpt41,
    Gpt41Mini,
    Gpt41Nano,
    // Reasoning models
    O1,
    O1Mini,
    O3,
    O3Mini,
    O4Mini,
    Gpt5,
    Gpt5Mini,
    Gpt5Nano,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4o => "gpt-4o",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt41Mini => "gpt-4.1-mini",
            Model::Gpt41Nano => "gpt-4.1-nano",
            Model::O1 => "o1",
            Model::O1Mini => "o1-mini",
            Model::O3 => "o3",
            Model::O3Mini => "o3-mini",
            Model::O4Mini => "o4-mini",
            Model::Gpt5 => "gpt-5",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Gpt5Nano => "gpt-5-nano",
            Model::Custom(s) => s,
        }
    }

    /// Check if this is a reasoning model.
    ///
    /// Membership is a fixed allow-list of literals; custom model names are
    /// never treated as reasoning models.
    pub fn is_reasoning(&self) -> bool {
        matches!(
            self,
            Model::O1
                | Model::O1Mini
                | Model::O3
                | Model::O3Mini
                | Model::O4Mini
                | Model::Gpt5
                | Model::Gpt5Mini
                | Model::Gpt5Nano
        )
    }

    /// Sampling temperature to send with a request.
    ///
    /// `None` for reasoning models (the field must be omitted), otherwise the
    /// deterministic value `0.0`.
    pub fn request_temperature(&self) -> Option<f32> {
        if self.is_reasoning() { None } else { Some(0.0) }
    }
}

impl Default for Model {
    /// Returns the default model (gpt-4.1)
    fn default() -> Self {
        Model::Gpt41
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4o" => Model::Gpt4o,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4.1-mini" => Model::Gpt41Mini,
            "gpt-4.1-nano" => Model::Gpt41Nano,
            "o1" => Model::O1,
            "o1-mini" => Model::O1Mini,
            "o3" => Model::O3,
            "o3-mini" => Model::O3Mini,
            "o4-mini" => Model::O4Mini,
            "gpt-5" => Model::Gpt5,
            "gpt-5-mini" => Model::Gpt5Mini,
            "gpt-5-nano" => Model::Gpt5Nano,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // FromStr is infallible: unknown names become Model::Custom
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
