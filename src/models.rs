use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_RUNTIME_SECONDS: u32 = 15;
pub const MAX_RUNTIME_SECONDS: u32 = 90;
pub const DEFAULT_RUNTIME_SECONDS: u32 = 45;
pub const DEFAULT_CREATIVITY: f64 = 0.6;

const TEMPERATURE_OFFSET: f64 = 0.2;
const MIN_TEMPERATURE: f64 = 0.2;
const MAX_TEMPERATURE: f64 = 0.95;

pub const AGE_RANGES: [&str; 4] = ["Ages 2-4", "Ages 5-8", "Ages 9-12", "Ages 13+"];
pub const TONES: [&str; 4] = [
    "Playful & Silly",
    "Calm & Cozy",
    "Adventurous & Bold",
    "Curious & Educational",
];
pub const CADENCES: [&str; 3] = ["Daily uploads", "3 videos/week", "Weekly deep-dive"];

/// The creative brief a user fills in for one short.
///
/// Preset fields are plain strings so that whatever the client sends reaches the
/// prompt verbatim; the form only ever offers the values in [`AGE_RANGES`],
/// [`TONES`] and [`CADENCES`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Brief {
    pub channel_name: String,
    pub topic: String,
    pub age_range: String,
    pub learning_outcome: String,
    pub tone: String,
    pub hero_character: String,
    pub runtime_seconds: i64,
    pub call_to_action: String,
    pub cadence: String,
    pub extra_notes: String,
    pub creativity: Option<f64>,
}

impl Default for Brief {
    fn default() -> Self {
        Self {
            channel_name: String::new(),
            topic: String::new(),
            age_range: AGE_RANGES[1].to_string(),
            learning_outcome: String::new(),
            tone: TONES[0].to_string(),
            hero_character: String::new(),
            runtime_seconds: i64::from(DEFAULT_RUNTIME_SECONDS),
            call_to_action: String::new(),
            cadence: CADENCES[1].to_string(),
            extra_notes: String::new(),
            creativity: Some(DEFAULT_CREATIVITY),
        }
    }
}

impl Brief {
    /// Runtime clamped into the supported 15..=90 second window.
    pub fn effective_runtime(&self) -> u32 {
        let clamped = self.runtime_seconds.clamp(
            i64::from(MIN_RUNTIME_SECONDS),
            i64::from(MAX_RUNTIME_SECONDS),
        );
        // Within u32 range after the clamp.
        clamped as u32
    }

    /// Creativity if it is a usable value in `0.0..=1.0`.
    pub fn effective_creativity(&self) -> Option<f64> {
        self.creativity
            .filter(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Sampling temperature sent to the provider.
    ///
    /// Unusable creativity falls back to the default, giving 0.8.
    pub fn temperature(&self) -> f64 {
        let creativity = self.effective_creativity().unwrap_or(DEFAULT_CREATIVITY);
        (creativity + TEMPERATURE_OFFSET).clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }
}

/// Provider replies sometimes carry `null` where a value was expected.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Scene {
    #[serde(deserialize_with = "null_as_default")]
    pub beat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timing: String,
    #[serde(deserialize_with = "null_as_default")]
    pub narration: String,
    #[serde(deserialize_with = "null_as_default")]
    pub visuals: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sound_design: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hashtags: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub publishing_tip: String,
}

/// Typed view of the provider's reply. Missing fields read as empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratedPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub headline: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hook: String,
    #[serde(deserialize_with = "null_as_default")]
    pub storyline: Vec<Scene>,
    #[serde(deserialize_with = "null_as_default")]
    pub script: String,
    #[serde(deserialize_with = "null_as_default")]
    pub educational_moments: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub call_to_action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub safety_checklist: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: PlanMetadata,
    #[serde(deserialize_with = "null_as_default")]
    pub thumbnail_ideas: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub repurposing_ideas: Vec<String>,
}
