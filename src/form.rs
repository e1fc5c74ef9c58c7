//! State behind the brief form page.
//!
//! One `BriefForm` lives for one page view: it holds the brief being edited and
//! the last generated plan or error. Clipboard writes and the copy
//! confirmation happen in the browser.

use std::time::Duration;

use serde::Deserialize;

use crate::{
    generator::GenerateError,
    models::{Brief, GeneratedPlan, Scene},
};

pub const QUICK_PREVIEW_SCENES: usize = 3;
/// How long the copy confirmation stays on screen.
pub const NOTICE_LIFETIME: Duration = Duration::from_millis(2500);
pub const GENERIC_FAILURE: &str = "Something went wrong while generating. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// The endpoint answered with an error message of its own.
    Server(String),
    /// The request never completed or the reply could not be read.
    Unreadable,
}

impl SubmitError {
    pub fn user_message(&self) -> &str {
        match self {
            SubmitError::Server(message) if !message.trim().is_empty() => message.as_str(),
            _ => GENERIC_FAILURE,
        }
    }
}

impl From<GenerateError> for SubmitError {
    fn from(err: GenerateError) -> Self {
        SubmitError::Server(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopySection {
    Script,
    Storyboard,
    Metadata,
    Everything,
}

impl CopySection {
    pub const ALL: [CopySection; 4] = [
        CopySection::Script,
        CopySection::Storyboard,
        CopySection::Metadata,
        CopySection::Everything,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CopySection::Script => "script",
            CopySection::Storyboard => "storyboard",
            CopySection::Metadata => "metadata",
            CopySection::Everything => "everything",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CopySection::Script => "Copy script",
            CopySection::Storyboard => "Copy storyboard",
            CopySection::Metadata => "Copy metadata",
            CopySection::Everything => "Copy everything",
        }
    }
}

/// Raw urlencoded fields as the browser posts them.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BriefFields {
    pub channel_name: String,
    pub topic: String,
    pub age_range: String,
    pub learning_outcome: String,
    pub tone: String,
    pub hero_character: String,
    pub runtime_seconds: String,
    pub call_to_action: String,
    pub cadence: String,
    pub extra_notes: String,
    pub creativity: String,
}

impl BriefFields {
    /// Unparsable numbers fall back to the form defaults; blank presets too.
    pub fn into_brief(self) -> Brief {
        let defaults = Brief::default();
        let preset = |value: String, fallback: String| {
            if value.trim().is_empty() {
                fallback
            } else {
                value
            }
        };
        Brief {
            channel_name: self.channel_name,
            topic: self.topic,
            age_range: preset(self.age_range, defaults.age_range),
            learning_outcome: self.learning_outcome,
            tone: preset(self.tone, defaults.tone),
            hero_character: self.hero_character,
            runtime_seconds: self
                .runtime_seconds
                .trim()
                .parse()
                .unwrap_or(defaults.runtime_seconds),
            call_to_action: self.call_to_action,
            cadence: preset(self.cadence, defaults.cadence),
            extra_notes: self.extra_notes,
            creativity: self
                .creativity
                .trim()
                .parse()
                .ok()
                .or(defaults.creativity),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BriefForm {
    pub brief: Brief,
    pub plan: Option<GeneratedPlan>,
    pub error: Option<String>,
}

impl BriefForm {
    pub fn with_brief(brief: Brief) -> Self {
        Self {
            brief,
            ..Self::default()
        }
    }

    /// Clears previous results and hands out the brief to send.
    pub fn begin_submission(&mut self) -> Brief {
        self.plan = None;
        self.error = None;
        self.brief.clone()
    }

    pub fn finish(&mut self, outcome: Result<GeneratedPlan, SubmitError>) {
        match outcome {
            Ok(plan) => {
                self.plan = Some(plan);
                self.error = None;
            }
            Err(err) => {
                self.plan = None;
                self.error = Some(err.user_message().to_string());
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The first few scenes, in storyline order.
    pub fn quick_preview(&self) -> &[Scene] {
        match &self.plan {
            Some(plan) => {
                let end = plan.storyline.len().min(QUICK_PREVIEW_SCENES);
                &plan.storyline[..end]
            }
            None => &[],
        }
    }

    /// Text for the clipboard, or `None` when there is nothing to copy.
    pub fn copy_text(&self, section: CopySection) -> Option<String> {
        let plan = self.plan.as_ref()?;
        let text = match section {
            CopySection::Script => format_script(plan),
            CopySection::Storyboard => format_storyboard(plan),
            CopySection::Metadata => format_metadata(plan),
            CopySection::Everything => [
                format!("{}\n\nHook: {}", plan.headline, plan.hook),
                format_storyboard(plan),
                format_script(plan),
                format_list("Educational moments", &plan.educational_moments),
                format!("Call to action: {}", plan.call_to_action),
                format_list("Safety checklist", &plan.safety_checklist),
                format_metadata(plan),
                format_list("Thumbnail ideas", &plan.thumbnail_ideas),
                format_list("Repurposing ideas", &plan.repurposing_ideas),
            ]
            .join("\n\n"),
        };
        Some(text)
    }
}

fn format_script(plan: &GeneratedPlan) -> String {
    format!("Script\n{}", plan.script)
}

fn format_storyboard(plan: &GeneratedPlan) -> String {
    let scenes: Vec<String> = plan
        .storyline
        .iter()
        .enumerate()
        .map(|(i, scene)| {
            format!(
                "{}. {} ({})\nNarration: {}\nVisuals: {}\nSound: {}",
                i + 1,
                scene.beat,
                scene.timing,
                scene.narration,
                scene.visuals,
                scene.sound_design
            )
        })
        .collect();
    format!("Storyboard\n{}", scenes.join("\n\n"))
}

fn format_metadata(plan: &GeneratedPlan) -> String {
    let meta = &plan.metadata;
    format!(
        "Description: {}\nHashtags: {}\nKeywords: {}\nPublishing tip: {}",
        meta.description,
        meta.hashtags.join(" "),
        meta.keywords.join(", "),
        meta.publishing_tip
    )
}

fn format_list(title: &str, items: &[String]) -> String {
    let lines: Vec<String> = items.iter().map(|item| format!("- {item}")).collect();
    format!("{title}\n{}", lines.join("\n"))
}
