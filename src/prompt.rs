use crate::models::Brief;

pub const SYSTEM_PROMPT: &str = r##"
  You are a senior producer of short-form videos for children. You plan shorts that are
  joyful, age-appropriate and easy to film on a small budget.

  OUTPUT: Return ONLY a valid JSON object with exactly these keys:
  {
    "headline": "Punchy title for the short",
    "hook": "First 3 seconds, spoken or shown",
    "storyline": [
      {
        "beat": "Beat label",
        "timing": "0-5s",
        "narration": "What the host says",
        "visuals": "What is on screen",
        "soundDesign": "Music or sound effect cue"
      }
    ],
    "script": "Full narration script with speaker labels",
    "educationalMoments": ["What a child learns, one per item"],
    "callToAction": "Closing line inviting the viewer back",
    "safetyChecklist": ["Item a parent or producer should double-check"],
    "metadata": {
      "description": "Platform description, 2-3 sentences",
      "hashtags": ["#tag"],
      "keywords": ["keyword"],
      "publishingTip": "One tip for when or how to publish"
    },
    "thumbnailIdeas": ["Thumbnail concept"],
    "repurposingIdeas": ["How to reuse this content elsewhere"]
  }

  RULES:
  - Keep every scene timing inside the requested runtime
  - Language, humour and pacing must suit the target age bracket
  - No dangerous stunts, no scary or violent imagery, no unsafe challenges
  - Never ask children for personal information or to leave the platform
  - No brand or product mentions unless the brief names them
  - Use inclusive, kind language and model positive behaviour
  - Do not wrap the JSON in markdown code fences
"##;

const DEFAULT_CHANNEL: &str = "an upcoming kids channel";
const DEFAULT_TOPIC: &str = "a surprising everyday wonder";
const DEFAULT_LEARNING_OUTCOME: &str = "Make it a fun, positive learning moment.";
const DEFAULT_HERO: &str = "Create a lovable original host character.";
const DEFAULT_CALL_TO_ACTION: &str = "Invite viewers to subscribe for more adventures.";
const DEFAULT_NOTES: &str = "No additional notes.";

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

/// Builds the user message for one brief. Same brief, same prompt.
pub fn build_user_prompt(brief: &Brief) -> String {
    let runtime = brief.effective_runtime();
    let lines = [
        format!(
            "Plan a {runtime}-second vertical short for {}.",
            or_default(&brief.channel_name, DEFAULT_CHANNEL)
        ),
        format!("Topic: {}.", or_default(&brief.topic, DEFAULT_TOPIC)),
        format!("Target audience: {}.", brief.age_range.trim()),
        format!(
            "Learning outcome: {}",
            or_default(&brief.learning_outcome, DEFAULT_LEARNING_OUTCOME)
        ),
        format!("Tone: {}.", brief.tone.trim()),
        format!(
            "Hero character: {}",
            or_default(&brief.hero_character, DEFAULT_HERO)
        ),
        format!(
            "Call to action: {}",
            or_default(&brief.call_to_action, DEFAULT_CALL_TO_ACTION)
        ),
        format!("Publishing cadence: {}.", brief.cadence.trim()),
        format!("Extra notes: {}", or_default(&brief.extra_notes, DEFAULT_NOTES)),
        format!(
            "Split the storyline into beats that add up to exactly {runtime} seconds and \
             keep the script short enough to read aloud in that time."
        ),
    ];
    lines.join("\n")
}
