//! services/api/src/adapters/prompts.rs
//!
//! Prompt assembly and answer clean-up for the generation provider.

use newsroom_core::domain::{NewsIssueDraft, PublicationType, ThemeType};
use newsroom_core::ports::{ContentRequest, PortError, PortResult};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::LazyLock;

/// The full instruction for writing a two-page issue.
pub fn content_prompt(request: &ContentRequest) -> String {
    let profile = request.publication.editorial_profile();
    let classifieds = if profile.classifieds_flavor.is_empty() {
        String::new()
    } else {
        format!(" {}", profile.classifieds_flavor)
    };

    format!(
        r#"{persona}
Newspaper Name: "{paper}"

Generate a **TWO-PAGE** newspaper issue content based on the Topic: "{topic}".
The Date is: "{date}".
The Visual Theme is: "{theme}".

IMPORTANT: All generated text (headlines, stories, locations, titles) MUST BE IN SIMPLIFIED CHINESE (简体中文).

Page 1 content:
- Main headline and story (Make it substantive, ~250-300 words).
- Short snippets and columns (Make them detailed).
- Weird news ({weird}).
- Image prompt (in ENGLISH).

Page 2 content:
- Editorial (Opinion, ~300 words).
- Classifieds (Funny/Surreal ads{classifieds}).
- Culture section (Arts review, ~200 words).
- Horoscope/Wisdom.

The tone should be {tone}.

Crucially, for 'mainImagePrompt', write it in ENGLISH. Describe a scene fitting the publication's vibe.
{image_focus}"#,
        persona = profile.persona,
        paper = profile.paper_name,
        topic = request.topic,
        date = request.date.format("%Y-%m-%d"),
        theme = request.theme,
        weird = profile.weird_news_focus,
        classifieds = classifieds,
        tone = profile.tone,
        image_focus = profile.image_focus,
    )
}

pub fn rewrite_prompt(current_text: &str, instruction: &str) -> String {
    format!(
        r#"You are a professional newspaper editor.

Original Text: "{current_text}"

Instruction: "{instruction}"

Rewrite the text in Simplified Chinese (简体中文). Keep the same context/meaning unless the instruction says otherwise. Return ONLY the new text."#
    )
}

/// The image prompt with the publication's style phrase appended.
pub fn image_prompt(prompt: &str, publication: PublicationType, theme: ThemeType) -> String {
    newsroom_core::publication::styled_image_prompt(prompt, publication, theme)
}

fn section_schema(title: &str, content: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": title },
            "content": { "type": "string", "description": content }
        },
        "required": ["title", "content"]
    })
}

/// JSON schema the provider's answer must follow.
pub fn issue_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "location": { "type": "string", "description": "Location in Simplified Chinese." },
            "frontPage": {
                "type": "object",
                "properties": {
                    "headline": { "type": "string", "description": "Main story headline in Simplified Chinese. Catchy, 2-8 words." },
                    "mainStory": { "type": "string", "description": "Main article text in Simplified Chinese, detailed and descriptive, about 250-300 words. Professional tone." },
                    "mainImagePrompt": { "type": "string", "description": "A descriptive prompt (in English) to generate a photo for the main story. Ensure it describes the lighting and mood." },
                    "newsSnippets": {
                        "type": "array",
                        "items": section_schema("Snippet title in Simplified Chinese", "News snippet in Simplified Chinese, approx 60-80 words.")
                    },
                    "column1": section_schema("Column title in Simplified Chinese (e.g. 'Reading Corner')", "Column content in Simplified Chinese, approx 120 words."),
                    "column2": section_schema("Column title in Simplified Chinese (e.g. 'Market Watch')", "Column content in Simplified Chinese, approx 100 words."),
                    "weirdNews": section_schema("Weird news title in Simplified Chinese", "A strange/funny short story in Simplified Chinese, approx 100 words.")
                },
                "required": ["headline", "mainStory", "newsSnippets", "column1", "column2", "weirdNews", "mainImagePrompt"]
            },
            "secondPage": {
                "type": "object",
                "properties": {
                    "editorial": section_schema("Editorial title (e.g. 'Editor's Note') in Chinese", "Opinion piece, ~300 words in Chinese. Deep analysis."),
                    "classifieds": {
                        "type": "array",
                        "description": "List of 4-6 funny or surreal classified ads.",
                        "items": section_schema("Item name or service in Chinese", "Short description/price in Chinese")
                    },
                    "culture": section_schema("Culture section title in Chinese", "Art/Music review or essay in Chinese, approx 200 words."),
                    "horoscope": { "type": "string", "description": "A one-sentence daily horoscope or wisdom in Chinese." }
                },
                "required": ["editorial", "classifieds", "culture", "horoscope"]
            }
        },
        "required": ["location", "frontPage", "secondPage"]
    })
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\s*```\s*$").expect("valid regex")
});

/// Removes a markdown code fence wrapped around the whole answer, if any.
pub fn strip_code_fence(text: &str) -> &str {
    match CODE_FENCE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

/// Parses the provider's JSON answer into a draft.
pub fn parse_issue(raw: &str) -> PortResult<NewsIssueDraft> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(PortError::InvalidResponse(
            "No text returned from the provider".to_string(),
        ));
    }
    let draft: NewsIssueDraft = serde_json::from_str(body)
        .map_err(|e| PortError::InvalidResponse(format!("Issue JSON does not match the schema: {}", e)))?;
    if draft.front_page.headline.trim().is_empty() {
        return Err(PortError::InvalidResponse(
            "Issue JSON has an empty headline".to_string(),
        ));
    }
    Ok(draft)
}
