//! Request payloads sent to the generative model.

use serde_json::{Value, json};
use uzcode_common::AnalysisResult;

/// Characters of problem content included in a judge description.
pub const DESCRIPTION_CONTENT_CHARS: usize = 500;

const TRANSLATION_TEMPERATURE: f64 = 0.3;

pub fn judge_prompt(code: &str, problem: &str) -> String {
    format!(
        "You are an expert code judge. Analyze the provided Python code against the problem.\n\
         \n\
         Problem:\n\
         {problem}\n\
         \n\
         User's Code:\n\
         {code}\n\
         \n\
         Analyze the solution and respond ONLY with a JSON object that strictly adheres to the provided schema.\n\
         The critique should assess correctness, efficiency, and adherence to Python best practices. \
         Give the response in uzbek, whatever language the code or problem is written in.\n"
    )
}

/// `generateContent` body asking for a structured `AnalysisResult`.
pub fn judge_request(code: &str, problem: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": judge_prompt(code, problem) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": AnalysisResult::response_schema(),
        },
    })
}

/// `generateContent` body asking for a plain Uzbek translation.
pub fn translation_request(text: &str) -> Value {
    json!({
        "contents": [{
            "parts": [{
                "text": format!(
                    "Translate this into Uzbek. Do NOT change formatting, do NOT add comments:\n\n{text}"
                )
            }]
        }],
        "generationConfig": { "temperature": TRANSLATION_TEMPERATURE },
    })
}

/// Description of a cached problem handed to the judge.
///
/// Content is cut to its first 500 characters and `...` is always appended.
pub fn problem_description(title: &str, difficulty: &str, content: Option<&str>) -> String {
    let excerpt: String = content
        .unwrap_or_default()
        .chars()
        .take(DESCRIPTION_CONTENT_CHARS)
        .collect();
    format!("Problem Title: {title}\nDifficulty: {difficulty}\nContent: {excerpt}...")
}

/// Description used when only the problem slug is known.
pub fn slug_description(slug: &str) -> String {
    format!("Problem Slug: {slug}. The task is to solve this problem.")
}
