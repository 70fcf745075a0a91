//! Prompts for exam-question generation.
//!
//! Every prompt string lives here so the rubric can be changed in one place
//! and unit tests can inspect it without a live model. Rendering is a pure
//! function of the source text: the same input always yields the same prompt,
//! which keeps recorded fixtures reproducible.
//!
//! Callers can override the system message via
//! [`crate::config::GeneratorConfig::system_prompt`]; the user message always
//! comes from [`render_question_prompt`].

/// Default cap on source text, in characters.
pub const DEFAULT_MAX_SOURCE_CHARS: usize = 15_000;

/// Appended to source text cut at the cap.
pub const TRUNCATION_MARKER: &str = "\n\n[... content truncated ...]";

/// Placeholder in [`QUESTION_PROMPT_TEMPLATE`] replaced by the source text.
const SOURCE_PLACEHOLDER: &str = "{source_text}";

/// Default system message.
pub const SYSTEM_PROMPT: &str = "You are an experienced examiner who writes clear, \
fair exam questions with model answers. You always respond with a single valid JSON \
object and nothing else.";

/// User message template. `{source_text}` is replaced verbatim.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Read the study material below and write exam questions that test understanding of it.

Produce questions in four categories:

1. 1-MARK QUESTIONS (3-5 questions)
   - Short factual recall: definitions, names, single facts
   - Answer in one sentence

2. 2-MARK QUESTIONS (3-5 questions)
   - Brief explanation or a pair of related points
   - Answer in two to three sentences

3. 3-MARK QUESTIONS (2-4 questions)
   - Explain a process, compare two ideas, or apply a concept
   - Answer in a short paragraph

4. 10-MARK QUESTIONS (1-2 questions)
   - Essay-style: analyse, evaluate or discuss in depth
   - Answer as a structured multi-paragraph model answer

Base every question and answer only on the material provided.

OUTPUT FORMAT
Respond with a single JSON object and nothing else, exactly in this shape:
{
  "questions": [
    {
      "question_text": "the question",
      "answer_text": "the model answer",
      "marks": 1
    }
  ]
}
"marks" must be one of 1, 2, 3 or 10.

STUDY MATERIAL:
{source_text}"#;

/// Render the user prompt for `source_text`.
///
/// The text is embedded as given; truncation happens earlier, in
/// [`crate::pipeline::request::GenerationRequest::new`].
pub fn render_question_prompt(source_text: &str) -> String {
    QUESTION_PROMPT_TEMPLATE.replacen(SOURCE_PLACEHOLDER, source_text, 1)
}
