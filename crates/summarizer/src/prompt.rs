use repolens_protocol::RepoRef;

/// Instruction template for the summarization call. The model must answer
/// with a bare JSON object matching the `Summary` schema.
pub const SYSTEM_PROMPT: &str = "\
You are a software project analyst. Given the file tree and selected file \
contents of a source-code repository, produce a structured JSON analysis \
with exactly three fields:

1. \"overview\": a clear, human-readable description (2-4 sentences) of what \
the project does, its purpose, and who it is for. Be specific and \
informative.

2. \"technologies\": a JSON array of strings listing the main programming \
languages, frameworks, libraries, and tools the project uses. Include only \
significant dependencies, not every transitive package. Order by importance.

3. \"structure_notes\": a brief description (2-3 sentences) of how the \
project is organized. Focus on the purpose and relationships between major \
parts, not just directory names: where the core logic lives, where tests \
are, how the project is built, and any notable architectural patterns.

Respond ONLY with valid JSON. No markdown, no code fences, no extra text.
";

/// Build the user message for one repository.
pub fn user_prompt(repo: &RepoRef, payload: &str) -> String {
    format!(
        "Analyze the following repository and produce a JSON summary.\n\n\
         Repository: {}/{}\n\n\
         {payload}\n\n\
         Respond with a JSON object containing \"overview\", \"technologies\", \
         and \"structure_notes\" fields.",
        repo.owner, repo.name
    )
}
