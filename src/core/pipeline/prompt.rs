//! Prompt rotation

/// Used when no non-empty prompt is configured
pub const DEFAULT_PROMPT: &str =
    "Create a product photo style image of this item on a clean white background";

/// Replaced by the describe output when present in a prompt template
pub const DESCRIPTION_PLACEHOLDER: &str = "{description}";

/// Round-robin over the configured prompts, keyed by the processed count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRotation {
    prompts: Vec<String>,
}

impl PromptRotation {
    /// Keep only prompts that are non-empty after trimming
    pub fn new<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prompts: prompts
                .into_iter()
                .map(Into::into)
                .map(|p: String| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Number of active prompts
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Template for the item launched after `processed` items settled
    pub fn select(&self, processed: usize) -> &str {
        if self.prompts.is_empty() {
            DEFAULT_PROMPT
        } else {
            &self.prompts[processed % self.prompts.len()]
        }
    }

    /// Final prompt: selected template combined with the description
    pub fn build_prompt(&self, processed: usize, description: Option<&str>) -> String {
        combine(self.select(processed), description)
    }
}

fn combine(template: &str, description: Option<&str>) -> String {
    let description = description.map(str::trim).filter(|d| !d.is_empty());

    match description {
        Some(description) if template.contains(DESCRIPTION_PLACEHOLDER) => {
            template.replace(DESCRIPTION_PLACEHOLDER, description)
        }
        Some(description) => format!("{}\n\nReference image description: {}", template, description),
        None => template.replace(DESCRIPTION_PLACEHOLDER, "").trim().to_string(),
    }
}
