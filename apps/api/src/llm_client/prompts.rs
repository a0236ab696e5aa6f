// Shared prompt plumbing and cross-cutting prompt fragments.
// Each stage defines its own versioned template in pipeline/prompts.rs.

/// A parameterized prompt. Placeholders are written `{name}` and filled by `render`.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub stage: &'static str,
    pub version: u32,
    pub body: &'static str,
}

impl PromptTemplate {
    /// Substitutes every `{key}` with its value in a single pass over the body, so
    /// braces inside substituted values are never expanded. Unknown placeholders are
    /// left as-is.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let substituted = after.find('}').and_then(|close| {
                let key = &after[..close];
                vars.iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, value)| (*value, close))
            });
            match substituted {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// `stage@vN`, used in logs to tie a response to the template that produced it.
    pub fn id(&self) -> String {
        format!("{}@v{}", self.stage, self.version)
    }
}

/// Appended to every prompt that embeds the Vault. The application cannot verify
/// compliance; it only asks for it.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY facts present in the CAREER VAULT below. \
    Do NOT invent employers, titles, dates, metrics or credentials. \
    If the vault does not support a claim, leave it out.";

/// Stands in for the Vault when it has not been seeded yet.
pub const EMPTY_VAULT_PLACEHOLDER: &str = "(No career vault seeded yet.)";
