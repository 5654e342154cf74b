use log::{warn, debug};

use crate::app_config::MergeMode;
use crate::segmenter::{segment_value, is_reference_token, Segment};
use crate::translation_service::TranslationService;

// @module: Line-oriented rewriting of mod config files

/// Field keys whose values are subject to translation, in any section.
/// Matching is exact and case-sensitive against the text before the colon.
pub const TRANSLATABLE_FIELDS: [&str; 15] = [
    "displayText",
    "displayDescription",
    "text",
    "description",
    "isLockedMessage",
    "isLockedAltMessage",
    "isLockedAlt2Message",
    "showMessageToPlayer",
    "showMessageToAllPlayers",
    "showMessageToAllEnemyPlayers",
    "showQuickWarLogToPlayer",
    "showQuickWarLogToAllPlayers",
    "displayName",
    "displayNameShort",
    "title",
];

/// A translation failure scoped to a single field, recorded without
/// aborting the rest of the file
#[derive(Debug, Clone)]
pub struct FieldFailure {
    /// The field key that failed
    pub field: String,
    /// The underlying error message
    pub error: String,
}

/// Result of rewriting one config file
#[derive(Debug)]
pub struct RewriteOutcome {
    /// The rewritten file content, lines joined with `\n`
    pub content: String,
    /// Number of fields successfully translated
    pub translated_fields: usize,
    /// Per-field failures; the original lines were preserved for each
    pub failures: Vec<FieldFailure>,
}

/// Rewrites the translatable fields of a single config file.
///
/// The rewriter walks raw lines in order, tracking the current section,
/// consuming multi-line triple-quoted values, and emitting translated lines
/// under the configured merge mode. Values matching the reference-token
/// pattern and comment lines pass through untouched. A missing core-section
/// `displayText` / `displayDescription` is synthesized from the core `name`
/// field at the end of the pass.
pub struct ConfigRewriter<'a> {
    service: &'a TranslationService,
    source_language: &'a str,
    target_language: &'a str,
    mode: MergeMode,
}

impl<'a> ConfigRewriter<'a> {
    /// Create a rewriter bound to a translation service and language pair
    pub fn new(
        service: &'a TranslationService,
        source_language: &'a str,
        target_language: &'a str,
        mode: MergeMode,
    ) -> Self {
        ConfigRewriter {
            service,
            source_language,
            target_language,
            mode,
        }
    }

    /// Rewrite the content of one config file.
    ///
    /// Translation failures are isolated per field: the original lines are
    /// preserved and the failure is recorded in the outcome, so a flaky
    /// backend never corrupts the file.
    pub async fn rewrite(&self, content: &str) -> RewriteOutcome {
        let lines: Vec<&str> = content.lines().collect();

        let mut output: Vec<String> = Vec::with_capacity(lines.len());
        let mut failures: Vec<FieldFailure> = Vec::new();
        let mut translated_fields = 0;

        let mut in_core_section = false;
        let mut core_name_value: Option<String> = None;
        let mut core_name_anchor: Option<usize> = None;
        let mut core_display_text_found = false;
        let mut core_display_description_found = false;

        let mut i = 0;
        while i < lines.len() {
            let raw = lines[i];
            let trimmed = raw.trim();

            // Comment lines never change section state and skip all field logic
            if trimmed.starts_with('#') {
                output.push(raw.to_string());
                i += 1;
                continue;
            }

            // Section headers: only an exact "core" name enters the core section
            if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
                let name = trimmed[1..trimmed.len() - 1].trim();
                in_core_section = name == "core";
                output.push(raw.to_string());
                i += 1;
                continue;
            }

            let Some((key, value)) = split_field(trimmed) else {
                output.push(raw.to_string());
                i += 1;
                continue;
            };

            if in_core_section {
                match key {
                    // The name line is the insertion anchor for fallback synthesis
                    "name" => {
                        core_name_value = Some(value.trim().to_string());
                        core_name_anchor = Some(output.len());
                    }
                    "displayText" => core_display_text_found = true,
                    "displayDescription" => core_display_description_found = true,
                    _ => {}
                }
            }

            if !TRANSLATABLE_FIELDS.contains(&key) {
                output.push(raw.to_string());
                i += 1;
                continue;
            }

            // Consume a multi-line triple-quoted value if the opening line
            // does not also close it
            let mut cursor = i;
            let mut clean_value = value.trim().to_string();
            let mut quote = "";
            if clean_value.contains("\"\"\"") || clean_value.contains("'''") {
                quote = if clean_value.contains("\"\"\"") { "\"\"\"" } else { "'''" };
                if clean_value.matches(quote).count() <= 1 {
                    let mut parts = vec![clean_value.clone()];
                    cursor += 1;
                    while cursor < lines.len() && !lines[cursor].contains(quote) {
                        parts.push(lines[cursor].to_string());
                        cursor += 1;
                    }
                    if cursor < lines.len() {
                        parts.push(lines[cursor].to_string());
                    } else {
                        // ConfigParseAnomaly: no closing marker before EOF,
                        // the remaining lines become the value
                        warn!(
                            "Unterminated {} block for field '{}', using remaining lines as the value",
                            quote, key
                        );
                        cursor = lines.len() - 1;
                    }
                    clean_value = parts.join("\n");
                }
                clean_value = clean_value
                    .replace("\"\"\"", "")
                    .replace("'''", "")
                    .trim()
                    .to_string();
            }
            let next = cursor + 1;

            // Reference tokens are never translated: every consumed raw line
            // is re-emitted byte-identically
            if is_reference_token(&clean_value) {
                debug!("Skipping reference token in field '{}': {}", key, clean_value);
                for consumed in &lines[i..next] {
                    output.push(consumed.to_string());
                }
                i = next;
                continue;
            }

            // Nothing translatable: re-emit every consumed raw line, not just
            // the opening one, so multi-line markers stay balanced
            let segments = segment_value(&clean_value);
            if segments.is_empty() {
                for consumed in &lines[i..next] {
                    output.push(consumed.to_string());
                }
                i = next;
                continue;
            }

            match self.translate_segments(&segments).await {
                Ok(translated) => {
                    self.emit_field(&mut output, key, quote, &clean_value, &translated);
                    translated_fields += 1;
                }
                Err(error) => {
                    warn!("Translation failed for field '{}': {}", key, error);
                    failures.push(FieldFailure { field: key.to_string(), error });
                    for consumed in &lines[i..next] {
                        output.push(consumed.to_string());
                    }
                }
            }
            i = next;
        }

        // Synthesize missing core display fields from the core name, in a
        // fixed order: displayText directly after the name line, then
        // displayDescription. Failures here are recorded, never fatal.
        if let (Some(name_value), Some(anchor)) = (core_name_value, core_name_anchor) {
            let clean_name = name_value
                .replace("\"\"\"", "")
                .replace("'''", "")
                .trim()
                .to_string();

            let mut insert_at = anchor + 1;
            let fallback_fields = [
                ("displayText", core_display_text_found),
                ("displayDescription", core_display_description_found),
            ];
            for (field, found) in fallback_fields {
                if found || clean_name.is_empty() {
                    continue;
                }
                match self
                    .service
                    .translate(&clean_name, self.source_language, self.target_language)
                    .await
                {
                    Ok(translated) => {
                        let (first, second) = match self.mode {
                            MergeMode::Add => (
                                format!("{}: {}", field, clean_name),
                                format!("{}_{}: {}", field, self.target_language, translated),
                            ),
                            MergeMode::Replace => (
                                format!("{}: {}", field, translated),
                                format!("{}_{}: {}", field, self.source_language, clean_name),
                            ),
                        };
                        output.insert(insert_at, first);
                        output.insert(insert_at + 1, second);
                        insert_at += 2;
                        translated_fields += 1;
                    }
                    Err(error) => {
                        warn!("Fallback translation failed for core '{}': {}", field, error);
                        failures.push(FieldFailure {
                            field: field.to_string(),
                            error: error.to_string(),
                        });
                    }
                }
            }
        }

        RewriteOutcome {
            content: output.join("\n"),
            translated_fields,
            failures,
        }
    }

    /// Translate the literal segments of a value, passing placeholders
    /// through verbatim, and reassemble in original order
    async fn translate_segments(&self, segments: &[Segment]) -> Result<String, String> {
        let mut result = String::new();
        for segment in segments {
            match segment {
                Segment::Placeholder(text) => result.push_str(text),
                Segment::Literal(text) => {
                    let translated = self
                        .service
                        .translate(text, self.source_language, self.target_language)
                        .await
                        .map_err(|e| e.to_string())?;
                    result.push_str(&translated);
                }
            }
        }
        Ok(result)
    }

    /// Emit the two output lines for a translated field under the merge mode,
    /// re-wrapping multi-line values in their original quote marker
    fn emit_field(
        &self,
        output: &mut Vec<String>,
        key: &str,
        quote: &str,
        original: &str,
        translated: &str,
    ) {
        match self.mode {
            MergeMode::Add => {
                output.push(format!("{}: {}{}{}", key, quote, original, quote));
                output.push(format!(
                    "{}_{}: {}{}{}",
                    key, self.target_language, quote, translated, quote
                ));
            }
            MergeMode::Replace => {
                output.push(format!("{}: {}{}{}", key, quote, translated, quote));
                output.push(format!(
                    "{}_{}: {}{}{}",
                    key, self.source_language, quote, original, quote
                ));
            }
        }
    }
}

/// Split a `key: value` line on the first colon, trimming the key.
/// Returns None for lines that are not fields.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, value))
}
