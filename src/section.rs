// Span-based surgery on the INI-like AWS config texts.
//
// Sections are edited by substring replacement rather than a parse/serialize
// round trip so comments, unknown keys and spacing outside the matched span
// survive byte-for-byte.
use regex::Regex;

/// The matched extent of one bracketed section: header through the next `[`
/// (exclusive of its section) or end of text. When the match swallowed the
/// following `[`, `has_boundary` records it so edits can put it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    pub start: usize,
    pub end: usize,
    pub has_boundary: bool,
}

/// Which header spellings to accept when locating a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionForm {
    /// `[name]` only (credentials file)
    Bare,
    /// `[name]` or `[profile name]` (config file)
    ProfilePrefixed,
}

/// Locate the first section named `name`, non-greedy up to the next `[` or
/// end of text. Returns None on malformed or unmatched text, never errors.
pub fn find_section(text: &str, name: &str, form: SectionForm) -> Option<SectionSpan> {
    let header = match form {
        SectionForm::Bare => format!(r"\[{}\]", regex::escape(name)),
        SectionForm::ProfilePrefixed => {
            format!(r"\[(?:profile\s+)?{}\]", regex::escape(name))
        }
    };
    let re = Regex::new(&format!(r"(?s){}.*?(\[|\z)", header)).ok()?;
    let m = re.find(text)?;
    Some(SectionSpan {
        start: m.start(),
        end: m.end(),
        has_boundary: m.as_str().ends_with('['),
    })
}

/// The matched text of a span, without the trailing boundary character.
pub fn section_text<'a>(text: &'a str, span: &SectionSpan) -> &'a str {
    let end = if span.has_boundary {
        span.end - 1
    } else {
        span.end
    };
    &text[span.start..end]
}

/// Value of the last body line matching `key = value`, whitespace-tolerant.
pub fn get_param(section: &str, key: &str) -> Option<String> {
    let re = Regex::new(&format!(r"^\s*{}\s*=\s*(.*)$", regex::escape(key))).ok()?;
    section
        .lines()
        .filter_map(|line| re.captures(line).map(|c| c[1].trim().to_string()))
        .last()
}

/// Substitute a matched span with new content, preserving the trailing
/// boundary character so spacing before the next section is kept intact.
pub fn replace_section(text: &str, span: &SectionSpan, new_content: &str) -> String {
    let mut result = String::with_capacity(text.len() + new_content.len());
    result.push_str(&text[..span.start]);
    result.push_str(new_content);
    if span.has_boundary {
        result.push('[');
    }
    result.push_str(&text[span.end..]);
    result
}

/// Remove a matched span, leaving just its trailing boundary character.
pub fn delete_section(text: &str, span: &SectionSpan) -> String {
    replace_section(text, span, "")
}

/// Every bracketed header in file order, as (raw header name, body) pairs.
/// The body runs from the header to the next `[` or end of text.
pub fn list_sections(text: &str) -> Vec<(String, String)> {
    let re = match Regex::new(r"\[([^\]\r\n]*)\]") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };

    let mut sections = Vec::new();
    for caps in re.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str().to_string();
        let body_start = whole.end();
        let body_end = text[body_start..]
            .find('[')
            .map(|i| body_start + i)
            .unwrap_or(text.len());
        sections.push((name, text[body_start..body_end].to_string()));
    }
    sections
}
