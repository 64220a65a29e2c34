// header.rs - 输出 read id 模板, 如 `{sampleId}_{index}`

use std::fmt::Write as _;

use crate::error::{Error, Result};

/// Per-match values a template can refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext<'a> {
    pub sample_id: &'a str,
    pub index: u64,
    pub label: Option<&'a str>,
    pub barcode_seq: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    SampleId,
    Index,
    Label,
    BarcodeSeq,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "sampleId" => Some(Field::SampleId),
            "index" => Some(Field::Index),
            "label" => Some(Field::Label),
            "barcodeSeq" => Some(Field::BarcodeSeq),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed id template. `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl HeaderTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |msg: String| Error::InvalidTemplate {
            template: template.to_string(),
            msg,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(invalid(format!("unclosed placeholder {{{name}"))),
                        }
                    }
                    let field = Field::from_name(&name)
                        .ok_or_else(|| invalid(format!("unknown placeholder {{{name}}}")))?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' => return Err(invalid("unmatched `}`".to_string())),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(HeaderTemplate {
            source: template.to_string(),
            segments,
        })
    }

    /// Substitute `context` into the template. A missing label renders empty.
    pub fn render(&self, context: &HeaderContext<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + context.sample_id.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::SampleId) => out.push_str(context.sample_id),
                Segment::Field(Field::Index) => {
                    let _ = write!(out, "{}", context.index);
                }
                Segment::Field(Field::Label) => out.push_str(context.label.unwrap_or_default()),
                Segment::Field(Field::BarcodeSeq) => out.push_str(context.barcode_seq),
            }
        }
        out
    }
}

/// Parse and render in one step.
pub fn format_header(template: &str, context: &HeaderContext<'_>) -> Result<String> {
    Ok(HeaderTemplate::parse(template)?.render(context))
}
