//! Query generation: templates × regions × cities → an ordered query plan.

use serde::{Deserialize, Serialize};

use crate::scout_config::{QueryTemplate, RegionConfig};
use crate::ConfigError;

/// One fully substituted query plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub category: String,
    pub region: String,
    pub city: String,
    pub priority: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    City,
    Region,
}

/// A template parsed into literal text and `{city}` / `{region}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Parse `template`. `{{` and `}}` stand for literal braces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlaceholder`] for any placeholder other
    /// than `{city}` or `{region}`, and [`ConfigError::MalformedTemplate`] for
    /// unbalanced braces.
    pub fn parse(template: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: &str| ConfigError::MalformedTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
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
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        if inner == '{' {
                            return Err(malformed("nested '{'"));
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(malformed("unclosed '{'"));
                    }
                    let slot = match name.trim() {
                        "city" => Segment::City,
                        "region" => Segment::Region,
                        other => {
                            return Err(ConfigError::UnknownPlaceholder {
                                template: template.to_string(),
                                placeholder: other.to_string(),
                            })
                        }
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(slot);
                }
                '}' => return Err(malformed("unmatched '}'")),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    #[must_use]
    pub fn render(&self, city: &str, region: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::City => out.push_str(city),
                Segment::Region => out.push_str(region),
            }
        }
        out
    }
}

/// Build the ordered query plan.
///
/// Order: region priority ascending, then template category, then region
/// name (to break priority ties independently of listing order), then city
/// in configured order, then template in configured order. Every
/// `(template, region, city)` combination yields one entry, even when two
/// render to the same text. `max_queries` truncates the ordered plan.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any template fails to parse.
pub fn build_search_queries(
    regions: &[RegionConfig],
    templates: &[QueryTemplate],
    max_queries: Option<usize>,
) -> Result<Vec<SearchQuery>, ConfigError> {
    let compiled = templates
        .iter()
        .map(|t| CompiledTemplate::parse(&t.template).map(|c| (t, c)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut keyed = Vec::new();
    for region in regions {
        for (city_idx, city) in region.cities.iter().enumerate() {
            for (template_idx, (template, parsed)) in compiled.iter().enumerate() {
                let key = (
                    region.priority,
                    template.category.clone(),
                    region.name.clone(),
                    city_idx,
                    template_idx,
                );
                let query = SearchQuery {
                    query: parsed.render(city, &region.name),
                    category: template.category.clone(),
                    region: region.name.clone(),
                    city: city.clone(),
                    priority: region.priority,
                };
                keyed.push((key, query));
            }
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut plan: Vec<SearchQuery> = keyed.into_iter().map(|(_, q)| q).collect();

    if let Some(cap) = max_queries {
        plan.truncate(cap);
    }
    Ok(plan)
}
