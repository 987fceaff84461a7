//! JSON collection payloads: plain arrays and paged wrappers.
//!
//! The LMS REST API returns `{ "results": [...], "paging": { "nextPage": ... } }`.
//! Exports saved from it keep that shape, while hand-made fixtures are plain
//! arrays. Both are flattened to one `Vec<Value>` before validation; nothing
//! downstream sees paging metadata.

use std::path::Path;

use serde_json::Value;

use enroll_model::json_kind;

use crate::error::{IngestError, Result};

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub results: Vec<Value>,
    /// Cursor of the following page, if the source has one.
    pub next_page: Option<String>,
}

/// Interprets a parsed payload as a page. `origin` is only used in errors.
pub fn parse_page(origin: &Path, payload: Value) -> Result<Page> {
    match payload {
        Value::Array(results) => Ok(Page {
            results,
            next_page: None,
        }),
        Value::Object(mut object) => {
            let results = match object.remove("results") {
                Some(Value::Array(results)) => results,
                Some(other) => {
                    return Err(IngestError::MalformedPage {
                        path: origin.to_path_buf(),
                        reason: format!("`results` must be an array, found {}", json_kind(&other)),
                    });
                }
                None => {
                    return Err(IngestError::UnexpectedShape {
                        path: origin.to_path_buf(),
                        found: "object",
                    });
                }
            };
            let next_page = match object.get("paging") {
                None | Some(Value::Null) => None,
                Some(Value::Object(paging)) => match paging.get("nextPage") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(next)) if next.trim().is_empty() => None,
                    Some(Value::String(next)) => Some(next.clone()),
                    Some(other) => {
                        return Err(IngestError::MalformedPage {
                            path: origin.to_path_buf(),
                            reason: format!(
                                "`paging.nextPage` must be a string, found {}",
                                json_kind(other)
                            ),
                        });
                    }
                },
                Some(other) => {
                    return Err(IngestError::MalformedPage {
                        path: origin.to_path_buf(),
                        reason: format!("`paging` must be an object, found {}", json_kind(other)),
                    });
                }
            };
            Ok(Page { results, next_page })
        }
        other => Err(IngestError::UnexpectedShape {
            path: origin.to_path_buf(),
            found: json_kind(&other),
        }),
    }
}

/// Concatenates page results in order.
pub fn unwrap_pages<I>(pages: I) -> Vec<Value>
where
    I: IntoIterator<Item = Page>,
{
    pages.into_iter().flat_map(|page| page.results).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_array() {
        let page = parse_page(Path::new("x.json"), json!([{"id": "a"}])).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_paged_wrapper() {
        let payload = json!({
            "results": [{"id": "a"}, {"id": "b"}],
            "paging": { "nextPage": "/learn/api/public/v3/courses?offset=2" }
        });
        let page = parse_page(Path::new("x.json"), payload).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(
            page.next_page.as_deref(),
            Some("/learn/api/public/v3/courses?offset=2")
        );
    }

    #[test]
    fn test_last_page_without_paging() {
        let page = parse_page(Path::new("x.json"), json!({"results": []})).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(matches!(
            parse_page(Path::new("x.json"), json!("courses")),
            Err(IngestError::UnexpectedShape { found: "string", .. })
        ));
        assert!(matches!(
            parse_page(Path::new("x.json"), json!({"data": []})),
            Err(IngestError::UnexpectedShape { found: "object", .. })
        ));
        assert!(matches!(
            parse_page(Path::new("x.json"), json!({"results": {}})),
            Err(IngestError::MalformedPage { .. })
        ));
    }

    #[test]
    fn test_unwrap_pages_preserves_order() {
        let pages = vec![
            Page {
                results: vec![json!(1), json!(2)],
                next_page: Some("p2".to_string()),
            },
            Page {
                results: vec![json!(3)],
                next_page: None,
            },
        ];
        assert_eq!(unwrap_pages(pages), vec![json!(1), json!(2), json!(3)]);
    }
}
