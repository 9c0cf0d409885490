//! Resource Registry - central registration of all resources.
//!
//! Static resources and the URI templates clients can fill in.

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate};

/// URI of the server information resource.
pub const SERVER_INFO_URI: &str = "pagegate://server/info";

/// Prefix of page URIs; the remainder is the page identifier.
pub const PAGE_URI_PREFIX: &str = "page:///";

/// Get all registered resources.
pub fn get_all_resources() -> Vec<Resource> {
    let mut info = RawResource::new(SERVER_INFO_URI, "Server Information");
    info.description = Some("Server version and gate policy".to_string());
    info.mime_type = Some("application/json".to_string());

    vec![info.no_annotation()]
}

/// Get all registered resource templates.
///
/// Resource templates use URI templates (RFC 6570) to describe
/// parameterized resources that clients can fill in.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        RawResourceTemplate {
            uri_template: format!("{}{{page}}", PAGE_URI_PREFIX),
            name: "Pages".to_string(),
            title: Some("Content Pages".to_string()),
            description: Some(
                "Read a page from the content root by its relative identifier".to_string(),
            ),
            mime_type: Some("application/octet-stream".to_string()),
        }
        .no_annotation(),
    ]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![SERVER_INFO_URI]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.uri, SERVER_INFO_URI);
    }

    #[test]
    fn test_get_all_resource_templates() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, "page:///{page}");
    }

    #[test]
    fn test_resource_uris_match_resources() {
        let resources = get_all_resources();
        for uri in resource_uris() {
            assert!(resources.iter().any(|r| r.raw.uri == uri));
        }
    }
}
