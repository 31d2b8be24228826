//! Toast payload decoding.
//!
//! Notification payloads arrive as toast XML authored by arbitrary apps, so
//! decoding is strictly best-effort: a blank payload decodes to nothing, a
//! payload that is not well-formed XML is kept raw, and a well-formed one is
//! mined for the handful of fields a consumer actually displays.

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

/// Display-ready content extracted from a notification's toast XML.
///
/// `raw_xml` always holds the original payload text, even when none of the
/// structured fields could be extracted from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub images: Vec<String>,
    pub is_silent: Option<bool>,
    pub app_id: Option<String>,
    pub raw_xml: String,
}

impl NotificationPayload {
    /// Decode a raw payload string.
    ///
    /// Returns `None` for an absent or whitespace-only payload. Anything else
    /// yields `Some`; if the input does not parse as XML only `raw_xml` is
    /// populated. Never fails.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.trim().is_empty() {
            return None;
        }

        let mut payload = Self {
            raw_xml: raw.to_string(),
            ..Self::default()
        };
        if let Ok(doc) = Document::parse(raw) {
            payload.extract(&doc);
        }
        Some(payload)
    }

    fn extract(&mut self, doc: &Document) {
        let root = doc.root_element();

        // <header id="..." title="..."/> as a direct child of the root. A
        // header-provided title takes precedence over text elements below.
        if let Some(header) = root
            .children()
            .find(|n| n.is_element() && n.has_tag_name("header"))
        {
            if let Some(id) = non_blank_attr(&header, "id") {
                self.app_id = Some(id);
            }
            if let Some(title) = non_blank_attr(&header, "title") {
                self.title = Some(title);
            }
        }

        // Text elements in document order fill title first, then body.
        for text in doc.descendants().filter(|n| n.has_tag_name("text")) {
            if self.title.is_none() {
                self.title = Some(element_text(&text));
            } else if self.body.is_none() {
                self.body = Some(element_text(&text));
            } else {
                break;
            }
        }

        for image in doc.descendants().filter(|n| n.has_tag_name("image")) {
            match image.attribute("src") {
                Some(src) if !src.is_empty() => self.images.push(src.to_string()),
                _ => {}
            }
        }

        // Only the first <audio> element counts; an unrecognized silent value
        // leaves the flag undetermined.
        if let Some(audio) = doc.descendants().find(|n| n.has_tag_name("audio")) {
            self.is_silent = match audio.attribute("silent") {
                Some(v) if v.eq_ignore_ascii_case("true") => Some(true),
                Some(v) if v.eq_ignore_ascii_case("false") => Some(false),
                _ => None,
            };
        }
    }
}

/// Attribute value, treating whitespace-only values as absent.
fn non_blank_attr(node: &Node, name: &str) -> Option<String> {
    node.attribute(name)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Concatenated text content of an element, including nested elements.
fn element_text(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_or_blank_payload_decodes_to_none() {
        assert_eq!(NotificationPayload::parse(None), None);
        assert_eq!(NotificationPayload::parse(Some("")), None);
        assert_eq!(NotificationPayload::parse(Some("   \n\t ")), None);
    }

    #[test]
    fn test_malformed_xml_keeps_raw_only() {
        let payload = NotificationPayload::parse(Some("not xml at all")).unwrap();
        assert_eq!(payload.raw_xml, "not xml at all");
        assert_eq!(payload.title, None);
        assert_eq!(payload.body, None);
        assert!(payload.images.is_empty());
        assert_eq!(payload.is_silent, None);
        assert_eq!(payload.app_id, None);
    }

    #[test]
    fn test_header_title_wins_over_text() {
        let xml = r#"<toast><header id="App1" title="Hi"/><binding><text>ignored</text></binding></toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.app_id.as_deref(), Some("App1"));
        assert_eq!(payload.title.as_deref(), Some("Hi"));
        // The first text element lands in the body because the header
        // already claimed the title.
        assert_eq!(payload.body.as_deref(), Some("ignored"));
    }

    #[test]
    fn test_text_elements_fill_title_then_body() {
        let xml = r#"<toast><binding><text>Title</text><text>Body</text><text>extra</text></binding></toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Title"));
        assert_eq!(payload.body.as_deref(), Some("Body"));
    }

    #[test]
    fn test_single_text_sets_title_only() {
        let xml = "<toast><text>just one</text></toast>";
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("just one"));
        assert_eq!(payload.body, None);
    }

    #[test]
    fn test_nested_markup_inside_text_is_flattened() {
        let xml = "<toast><text>Hello <b>World</b></text></toast>";
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Hello World"));
    }

    #[test]
    fn test_blank_header_attributes_are_ignored() {
        let xml = r#"<toast><header id="  " title=""/><text>fallback</text></toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.app_id, None);
        assert_eq!(payload.title.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_images_collected_in_order_with_duplicates() {
        let xml = r#"<toast>
            <image src="a.png"/>
            <image src=""/>
            <image/>
            <image src="b.png"/>
            <image src="a.png"/>
        </toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.images, vec!["a.png", "b.png", "a.png"]);
    }

    #[test]
    fn test_audio_silent_is_case_insensitive() {
        let on = r#"<toast><audio silent="TRUE"/></toast>"#;
        assert_eq!(
            NotificationPayload::parse(Some(on)).unwrap().is_silent,
            Some(true)
        );

        let off = r#"<toast><audio silent="False"/></toast>"#;
        assert_eq!(
            NotificationPayload::parse(Some(off)).unwrap().is_silent,
            Some(false)
        );
    }

    #[test]
    fn test_unrecognized_silent_value_stays_undetermined() {
        let xml = r#"<toast><audio silent="banana"/></toast>"#;
        assert_eq!(NotificationPayload::parse(Some(xml)).unwrap().is_silent, None);

        let no_attr = "<toast><audio/></toast>";
        assert_eq!(
            NotificationPayload::parse(Some(no_attr)).unwrap().is_silent,
            None
        );
    }

    #[test]
    fn test_only_first_audio_element_counts() {
        let xml = r#"<toast><audio silent="true"/><audio silent="false"/></toast>"#;
        assert_eq!(
            NotificationPayload::parse(Some(xml)).unwrap().is_silent,
            Some(true)
        );
    }

    #[test]
    fn test_header_must_be_direct_child_of_root() {
        let xml = r#"<toast><binding><header id="nested" title="nope"/></binding><text>t</text></toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.app_id, None);
        assert_eq!(payload.title.as_deref(), Some("t"));
    }

    #[test]
    fn test_full_toast_end_to_end() {
        let xml = r#"<toast launch="action=open">
            <header id="com.example.mail" title="Inbox"/>
            <visual>
                <binding template="ToastGeneric">
                    <text>New message from Ana</text>
                    <image src="https://example.com/avatar.png"/>
                </binding>
            </visual>
            <audio silent="true"/>
        </toast>"#;
        let payload = NotificationPayload::parse(Some(xml)).unwrap();
        assert_eq!(payload.app_id.as_deref(), Some("com.example.mail"));
        assert_eq!(payload.title.as_deref(), Some("Inbox"));
        assert_eq!(payload.body.as_deref(), Some("New message from Ana"));
        assert_eq!(payload.images, vec!["https://example.com/avatar.png"]);
        assert_eq!(payload.is_silent, Some(true));
        assert!(payload.raw_xml.contains("ToastGeneric"));
    }
}
