use chrono::Local;

use crate::storage::types::ImageItem;

const RULE: &str = "==================================================";

/// Renders every extracted text as a plain-text archive.
///
/// One block per item in stored order, headed by the local acquisition time.
/// Items without text are skipped; an empty collection yields an empty string.
pub fn render_text_archive(items: &[ImageItem]) -> String {
    let mut out = String::new();
    for item in items {
        let Some(text) = item.extracted_text.as_deref() else {
            continue;
        };
        let when = item.timestamp.with_timezone(&Local);
        out.push_str(&format!("--- {} ---\n", when.format("%Y-%m-%d %H:%M:%S")));
        out.push_str(text.trim());
        out.push('\n');
        out.push_str(RULE);
        out.push_str("\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_skips_items_without_text() {
        let mut a = ImageItem::new("http://cdn/a.jpg");
        a.extracted_text = Some("  primera noticia \n".into());
        let b = ImageItem::new("http://cdn/b.jpg");
        let mut c = ImageItem::new("http://cdn/c.jpg");
        c.extracted_text = Some("segunda".into());

        let archive = render_text_archive(&[a, b, c]);
        assert_eq!(archive.matches("--- ").count(), 2);
        assert!(archive.contains("primera noticia\n=="));
        assert!(archive.ends_with(&format!("segunda\n{}\n\n", RULE)));
    }

    #[test]
    fn empty_collection_renders_nothing() {
        assert!(render_text_archive(&[]).is_empty());
    }
}
