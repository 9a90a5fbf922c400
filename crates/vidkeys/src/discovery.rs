//! Video Discovery
//!
//! Walks a document for `<video>` elements with a usable source, then
//! descends into every frame the top document's origin may read.

use url::Origin;
use vidkeys_dom::{Document, DomError, NodeId};

use crate::VideoHandle;

/// Ordered discovery result
pub type VideoList = Vec<VideoHandle>;

/// Find every playable video reachable from `document`.
///
/// The document's own videos come first in document order, followed by
/// each frame's videos in frame order. Frames that cannot be read
/// contribute nothing.
pub fn discover(document: &Document) -> VideoList {
    let requester = document.origin().clone();
    let videos = discover_in(document, &requester);
    tracing::debug!("Discovered {} videos in {}", videos.len(), document.url());
    videos
}

fn discover_in(document: &Document, requester: &Origin) -> VideoList {
    let tree = document.tree();
    let mut videos: VideoList = tree
        .elements_by_tag_name(tree.root(), "video")
        .into_iter()
        .filter(|&node| document.resolved_source(node).is_some())
        .map(VideoHandle::top_level)
        .collect();

    for frame in document.frames() {
        match frame_videos(document, frame, requester) {
            Ok(found) => videos.extend(found.into_iter().map(|v| v.nested_in(frame))),
            Err(err) => tracing::debug!("Skipping frame {:?}: {}", frame, err),
        }
    }
    videos
}

/// Videos inside one frame, relative to the frame's document.
///
/// An empty frame yields an empty list; an unreadable one an error.
pub fn frame_videos(document: &Document, frame: NodeId, requester: &Origin) -> Result<VideoList, DomError> {
    Ok(match document.frame_document(frame, requester)? {
        Some(inner) => discover_in(inner, requester),
        None => VideoList::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(doc: &mut Document, parent: NodeId, src: Option<&str>) -> NodeId {
        let node = doc.create_element("video");
        if let Some(src) = src {
            doc.set_attribute(node, "src", src).unwrap();
        }
        doc.append_child(parent, node).unwrap();
        node
    }

    fn frame(doc: &mut Document, url: &str) -> (NodeId, Document) {
        let node = doc.create_element("iframe");
        let body = doc.body();
        doc.append_child(body, node).unwrap();
        (node, Document::parse(url).unwrap())
    }

    #[test]
    fn test_requires_source() {
        let mut doc = Document::parse("https://example.com/").unwrap();
        let body = doc.body();
        let a = video(&mut doc, body, Some("a.mp4"));
        video(&mut doc, body, None);
        video(&mut doc, body, Some("   "));

        let with_child_source = video(&mut doc, body, None);
        let source = doc.create_element("source");
        doc.set_attribute(source, "src", "b.webm").unwrap();
        doc.append_child(with_child_source, source).unwrap();

        assert_eq!(
            discover(&doc),
            vec![VideoHandle::top_level(a), VideoHandle::top_level(with_child_source)]
        );
    }

    #[test]
    fn test_document_videos_before_frame_videos() {
        let mut top = Document::parse("https://example.com/").unwrap();
        let (iframe, mut inner) = frame(&mut top, "https://example.com/embed");
        let inner_body = inner.body();
        let nested = video(&mut inner, inner_body, Some("n.mp4"));
        top.set_frame_document(iframe, inner).unwrap();

        // Appended after the frame, still listed first
        let body = top.body();
        let outer = video(&mut top, body, Some("o.mp4"));

        let found = discover(&top);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], VideoHandle::top_level(outer));
        assert_eq!(found[1], VideoHandle::new(vec![iframe], nested));
    }

    #[test]
    fn test_cross_origin_frame_is_skipped() {
        let mut top = Document::parse("https://example.com/").unwrap();
        let (foreign, mut inner) = frame(&mut top, "https://ads.example.net/");
        let inner_body = inner.body();
        video(&mut inner, inner_body, Some("ad.mp4"));
        top.set_frame_document(foreign, inner).unwrap();

        let (blank, mut about) = frame(&mut top, "about:blank");
        let about_body = about.body();
        let inherited = video(&mut about, about_body, Some("https://cdn.example.com/v.mp4"));
        top.set_frame_document(blank, about).unwrap();

        let requester = top.origin().clone();
        assert!(matches!(
            frame_videos(&top, foreign, &requester),
            Err(DomError::FrameAccessDenied { .. })
        ));
        assert_eq!(discover(&top), vec![VideoHandle::new(vec![blank], inherited)]);
    }

    #[test]
    fn test_empty_frame() {
        let mut top = Document::parse("https://example.com/").unwrap();
        let iframe = top.create_element("iframe");
        let body = top.body();
        top.append_child(body, iframe).unwrap();

        let requester = top.origin().clone();
        assert_eq!(frame_videos(&top, iframe, &requester), Ok(Vec::new()));
        assert!(discover(&top).is_empty());
    }
}
