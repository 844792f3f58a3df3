//! Image predicates and the reversible block/unblock transform.
//!
//! Blocking stashes an image's visible `src` in the [`BLOCKED_SRC_ATTR`]
//! side-channel attribute and clears `src`; unblocking moves it back. An image
//! carries the side-channel attribute if and only if it is currently blocked,
//! which makes both operations idempotent.

use crate::dom::Node;

/// Side-channel attribute holding a blocked image's original source.
pub const BLOCKED_SRC_ATTR: &str = "blocked_src";

const INSECURE_PREFIX: &str = "http://";
const SECURE_PREFIX: &str = "https://";

/// Returns true for an `<img>` element in any namespace.
pub fn is_image(node: &Node) -> bool {
    node.is_html_element("img")
}

/// Matches the 1x1 GIF tracking-pixel shape.
///
/// All three conditions must hold: width is 1, height is 1, and the source
/// ends in `.gif`. Dimensions follow the HTML rules for non-negative
/// integers, so `"1"`, `" 1"` and `"1px"` all count as 1.
pub fn is_tracking_pixel(node: &Node) -> bool {
    if !is_image(node) {
        return false;
    }
    let dimension = |name: &str| node.get_attribute_ref(name).and_then(parse_non_negative_integer);
    dimension("width") == Some(1)
        && dimension("height") == Some(1)
        && node
            .get_attribute_ref("src")
            .is_some_and(|src| normalize_source(src).ends_with(".gif"))
}

/// Rewrites an `http://` source to `https://`, keeping everything after the
/// scheme. Returns true if the source changed.
///
/// The scheme is matched on the normalized source, and the normalized,
/// upgraded value is written back.
pub fn upgrade_insecure_source(node: &mut Node) -> bool {
    let Some(src) = node.get_attribute_ref("src").map(normalize_source) else {
        return false;
    };
    let is_insecure = src
        .get(..INSECURE_PREFIX.len())
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case(INSECURE_PREFIX));
    if !is_insecure {
        return false;
    }

    let upgraded = format!("{}{}", SECURE_PREFIX, &src[INSECURE_PREFIX.len()..]);
    node.set_attribute("src", upgraded);
    true
}

/// The URL text a browser actually fetches for a `src` value: C0 controls
/// and spaces trimmed from both ends, tabs and newlines removed throughout.
pub fn normalize_source(src: &str) -> String {
    src.trim_matches(|c: char| c <= '\u{20}')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Blocks every image under `root` that is not already blocked.
///
/// Returns the number of images newly blocked.
pub fn block_images(root: &mut Node) -> usize {
    let mut blocked = 0;
    root.walk_tree_mut(&mut |node| {
        if is_image(node) && !node.has_attribute(BLOCKED_SRC_ATTR) {
            let src = node.get_attribute("src").unwrap_or_default();
            node.set_attribute(BLOCKED_SRC_ATTR, src);
            node.set_attribute("src", "");
            blocked += 1;
        }
    });
    blocked
}

/// Restores every blocked image under `root`.
///
/// The stashed value is restored verbatim. Returns the number of images
/// unblocked.
pub fn unblock_images(root: &mut Node) -> usize {
    let mut unblocked = 0;
    root.walk_tree_mut(&mut |node| {
        if !is_image(node) {
            return;
        }
        if let Some(original) = node.remove_attribute(BLOCKED_SRC_ATTR) {
            node.set_attribute("src", original);
            unblocked += 1;
        }
    });
    unblocked
}

/// HTML "rules for parsing non-negative integers".
///
/// Leading ASCII whitespace is skipped and anything after the leading digits
/// is ignored. `-0` is accepted as 0; any other negative value is rejected.
pub fn parse_non_negative_integer(value: &str) -> Option<u64> {
    let trimmed = value.trim_start_matches(['\t', '\n', '\u{000C}', '\r', ' ']);
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let parsed = digits[..end]
        .bytes()
        .fold(0u64, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')));
    if negative && parsed != 0 {
        return None;
    }
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(src: &str, width: &str, height: &str) -> Node {
        Node::element("img")
            .with_attribute("src", src)
            .with_attribute("width", width)
            .with_attribute("height", height)
    }

    #[test]
    fn tracking_pixel_requires_all_three_conditions() {
        assert!(is_tracking_pixel(&img("http://t.example/p.gif", "1", "1")));
        assert!(!is_tracking_pixel(&img("http://t.example/p.gif", "2", "1")));
        assert!(!is_tracking_pixel(&img("http://t.example/p.gif", "1", "2")));
        assert!(!is_tracking_pixel(&img("http://t.example/p.png", "1", "1")));
        assert!(!is_tracking_pixel(&img("http://t.example/p.GIF", "1", "1")));
    }

    #[test]
    fn tracking_pixel_without_dimensions_is_kept() {
        let node = Node::element("img").with_attribute("src", "p.gif");
        assert!(!is_tracking_pixel(&node));
    }

    #[test]
    fn tracking_pixel_accepts_lenient_dimensions() {
        assert!(is_tracking_pixel(&img("p.gif", " 1", "1px")));
    }

    #[test]
    fn upgrade_rewrites_scheme_only() {
        let mut node = Node::element("img").with_attribute("src", "http://example.com/a.jpg?x=http://");

        assert!(upgrade_insecure_source(&mut node));
        assert_eq!(
            node.get_attribute_ref("src"),
            Some("https://example.com/a.jpg?x=http://")
        );
        assert!(!upgrade_insecure_source(&mut node));
    }

    #[test]
    fn upgrade_matches_scheme_case_insensitively() {
        let mut node = Node::element("img").with_attribute("src", "HTTP://example.com/a.jpg");

        assert!(upgrade_insecure_source(&mut node));
        assert_eq!(node.get_attribute_ref("src"), Some("https://example.com/a.jpg"));
    }

    #[test]
    fn padded_sources_are_upgraded_and_trimmed() {
        for src in [" http://a.com/x.png", "http://a.com/x.png \n", "\thtt\np://a.com/x.png"] {
            let mut node = Node::element("img").with_attribute("src", src);

            assert!(upgrade_insecure_source(&mut node), "{:?}", src);
            assert_eq!(node.get_attribute_ref("src"), Some("https://a.com/x.png"));
        }
    }

    #[test]
    fn padded_gif_is_still_a_tracking_pixel() {
        assert!(is_tracking_pixel(&img("http://t.com/p.gif ", "1", "1")));
        assert!(is_tracking_pixel(&img("\nhttp://t.com/p.gif\t", "1", "1")));
    }

    #[test]
    fn normalize_source_strips_controls() {
        assert_eq!(normalize_source("  a\tb\r\nc\u{0}"), "abc");
        assert_eq!(normalize_source("a b"), "a b");
        assert_eq!(normalize_source("\u{c}http://a/x.png\u{c}"), "http://a/x.png");
    }

    #[test]
    fn upgrade_leaves_other_schemes() {
        for src in ["https://a/b", "data:image/png;base64,AAAA", "//a/b", "httpx://a", ""] {
            let mut node = Node::element("img").with_attribute("src", src);
            assert!(!upgrade_insecure_source(&mut node));
            assert_eq!(node.get_attribute_ref("src"), Some(src));
        }
    }

    #[test]
    fn block_then_unblock_restores_source() {
        let mut root = Node::element("div")
            .with_child(img("https://a/1.png", "10", "10"))
            .with_child(Node::element("p").with_child(img("https://a/2.png", "10", "10")));

        assert_eq!(block_images(&mut root), 2);
        root.walk_tree(&mut |n| {
            if is_image(n) {
                assert_eq!(n.get_attribute_ref("src"), Some(""));
                assert!(n.has_attribute(BLOCKED_SRC_ATTR));
            }
        });

        assert_eq!(unblock_images(&mut root), 2);
        let srcs: Vec<_> = {
            let mut v = Vec::new();
            root.walk_tree(&mut |n| {
                if is_image(n) {
                    v.push(n.get_attribute("src").unwrap_or_default());
                    assert!(!n.has_attribute(BLOCKED_SRC_ATTR));
                }
            });
            v
        };
        assert_eq!(srcs, vec!["https://a/1.png", "https://a/2.png"]);
    }

    #[test]
    fn block_is_idempotent() {
        let mut root = Node::element("div").with_child(img("https://a/1.png", "10", "10"));

        assert_eq!(block_images(&mut root), 1);
        let once = root.clone();
        assert_eq!(block_images(&mut root), 0);
        assert_eq!(root, once);
    }

    #[test]
    fn unblock_is_idempotent() {
        let mut root = Node::element("div").with_child(img("https://a/1.png", "10", "10"));

        assert_eq!(unblock_images(&mut root), 0);
        block_images(&mut root);
        unblock_images(&mut root);
        let once = root.clone();
        assert_eq!(unblock_images(&mut root), 0);
        assert_eq!(root, once);
    }

    #[test]
    fn image_without_source_blocks_to_empty_stash() {
        let mut root = Node::element("div").with_child(Node::element("img"));

        block_images(&mut root);
        let image = &root.children[0];
        assert_eq!(image.get_attribute_ref(BLOCKED_SRC_ATTR), Some(""));
        assert_eq!(image.get_attribute_ref("src"), Some(""));
    }

    #[test]
    fn non_negative_integer_rules() {
        assert_eq!(parse_non_negative_integer("1"), Some(1));
        assert_eq!(parse_non_negative_integer("  42abc"), Some(42));
        assert_eq!(parse_non_negative_integer("+7"), Some(7));
        assert_eq!(parse_non_negative_integer("-0"), Some(0));
        assert_eq!(parse_non_negative_integer("-1"), None);
        assert_eq!(parse_non_negative_integer(""), None);
        assert_eq!(parse_non_negative_integer("px"), None);
        assert_eq!(parse_non_negative_integer("1.5"), Some(1));
    }

    mod proptests {
        use super::*;
        use crate::test_utils::{arb_image_src, arb_image_tree};
        use proptest::prelude::*;

        fn sources(root: &Node) -> Vec<Option<String>> {
            root.find_all(&is_image)
                .iter()
                .map(|img| img.get_attribute("src"))
                .collect()
        }

        proptest! {
            /// Unblocking after blocking restores every source exactly.
            #[test]
            fn proptest_block_unblock_round_trip(mut root in arb_image_tree()) {
                let before = sources(&root);

                let blocked = block_images(&mut root);
                prop_assert_eq!(blocked, before.len());
                prop_assert!(root.find_all(&is_image).iter().all(|img| img.get_attribute_ref("src") == Some("")));

                unblock_images(&mut root);
                prop_assert_eq!(sources(&root), before);
            }

            /// A second block or unblock changes nothing.
            #[test]
            fn proptest_block_and_unblock_are_idempotent(mut root in arb_image_tree()) {
                block_images(&mut root);
                let once = root.clone();
                prop_assert_eq!(block_images(&mut root), 0);
                prop_assert_eq!(&root, &once);

                unblock_images(&mut root);
                let once = root.clone();
                prop_assert_eq!(unblock_images(&mut root), 0);
                prop_assert_eq!(&root, &once);
            }

            /// Upgrading only ever touches the scheme.
            #[test]
            fn proptest_upgrade_preserves_remainder(src in arb_image_src()) {
                let mut node = Node::element("img").with_attribute("src", src.clone());
                let changed = upgrade_insecure_source(&mut node);
                let after = node.get_attribute("src").unwrap_or_default();

                if src.to_ascii_lowercase().starts_with("http://") {
                    prop_assert!(changed);
                    prop_assert_eq!(after, format!("https://{}", &src[7..]));
                } else {
                    prop_assert!(!changed);
                    prop_assert_eq!(after, src);
                }
            }

            #[test]
            fn proptest_padding_never_hides_the_scheme(
                src in arb_image_src(),
                lead in "[ \t\n\r]{0,3}",
                trail in "[ \t\n\r]{0,3}",
            ) {
                let padded = format!("{}{}{}", lead, src, trail);
                let mut node = Node::element("img").with_attribute("src", padded);
                let changed = upgrade_insecure_source(&mut node);

                let after = node.get_attribute("src").unwrap_or_default();
                prop_assert!(!after.trim().to_ascii_lowercase().starts_with("http://"));
                if changed {
                    prop_assert_eq!(after.trim(), after.as_str());
                }
            }
        }
    }
}
