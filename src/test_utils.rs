//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::dom::Node;

/// A URL path segment that never contains markup or quotes.
pub fn arb_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9/_-]{1,24}").unwrap()
}

pub fn arb_host() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}\\.(com|org|net)").unwrap()
}

/// An image source with an arbitrary scheme mix, including `http://`.
pub fn arb_image_src() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("http://"),
            Just("HTTP://"),
            Just("https://"),
            Just("//"),
            Just("")
        ],
        arb_host(),
        arb_path(),
        prop_oneof![Just(".png"), Just(".jpg"), Just(".gif")],
    )
        .prop_map(|(scheme, host, path, ext)| format!("{}{}/{}{}", scheme, host, path, ext))
}

/// A width or height attribute value, biased towards the tracking-pixel size.
pub fn arb_dimension() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("1".to_string()),
        Just(" 1".to_string()),
        Just("1px".to_string()),
        (0u32..500).prop_map(|n| n.to_string()),
    ]
}

pub fn arb_image() -> impl Strategy<Value = Node> {
    (arb_image_src(), arb_dimension(), arb_dimension()).prop_map(|(src, width, height)| {
        Node::element("img")
            .with_attribute("src", src)
            .with_attribute("width", width)
            .with_attribute("height", height)
    })
}

/// A `<div>` holding up to eight images, some nested in paragraphs.
pub fn arb_image_tree() -> impl Strategy<Value = Node> {
    prop::collection::vec((arb_image(), any::<bool>()), 0..8).prop_map(|images| {
        images
            .into_iter()
            .fold(Node::element("div"), |root, (image, nested)| {
                if nested {
                    root.with_child(Node::element("p").with_child(image))
                } else {
                    root.with_child(image)
                }
            })
    })
}
