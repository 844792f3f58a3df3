//! Rendering an HTML mail body.
//!
//! This example walks a view through its lifecycle:
//! 1. Define a custom element and upgrade host page markup
//! 2. Inspect the cleaned render
//! 3. Toggle image blocking from the checkbox and the attribute
//! 4. Print the event trail
//!
//! Run with: `cargo run --example render_mail`

use content_view::{ElementRegistry, ViewOptions, BLOCK_IMAGES_ATTR};

const PAGE: &str = r#"
<h1>Inbox</h1>
<mail-body>
  <div slot="content">
    &lt;style&gt;body { font-family: Georgia, serif; }&lt;/style&gt;
    &lt;p&gt;Your order has shipped.&lt;/p&gt;
    &lt;img src="http://shop.example.com/parcel.png" width="120" height="80"&gt;
    &lt;img src="http://track.example.net/open.gif" width="1" height="1"&gt;
    &lt;script&gt;fingerprint()&lt;/script&gt;
  </div>
</mail-body>
"#;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Render Mail Example ===\n");

    let mut registry = ElementRegistry::new();
    if let Err(e) = registry.define("mail-body", ViewOptions::default()) {
        eprintln!("definition rejected: {}", e);
        return;
    }

    let mut views = match registry.upgrade(PAGE) {
        Ok(views) => views,
        Err(e) => {
            eprintln!("upgrade failed: {}", e);
            return;
        }
    };
    let Some(view) = views.first_mut() else {
        eprintln!("no mail-body element on the page");
        return;
    };

    println!("--- Rendered ---");
    println!("{}\n", view.shadow_root().inner_html());

    println!("--- Images ---");
    for img in view.shadow_root().images() {
        println!("src = {:?}", img.get_attribute_ref("src").unwrap_or_default());
    }

    println!("\n--- User unchecks \"Show Images\" ---");
    if let Err(e) = view.set_checkbox_checked(false) {
        eprintln!("control missing: {}", e);
        return;
    }
    println!("{} present: {}", BLOCK_IMAGES_ATTR, view.has_attribute(BLOCK_IMAGES_ATTR));
    for img in view.shadow_root().images() {
        println!(
            "src = {:?}, blocked_src = {:?}",
            img.get_attribute_ref("src").unwrap_or_default(),
            img.get_attribute_ref("blocked_src").unwrap_or_default()
        );
    }

    println!("\n--- Host removes {} ---", BLOCK_IMAGES_ATTR);
    view.remove_attribute(BLOCK_IMAGES_ATTR);
    println!("checkbox checked: {:?}", view.checkbox_checked());

    println!("\n--- Event trail ---");
    for event in view.trail().events() {
        println!("{}", event);
    }
}
