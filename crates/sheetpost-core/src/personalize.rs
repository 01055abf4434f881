use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const GREETING: &str = "Congratulations!";
pub const CERTIFICATE_LABEL: &str = " 📜 Get your certificate ";

static CERTIFICATE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"<a href="#"([^>]*)>\s*Get Your Certificate\s*</a>"##).expect("anchor pattern")
});

/// Fills a certificate template for one recipient.
///
/// Adds the name to every `Congratulations!` and points every placeholder
/// `Get Your Certificate` anchor at `link`, keeping its other attributes.
/// Templates without those markers come back unchanged.
pub fn personalize_certificate(template: &str, name: &str, link: &str) -> String {
    let greeted = template.replace(GREETING, &format!("Congratulations {name}!"));
    CERTIFICATE_ANCHOR
        .replace_all(&greeted, |caps: &Captures<'_>| {
            format!(r#"<a href="{link}"{}>{CERTIFICATE_LABEL}</a>"#, &caps[1])
        })
        .into_owned()
}
